//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;

use uuid::Uuid;

pub use category::Category;
pub use comment::{Comment, CommentView};
pub use location::Location;
pub use post::{Post, PostDraft, PostSummary};
pub use user::{AuthorRef, User};

/// Entities addressable by a primary key.
pub trait HasId {
    type Id;

    fn id(&self) -> Self::Id;
}

/// Content owned by a single user. Only that user may mutate it.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}
