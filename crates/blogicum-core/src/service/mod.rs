//! Use cases - orchestration of repositories and the visibility policy.
//!
//! Services own no state beyond their ports; every call takes the acting
//! identity and, where visibility depends on it, the current time.

mod accounts;
mod content;

use std::sync::Arc;

use crate::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

pub use accounts::{AccountService, AuthSession, ProfileUpdate, Registration};
pub use content::{ContentService, NewCategory, PostDetail};

/// The full set of repositories, shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub comments: Arc<dyn CommentRepository>,
}
