use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorRef, Authored, HasId};

/// Comment entity. Has no visibility rule of its own: it is readable
/// exactly when its parent post is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            created_at,
        }
    }

    pub fn validate_text(text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            vec!["comment text must not be empty".to_string()]
        } else {
            Vec::new()
        }
    }
}

impl HasId for Comment {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// A comment together with its author's public reference.
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: Comment,
    pub author: AuthorRef,
}
