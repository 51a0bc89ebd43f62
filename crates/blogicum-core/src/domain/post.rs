use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Authored, AuthorRef, Category, HasId, Location};

/// Post entity - a publication owned by its author.
///
/// `pub_date` may lie in the future, which schedules the post: it stays
/// hidden from everyone but the author until that moment passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author_id` from validated draft fields.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        let mut post = Self {
            id: Uuid::new_v4(),
            author_id,
            title: String::new(),
            text: String::new(),
            pub_date: draft.pub_date,
            is_published: true,
            category_id: None,
            location_id: None,
            image: None,
            created_at: Utc::now(),
        };
        post.apply(draft);
        post
    }

    /// Overwrite the editable fields. Author and creation time never change.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.pub_date = draft.pub_date;
        self.is_published = draft.is_published;
        self.category_id = draft.category_id;
        self.location_id = draft.location_id;
        self.image = draft.image;
    }
}

impl HasId for Post {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// The editable fields of a post, as submitted by its author.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostDraft {
    pub const MAX_TITLE_LEN: usize = 256;

    /// Field-level checks that need no storage access.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let title = self.title.trim();
        if title.is_empty() {
            errors.push("title must not be empty".to_string());
        } else if title.chars().count() > Self::MAX_TITLE_LEN {
            errors.push(format!(
                "title must be at most {} characters",
                Self::MAX_TITLE_LEN
            ));
        }
        if self.text.trim().is_empty() {
            errors.push("text must not be empty".to_string());
        }
        if self.category_id.is_none() {
            errors.push("category is required".to_string());
        }
        errors
    }
}

/// A post joined with everything a listing or detail view shows.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub post: Post,
    pub author: AuthorRef,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "Morning walk".into(),
            text: "Fog over the river.".into(),
            pub_date: Utc::now(),
            is_published: true,
            category_id: Some(Uuid::new_v4()),
            location_id: None,
            image: None,
        }
    }

    #[test]
    fn valid_draft_has_no_errors() {
        assert!(draft().validate().is_empty());
    }

    #[test]
    fn draft_reports_every_problem() {
        let mut d = draft();
        d.title = "   ".into();
        d.text = String::new();
        d.category_id = None;

        let errors = d.validate();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut d = draft();
        d.title = "x".repeat(PostDraft::MAX_TITLE_LEN + 1);
        assert_eq!(d.validate().len(), 1);
    }

    #[test]
    fn apply_keeps_author_and_creation_time() {
        let author = Uuid::new_v4();
        let mut post = Post::new(author, draft());
        let created_at = post.created_at;

        let mut edit = draft();
        edit.title = "Evening walk".into();
        edit.is_published = false;
        post.apply(edit);

        assert_eq!(post.author_id, author);
        assert_eq!(post.created_at, created_at);
        assert_eq!(post.title, "Evening walk");
        assert!(!post.is_published);
    }
}
