use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HasId;

/// Category entity - a published or hidden section of the blog, addressed by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub const MAX_TITLE_LEN: usize = 256;

    pub fn new(title: String, description: String, slug: String, is_published: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            slug,
            is_published,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let title = self.title.trim();
        if title.is_empty() || title.chars().count() > Self::MAX_TITLE_LEN {
            errors.push(format!(
                "title must be between 1 and {} characters",
                Self::MAX_TITLE_LEN
            ));
        }
        if !is_valid_slug(&self.slug) {
            errors.push(
                "slug may only contain latin letters, digits, hyphens and underscores".to_string(),
            );
        }
        errors
    }
}

impl HasId for Category {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(is_valid_slug("travel_notes-2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("путешествия"));
    }

    #[test]
    fn category_validation() {
        let ok = Category::new("Travel".into(), "Trips".into(), "travel".into(), true);
        assert!(ok.validate().is_empty());

        let bad = Category::new(" ".into(), String::new(), "bad slug".into(), true);
        assert_eq!(bad.validate().len(), 2);
    }
}
