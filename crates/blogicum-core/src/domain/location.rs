use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::HasId;

/// Location entity. Its publish flag only affects display, never post visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub const MAX_NAME_LEN: usize = 256;

    pub fn new(name: String, is_published: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            is_published,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > Self::MAX_NAME_LEN {
            vec![format!(
                "name must be between 1 and {} characters",
                Self::MAX_NAME_LEN
            )]
        } else {
            Vec::new()
        }
    }
}

impl HasId for Location {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }
}
