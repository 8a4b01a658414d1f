use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity - groups posts under a routable slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// A category to insert; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCategory {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    #[serde(default = "published")]
    pub is_published: bool,
}

fn published() -> bool {
    true
}

impl NewCategory {
    pub fn into_category(self, id: i64, created_at: DateTime<Utc>) -> Category {
        Category {
            id,
            title: self.title,
            description: self.description,
            slug: self.slug,
            is_published: self.is_published,
            created_at,
        }
    }
}
