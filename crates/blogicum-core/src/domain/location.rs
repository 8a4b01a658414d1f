use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location entity - optional place a post is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewLocation {
    pub name: String,
    #[serde(default = "published")]
    pub is_published: bool,
}

fn published() -> bool {
    true
}

impl NewLocation {
    pub fn into_location(self, id: i64, created_at: DateTime<Utc>) -> Location {
        Location {
            id,
            name: self.name,
            is_published: self.is_published,
            created_at,
        }
    }
}
