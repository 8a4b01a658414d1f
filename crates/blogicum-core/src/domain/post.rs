use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Location, UserRef};

/// Post entity - a blog entry written by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Data for a post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub is_published: bool,
}

impl NewPost {
    /// Attach an id and creation time, producing the stored row.
    pub fn into_post(self, id: i64, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            author_id: self.author_id,
            category_id: self.category_id,
            location_id: self.location_id,
            is_published: self.is_published,
            created_at,
        }
    }
}

/// A post row as returned by the query builder: joined with its author,
/// category and location and annotated with the live comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: Post,
    pub author: UserRef,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}
