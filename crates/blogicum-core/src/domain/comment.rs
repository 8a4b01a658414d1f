use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRef;

/// Comment entity - a reply attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub post_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub post_id: i64,
    pub author_id: i64,
}

impl NewComment {
    pub fn into_comment(self, id: i64, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id,
            text: self.text,
            post_id: self.post_id,
            author_id: self.author_id,
            created_at,
        }
    }
}

/// Comment joined with its author, as shown in a post's thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: UserRef,
}
