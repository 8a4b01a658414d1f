//! Page models: the JSON documents the server renders for each view.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::UserResponse;

/// Field name → error messages.
pub type FormErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationView {
    pub id: i64,
    pub name: String,
}

/// A post as shown in listings and on its detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author: AuthorView,
    pub category: Option<CategoryView>,
    pub location: Option<LocationView>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorView,
}

/// Paginator state for a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
    pub has_next: bool,
    pub has_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_number: Option<u64>,
}

/// Index page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListPage {
    pub posts: Vec<PostView>,
    pub page: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPage {
    pub category: CategoryView,
    pub posts: Vec<PostView>,
    pub page: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePage {
    pub profile: UserResponse,
    pub is_owner: bool,
    pub posts: Vec<PostView>,
    pub page: PageInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentFields {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailPage {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub form: CommentFields,
}

/// Values of the post form as the client last sent them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub category: String,
    pub location: String,
    pub is_published: bool,
}

/// Create/edit post form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
    pub form: PostFields,
    pub errors: FormErrors,
    pub categories: Vec<CategoryView>,
    pub locations: Vec<LocationView>,
}

/// Shown before a post is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDeletePage {
    pub post_id: i64,
    pub form: PostFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentFormPage {
    pub post_id: i64,
    pub comment_id: i64,
    pub form: CommentFields,
    pub errors: FormErrors,
}

/// Shown before a comment is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDeletePage {
    pub post_id: i64,
    pub comment_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFields {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFormPage {
    pub form: ProfileFields,
    pub errors: FormErrors,
}
