//! Blog use cases.
//!
//! Every user-facing action is one method on [`BlogService`]. Read-only
//! actions return a page model or a not-found error. Mutating actions run
//! authorize → validate → commit and return an [`Outcome`]: either a page
//! model to render (a form, possibly with errors, or a confirmation) or a
//! [`Redirect`] after a write or a failed ownership check.

mod catalog;
mod comments;
mod listing;
mod posts;
mod profile;

use std::sync::Arc;

use crate::pagination::Paginator;
use crate::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

pub use catalog::{Catalog, SeedReport};
pub use comments::{CommentDeletion, CommentForm};
pub use listing::{CategoryListing, ProfileListing};
pub use posts::{PostDeletion, PostDetail, PostForm};
pub use profile::ProfileForm;

/// Where a handler sends the client after a write or a refused action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Index,
    PostDetail(i64),
    Profile(String),
}

/// Result of a mutating action.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Render(T),
    Redirect(Redirect),
}

impl<T> Outcome<T> {
    pub fn redirect_target(&self) -> Option<&Redirect> {
        match self {
            Outcome::Redirect(target) => Some(target),
            Outcome::Render(_) => None,
        }
    }

    pub fn into_rendered(self) -> Option<T> {
        match self {
            Outcome::Render(view) => Some(view),
            Outcome::Redirect(_) => None,
        }
    }
}

/// The repositories the blog runs against.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

/// Blog application service.
#[derive(Clone)]
pub struct BlogService {
    repos: Repositories,
    paginator: Paginator,
}

impl BlogService {
    pub fn new(repos: Repositories) -> Self {
        Self {
            repos,
            paginator: Paginator::default(),
        }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }
}
