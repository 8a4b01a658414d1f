use async_trait::async_trait;

use crate::domain::{
    Category, Comment, CommentWithAuthor, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostSummary, User,
};
use crate::error::RepoError;
use crate::query::PostQuery;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist an entity that already has an ID.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Published categories, for form choices.
    async fn list_published(&self) -> Result<Vec<Category>, RepoError>;

    /// Fails with [`RepoError::Constraint`] on a taken slug.
    async fn create(&self, category: NewCategory) -> Result<Category, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, i64> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Location>, RepoError>;

    async fn list_published(&self) -> Result<Vec<Location>, RepoError>;

    async fn create(&self, location: NewLocation) -> Result<Location, RepoError>;
}

/// Post repository - executes [`PostQuery`] objects.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Number of posts matching the query.
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// One slice of the ordered result set, joined and annotated.
    async fn fetch(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError>;

    /// A single post, joined and annotated, regardless of visibility.
    async fn find_summary(&self, id: i64) -> Result<Option<PostSummary>, RepoError>;

    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// A post's thread, oldest first, with authors attached.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, RepoError>;

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;
}
