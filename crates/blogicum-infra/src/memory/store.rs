//! In-memory blog store.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blogicum_core::domain::{
    Category, Comment, CommentWithAuthor, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostSummary, User, UserRef,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::query::PostQuery;
use blogicum_core::service::Repositories;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    locations: BTreeMap<i64, Location>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    user_seq: i64,
    category_seq: i64,
    location_seq: i64,
    post_seq: i64,
    comment_seq: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn summarize(&self, post: &Post) -> Result<PostSummary, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .map(UserRef::from)
            .ok_or_else(|| RepoError::Query(format!("author of post {} missing", post.id)))?;
        let comment_count = self
            .comments
            .values()
            .filter(|c| c.post_id == post.id)
            .count() as u64;

        Ok(PostSummary {
            post: post.clone(),
            author,
            category: post.category_id.and_then(|id| self.categories.get(&id).cloned()),
            location: post.location_id.and_then(|id| self.locations.get(&id).cloned()),
            comment_count,
        })
    }

    fn matching(&self, query: &PostQuery) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| {
                let category = p.category_id.and_then(|id| self.categories.get(&id));
                query.filter.matches(p, category)
            })
            .collect();
        posts.sort_by(|a, b| PostQuery::ordering(a, b));
        posts
    }

    fn remove_post(&mut self, post_id: i64) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, c| c.post_id != post_id);
    }
}

/// Blog store kept in process memory behind an async `RwLock`.
///
/// Implements every repository port with the same semantics as the
/// PostgreSQL store, including cascades and unique keys.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire one shared store into every repository slot.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            categories: self.clone(),
            locations: self.clone(),
            posts: self.clone(),
            comments: self.clone(),
        }
    }

    pub async fn add_user(&self, username: &str) -> User {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.user_seq);
        let user = User {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            date_joined: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        user
    }

    pub async fn add_category(&self, title: &str, slug: &str, is_published: bool) -> Category {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.category_seq);
        let category = NewCategory {
            title: title.to_string(),
            description: String::new(),
            slug: slug.to_string(),
            is_published,
        }
        .into_category(id, Utc::now());
        tables.categories.insert(id, category.clone());
        category
    }

    pub async fn add_location(&self, name: &str, is_published: bool) -> Location {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.location_seq);
        let location = NewLocation {
            name: name.to_string(),
            is_published,
        }
        .into_location(id, Utc::now());
        tables.locations.insert(id, location.clone());
        location
    }

    pub async fn add_post(&self, new: NewPost) -> Post {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.post_seq);
        let post = new.into_post(id, Utc::now());
        tables.posts.insert(id, post.clone());
        post
    }

    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }

    pub async fn comment_count(&self) -> usize {
        self.tables.read().await.comments.len()
    }
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|_, c| c.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.username_taken(&new.username, None) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        let id = next(&mut tables.user_seq);
        let user = User {
            id,
            username: new.username,
            email: new.email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash: new.password_hash,
            date_joined: Utc::now(),
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BaseRepository<Category, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        if tables
            .categories
            .values()
            .any(|c| c.slug == category.slug && c.id != category.id)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.is_published)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }

    async fn create(&self, new: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.slug == new.slug) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        let id = next(&mut tables.category_seq);
        let category = new.into_category(id, Utc::now());
        tables.categories.insert(id, category.clone());
        Ok(category)
    }
}

#[async_trait]
impl BaseRepository<Location, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn save(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.locations.contains_key(&location.id) {
            return Err(RepoError::NotFound);
        }
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.locations.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryBlogStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Location>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.locations.values().find(|l| l.name == name).cloned())
    }

    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables
            .locations
            .values()
            .filter(|l| l.is_published)
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }

    async fn create(&self, new: NewLocation) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        let id = next(&mut tables.location_seq);
        let location = new.into_location(id, Utc::now());
        tables.locations.insert(id, location.clone());
        Ok(location)
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.posts.get_mut(&post.id) {
            Some(slot) => {
                *slot = post.clone();
                Ok(post)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        tables.remove_post(id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.matching(query).len() as u64)
    }

    async fn fetch(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .matching(query)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|p| tables.summarize(p))
            .collect()
    }

    async fn find_summary(&self, id: i64) -> Result<Option<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|p| tables.summarize(p)).transpose()
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&new.author_id) {
            return Err(RepoError::Constraint("unknown author".to_string()));
        }
        let id = next(&mut tables.post_seq);
        let post = new.into_post(id, Utc::now());
        tables.posts.insert(id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.comments.get_mut(&comment.id) {
            Some(slot) => {
                *slot = comment.clone();
                Ok(comment)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        match tables.comments.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let tables = self.tables.read().await;
        let mut thread: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        thread.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        thread
            .into_iter()
            .map(|c| {
                let author = tables
                    .users
                    .get(&c.author_id)
                    .map(UserRef::from)
                    .ok_or_else(|| {
                        RepoError::Query(format!("author of comment {} missing", c.id))
                    })?;
                Ok(CommentWithAuthor {
                    comment: c.clone(),
                    author,
                })
            })
            .collect()
    }

    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&new.post_id) {
            return Err(RepoError::Constraint("unknown post".to_string()));
        }
        let id = next(&mut tables.comment_seq);
        let comment = new.into_comment(id, Utc::now());
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_post(author_id: i64, category_id: i64) -> NewPost {
        NewPost {
            title: "Post".to_string(),
            text: "Text".to_string(),
            pub_date: Utc::now() - Duration::hours(1),
            author_id,
            category_id: Some(category_id),
            location_id: None,
            is_published: true,
        }
    }

    #[tokio::test]
    async fn test_delete_post_cascades_to_comments() {
        let store = InMemoryBlogStore::new();
        let user = store.add_user("ann").await;
        let category = store.add_category("Travel", "travel", true).await;
        let post = store.add_post(new_post(user.id, category.id)).await;
        CommentRepository::create(
            &store,
            NewComment {
                text: "hi".to_string(),
                post_id: post.id,
                author_id: user.id,
            },
        )
        .await
        .unwrap();

        BaseRepository::<Post, i64>::delete(&store, post.id)
            .await
            .unwrap();

        assert_eq!(store.comment_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_category_detaches_posts() {
        let store = InMemoryBlogStore::new();
        let user = store.add_user("ann").await;
        let category = store.add_category("Travel", "travel", true).await;
        let post = store.add_post(new_post(user.id, category.id)).await;

        BaseRepository::<Category, i64>::delete(&store, category.id)
            .await
            .unwrap();

        let post = BaseRepository::<Post, i64>::find_by_id(&store, post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.category_id, None);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryBlogStore::new();
        store.add_user("ann").await;

        let result = UserRepository::create(
            &store,
            NewUser {
                username: "ann".to_string(),
                email: "ann@example.com".to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_summary_counts_comments() {
        let store = InMemoryBlogStore::new();
        let user = store.add_user("ann").await;
        let category = store.add_category("Travel", "travel", true).await;
        let post = store.add_post(new_post(user.id, category.id)).await;
        for text in ["one", "two"] {
            CommentRepository::create(
                &store,
                NewComment {
                    text: text.to_string(),
                    post_id: post.id,
                    author_id: user.id,
                },
            )
            .await
            .unwrap();
        }

        let summary = store.find_summary(post.id).await.unwrap().unwrap();

        assert_eq!(summary.comment_count, 2);
        assert_eq!(summary.author.username, "ann");
        assert_eq!(summary.category.unwrap().slug, "travel");
    }

    #[tokio::test]
    async fn test_duplicate_category_slug_rejected() {
        let store = InMemoryBlogStore::new();
        store.add_category("Travel", "travel", true).await;

        let result = CategoryRepository::create(
            &store,
            NewCategory {
                title: "Trips".to_string(),
                description: String::new(),
                slug: "travel".to_string(),
                is_published: true,
            },
        )
        .await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }
}
