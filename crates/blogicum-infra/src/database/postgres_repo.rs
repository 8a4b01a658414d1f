//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, NotSet, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use blogicum_core::domain::{
    Category, Comment, CommentWithAuthor, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostSummary, User, UserRef,
};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::query::PostQuery;

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(new.username),
            email: Set(new.email),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            password_hash: Set(new.password_hash),
            date_joined: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::IsPublished.eq(true))
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new: NewCategory) -> Result<Category, RepoError> {
        let model = category::ActiveModel {
            id: NotSet,
            title: Set(new.title),
            description: Set(new.description),
            slug: Set(new.slug),
            is_published: Set(new.is_published),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Location>, RepoError> {
        let result = LocationEntity::find()
            .filter(location::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .filter(location::Column::IsPublished.eq(true))
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new: NewLocation) -> Result<Location, RepoError> {
        let model = location::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            is_published: Set(new.is_published),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }
}

impl PostgresPostRepository {
    /// Translate the filter keys into a `SELECT` on `posts`.
    ///
    /// `categories` is joined only when a category column is filtered on;
    /// the inner join also drops posts without a category, which no
    /// published-category condition could match anyway.
    pub(crate) fn select(query: &PostQuery) -> Select<PostEntity> {
        let filter = &query.filter;
        let mut select = PostEntity::find();

        if let Some(flag) = filter.category_is_published {
            select = select
                .join(JoinType::InnerJoin, post::Relation::Category.def())
                .filter(category::Column::IsPublished.eq(flag));
        }
        if let Some(author_id) = filter.author_id {
            select = select.filter(post::Column::AuthorId.eq(author_id));
        }
        if let Some(category_id) = filter.category_id {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }
        if let Some(flag) = filter.is_published {
            select = select.filter(post::Column::IsPublished.eq(flag));
        }
        if let Some(limit) = filter.pub_date_lte {
            let limit: DateTimeWithTimeZone = limit.into();
            select = select.filter(post::Column::PubDate.lte(limit));
        }

        select
    }

    /// One page of [`Self::select`], newest first with ties broken by id.
    pub(crate) fn page(query: &PostQuery, offset: u64, limit: u64) -> Select<PostEntity> {
        Self::select(query)
            .order_by_desc(post::Column::PubDate)
            .order_by_asc(post::Column::Id)
            .offset(offset)
            .limit(limit)
    }

    /// Attach author, category, location and comment count to each row.
    ///
    /// One batched query per relation plus one grouped count, whatever the
    /// number of rows.
    async fn annotate(&self, rows: Vec<post::Model>) -> Result<Vec<PostSummary>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = rows.iter().map(|p| p.id).collect();
        let author_ids: BTreeSet<i64> = rows.iter().map(|p| p.author_id).collect();
        let category_ids: BTreeSet<i64> = rows.iter().filter_map(|p| p.category_id).collect();
        let location_ids: BTreeSet<i64> = rows.iter().filter_map(|p| p.location_id).collect();

        let authors: HashMap<i64, UserRef> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(repo_err)?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    UserRef {
                        id: u.id,
                        username: u.username,
                    },
                )
            })
            .collect();

        let categories: HashMap<i64, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .map_err(repo_err)?
                .into_iter()
                .map(|c| (c.id, c.into()))
                .collect()
        };

        let locations: HashMap<i64, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(&self.db)
                .await
                .map_err(repo_err)?
                .into_iter()
                .map(|l| (l.id, l.into()))
                .collect()
        };

        let counts: HashMap<i64, i64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "total_comments")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(repo_err)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| {
                let author = authors.get(&row.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("author {} of post {} missing", row.author_id, row.id))
                })?;
                let category = row.category_id.and_then(|id| categories.get(&id).cloned());
                let location = row.location_id.and_then(|id| locations.get(&id).cloned());
                let comment_count = counts.get(&row.id).copied().unwrap_or(0).max(0) as u64;

                Ok(PostSummary {
                    post: row.into(),
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        Self::select(query).count(&self.db).await.map_err(repo_err)
    }

    async fn fetch(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let rows = Self::page(query, offset, limit)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        self.annotate(rows).await
    }

    async fn find_summary(&self, id: i64) -> Result<Option<PostSummary>, RepoError> {
        let Some(row) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };

        Ok(self.annotate(vec![row]).await?.pop())
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            title: Set(new.title),
            text: Set(new.text),
            pub_date: Set(new.pub_date.into()),
            author_id: Set(new.author_id),
            category_id: Set(new.category_id),
            location_id: Set(new.location_id),
            is_published: Set(new.is_published),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("author of comment {} missing", comment.id))
                })?;
                Ok(CommentWithAuthor {
                    author: UserRef {
                        id: author.id,
                        username: author.username,
                    },
                    comment: Comment::from(comment),
                })
            })
            .collect()
    }

    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            text: Set(new.text),
            post_id: Set(new.post_id),
            author_id: Set(new.author_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }
}
