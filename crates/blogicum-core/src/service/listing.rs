//! Paginated post listings: index, category, profile.

use chrono::{DateTime, Utc};

use super::BlogService;
use crate::domain::{Actor, Category, PostSummary, User};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::query::{PostFilter, PostQuery};
use crate::visibility;

/// A published category and one page of its visible posts.
#[derive(Debug, Clone)]
pub struct CategoryListing {
    pub category: Category,
    pub page: Page<PostSummary>,
}

/// A user and one page of the posts the viewer may see on their profile.
#[derive(Debug, Clone)]
pub struct ProfileListing {
    pub profile: User,
    pub page: Page<PostSummary>,
}

impl BlogService {
    /// Run `query` and cut out the requested page.
    pub async fn list_posts(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, DomainError> {
        let count = self.repos.posts.count(query).await?;
        let meta = self.paginator.page_meta(count, page);
        let items = if count == 0 {
            Vec::new()
        } else {
            self.repos
                .posts
                .fetch(query, meta.offset(), meta.per_page)
                .await?
        };

        tracing::debug!(
            count,
            page = meta.number,
            num_pages = meta.num_pages,
            "Listed posts"
        );

        Ok(Page { items, meta })
    }

    /// Front page: every publicly visible post.
    pub async fn index(
        &self,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<Page<PostSummary>, DomainError> {
        let query = PostQuery::get_published_posts(now, PostFilter::new());
        self.list_posts(&query, page).await
    }

    /// Visible posts of a published category.
    ///
    /// A missing or unpublished category is not found; it never yields an
    /// empty listing.
    pub async fn category_posts(
        &self,
        slug: &str,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<CategoryListing, DomainError> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let query = PostQuery::get_published_posts(now, PostFilter::new().category(category.id));
        let page = self.list_posts(&query, page).await?;

        Ok(CategoryListing { category, page })
    }

    /// A user's posts; the owner sees all of them, others the public ones.
    pub async fn profile(
        &self,
        viewer: Option<&Actor>,
        username: &str,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<ProfileListing, DomainError> {
        let profile = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let query = PostQuery::get_posts(visibility::profile_filter(viewer, profile.id, now));
        let page = self.list_posts(&query, page).await?;

        Ok(ProfileListing { profile, page })
    }
}
