//! Post query object.
//!
//! A [`PostQuery`] names everything a listing needs up front: the filter set,
//! the joined relations (author, category, location) and the comment-count
//! aggregate. Repositories execute it in one pass and return
//! [`PostSummary`](crate::domain::PostSummary) rows, so no caller ever follows
//! up per row.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post};
use crate::visibility;

/// Filter keys understood by the query builder.
///
/// Every key is optional; `None` means "do not constrain". Two filters are
/// combined with [`PostFilter::merge`], where the right-hand side wins on
/// every key it sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub author_id: Option<i64>,
    pub category_id: Option<i64>,
    pub is_published: Option<bool>,
    pub category_is_published: Option<bool>,
    pub pub_date_lte: Option<DateTime<Utc>>,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Overlay `extra` on top of `self`; keys set in `extra` replace ours.
    pub fn merge(self, extra: PostFilter) -> Self {
        Self {
            author_id: extra.author_id.or(self.author_id),
            category_id: extra.category_id.or(self.category_id),
            is_published: extra.is_published.or(self.is_published),
            category_is_published: extra.category_is_published.or(self.category_is_published),
            pub_date_lte: extra.pub_date_lte.or(self.pub_date_lte),
        }
    }

    /// Evaluate the filter against a post and its (optional) category.
    ///
    /// A category constraint on a post without a category never matches,
    /// mirroring an inner condition on a left join.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.author_id.is_some_and(|id| post.author_id != id) {
            return false;
        }
        if self.category_id.is_some_and(|id| post.category_id != Some(id)) {
            return false;
        }
        if self.is_published.is_some_and(|flag| post.is_published != flag) {
            return false;
        }
        if let Some(flag) = self.category_is_published {
            if !category.is_some_and(|c| c.is_published == flag) {
                return false;
            }
        }
        if self.pub_date_lte.is_some_and(|limit| post.pub_date > limit) {
            return false;
        }
        true
    }
}

/// A listing query over posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub filter: PostFilter,
}

impl PostQuery {
    /// All posts matching `filter`; adds no visibility constraint of its own.
    pub fn get_posts(filter: PostFilter) -> Self {
        Self { filter }
    }

    /// Publicly visible posts at `now`, narrowed by `extra`.
    pub fn get_published_posts(now: DateTime<Utc>, extra: PostFilter) -> Self {
        Self {
            filter: visibility::public_filter(now).merge(extra),
        }
    }

    /// Listing order: newest `pub_date` first, ties by ascending id.
    pub fn ordering(a: &Post, b: &Post) -> Ordering {
        b.pub_date.cmp(&a.pub_date).then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(id: i64, pub_date: DateTime<Utc>) -> Post {
        Post {
            id,
            title: format!("Post {id}"),
            text: "text".to_string(),
            pub_date,
            author_id: 1,
            category_id: Some(1),
            location_id: None,
            is_published: true,
            created_at: pub_date,
        }
    }

    fn category(is_published: bool) -> Category {
        Category {
            id: 1,
            title: "Travel".to_string(),
            description: String::new(),
            slug: "travel".to_string(),
            is_published,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_merge_extra_wins_on_collision() {
        let base = PostFilter {
            is_published: Some(true),
            author_id: Some(1),
            ..PostFilter::default()
        };
        let extra = PostFilter {
            author_id: Some(2),
            ..PostFilter::default()
        };

        let merged = base.merge(extra);

        assert_eq!(merged.author_id, Some(2));
        assert_eq!(merged.is_published, Some(true));
    }

    #[test]
    fn test_published_query_keeps_category_filter() {
        let now = Utc::now();
        let query = PostQuery::get_published_posts(now, PostFilter::new().category(7));

        assert_eq!(query.filter.category_id, Some(7));
        assert_eq!(query.filter.is_published, Some(true));
        assert_eq!(query.filter.category_is_published, Some(true));
        assert_eq!(query.filter.pub_date_lte, Some(now));
    }

    #[test]
    fn test_get_posts_is_unconstrained() {
        let query = PostQuery::get_posts(PostFilter::new().author(3));
        let mut hidden = post(1, Utc::now() + Duration::days(3));
        hidden.author_id = 3;
        hidden.is_published = false;

        assert!(query.filter.matches(&hidden, None));
    }

    #[test]
    fn test_category_constraint_rejects_missing_category() {
        let filter = PostFilter {
            category_is_published: Some(true),
            ..PostFilter::default()
        };
        let p = post(1, Utc::now());

        assert!(!filter.matches(&p, None));
        assert!(!filter.matches(&p, Some(&category(false))));
        assert!(filter.matches(&p, Some(&category(true))));
    }

    #[test]
    fn test_ordering_newest_first_then_id() {
        let now = Utc::now();
        let mut posts = vec![
            post(1, now - Duration::days(2)),
            post(3, now),
            post(2, now),
        ];

        posts.sort_by(PostQuery::ordering);

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
