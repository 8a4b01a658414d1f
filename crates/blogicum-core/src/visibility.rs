//! Post visibility rules.
//!
//! A post is publicly visible when it is published, its category is
//! published and its publication date has passed. Its author always sees it.

use chrono::{DateTime, Utc};

use crate::domain::{Actor, Category, Post};
use crate::query::PostFilter;

/// The public-visibility predicate expressed as filter keys.
pub fn public_filter(now: DateTime<Utc>) -> PostFilter {
    PostFilter {
        is_published: Some(true),
        category_is_published: Some(true),
        pub_date_lte: Some(now),
        ..PostFilter::default()
    }
}

/// Whether anyone may see `post` at `now`.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published
        && category.is_some_and(|c| c.is_published)
        && post.pub_date <= now
}

/// Whether `viewer` may see `post` at `now`, honoring the owner bypass.
pub fn is_visible_to(
    viewer: Option<&Actor>,
    post: &Post,
    category: Option<&Category>,
    now: DateTime<Utc>,
) -> bool {
    if viewer.is_some_and(|actor| actor.owns(post.author_id)) {
        return true;
    }
    is_publicly_visible(post, category, now)
}

/// Filter for listing `profile_user_id`'s posts as seen by `viewer`.
///
/// The owner gets every post they wrote; everyone else gets the public subset.
pub fn profile_filter(
    viewer: Option<&Actor>,
    profile_user_id: i64,
    now: DateTime<Utc>,
) -> PostFilter {
    let own = PostFilter::new().author(profile_user_id);
    if viewer.is_some_and(|actor| actor.owns(profile_user_id)) {
        own
    } else {
        public_filter(now).merge(own)
    }
}
