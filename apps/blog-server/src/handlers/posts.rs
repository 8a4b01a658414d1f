//! Listings, post detail and post create/edit/delete.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::forms::PostInput;
use blogicum_shared::pages::{CategoryPage, PostDetailPage, PostListPage};

use super::PageParams;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let page = state.blog.index(params.request(), Utc::now()).await?;
    let (posts, page) = views::listing(page);

    Ok(views::render(PostListPage { posts, page }))
}

/// GET /category/{slug}/
pub async fn category_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let listing = state
        .blog
        .category_posts(&slug, params.request(), Utc::now())
        .await?;
    let (posts, page) = views::listing(listing.page);

    Ok(views::render(CategoryPage {
        category: views::category(listing.category),
        posts,
        page,
    }))
}

/// GET /posts/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let detail = state
        .blog
        .post_detail(viewer.actor().as_ref(), *post_id, Utc::now())
        .await?;

    Ok(views::render(PostDetailPage {
        post: views::post(detail.post),
        comments: detail.comments.into_iter().map(views::comment).collect(),
        form: views::comment_fields(detail.form),
    }))
}

/// GET /posts/create/
pub async fn create_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let outcome = state.blog.create_post(&identity.actor(), None).await?;
    Ok(views::respond(outcome, views::post_form))
}

/// POST /posts/create/
pub async fn create_submit(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostInput>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .create_post(&identity.actor(), Some(form.into_inner()))
        .await?;
    Ok(views::respond(outcome, views::post_form))
}

/// GET /posts/{id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .edit_post(&identity.actor(), *post_id, None)
        .await?;
    Ok(views::respond(outcome, views::post_form))
}

/// POST /posts/{id}/edit/
pub async fn edit_submit(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
    form: web::Form<PostInput>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .edit_post(&identity.actor(), *post_id, Some(form.into_inner()))
        .await?;
    Ok(views::respond(outcome, views::post_form))
}

/// GET /posts/{id}/delete/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .delete_post(&identity.actor(), *post_id, false)
        .await?;
    Ok(views::respond(outcome, views::post_deletion))
}

/// POST /posts/{id}/delete/
pub async fn delete_submit(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .delete_post(&identity.actor(), *post_id, true)
        .await?;
    Ok(views::respond(outcome, views::post_deletion))
}
