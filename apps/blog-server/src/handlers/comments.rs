//! Comment add/edit/delete.

use actix_web::{HttpResponse, web};

use blogicum_core::forms::CommentInput;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

/// POST /posts/{id}/comment/
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<i64>,
    form: web::Form<CommentInput>,
) -> AppResult<HttpResponse> {
    let target = state
        .blog
        .add_comment(&identity.actor(), *post_id, form.into_inner())
        .await?;
    Ok(views::redirect(&target))
}

/// GET /posts/{id}/comment/{comment_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .blog
        .edit_comment(&identity.actor(), post_id, comment_id, None)
        .await?;
    Ok(views::respond(outcome, views::comment_form))
}

/// POST /posts/{id}/comment/{comment_id}/edit/
pub async fn edit_submit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
    form: web::Form<CommentInput>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .blog
        .edit_comment(
            &identity.actor(),
            post_id,
            comment_id,
            Some(form.into_inner()),
        )
        .await?;
    Ok(views::respond(outcome, views::comment_form))
}

/// GET /posts/{id}/comment/{comment_id}/delete/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .blog
        .delete_comment(&identity.actor(), post_id, comment_id, false)
        .await?;
    Ok(views::respond(outcome, views::comment_deletion))
}

/// POST /posts/{id}/comment/{comment_id}/delete/
pub async fn delete_submit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .blog
        .delete_comment(&identity.actor(), post_id, comment_id, true)
        .await?;
    Ok(views::respond(outcome, views::comment_deletion))
}
