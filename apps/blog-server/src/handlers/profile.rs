//! Profile page and profile editing.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::forms::ProfileInput;
use blogicum_shared::pages::ProfilePage;

use super::PageParams;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    username: web::Path<String>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let viewer = viewer.actor();
    let listing = state
        .blog
        .profile(viewer.as_ref(), &username, params.request(), Utc::now())
        .await?;

    let is_owner = viewer.is_some_and(|actor| actor.owns(listing.profile.id));
    let (posts, page) = views::listing(listing.page);

    Ok(views::render(ProfilePage {
        profile: views::user(&listing.profile),
        is_owner,
        posts,
        page,
    }))
}

/// GET /profile/edit/
pub async fn edit_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let outcome = state.blog.edit_profile(&identity.actor(), None).await?;
    Ok(views::respond(outcome, views::profile_form))
}

/// POST /profile/edit/
pub async fn edit_submit(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<ProfileInput>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .blog
        .edit_profile(&identity.actor(), Some(form.into_inner()))
        .await?;
    Ok(views::respond(outcome, views::profile_form))
}
