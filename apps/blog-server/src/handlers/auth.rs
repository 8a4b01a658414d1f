//! Account registration and login.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::NewUser;
use blogicum_core::forms::{self, RegistrationInput};
use blogicum_core::ports::AuthError;
use blogicum_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::views;

/// POST /auth/registration/
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = RegistrationInput {
        username: req.username.trim().to_string(),
        email: req.email.trim().to_string(),
        password: req.password,
    };

    forms::validate_registration(&input).map_err(AppError::Validation)?;

    let users = &state.blog.repositories().users;
    if users.find_by_username(&input.username).await?.is_some() {
        return Err(AppError::Conflict(
            "A user with that username already exists.".to_string(),
        ));
    }

    let password_hash = state.passwords.hash(&input.password)?;
    let user = users
        .create(NewUser {
            username: input.username,
            email: input.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let token = state.tokens.generate_token(user.id, &user.username)?;
    Ok(HttpResponse::Created().json(AuthResponse::bearer(
        token,
        state.tokens.expiration_seconds().max(0) as u64,
        views::user(&user),
    )))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .blog
        .repositories()
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %user.username, "Login refused");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.generate_token(user.id, &user.username)?;
    Ok(HttpResponse::Ok().json(AuthResponse::bearer(
        token,
        state.tokens.expiration_seconds().max(0) as u64,
        views::user(&user),
    )))
}
