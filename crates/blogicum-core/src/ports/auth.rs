//! Authentication ports: bearer tokens and password hashes.

/// What a valid bearer token says about its holder.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: i64,
    /// Username at issue time; may be stale after a profile rename.
    pub username: String,
    pub exp: i64,
}

/// Issues and checks bearer tokens.
pub trait TokenService: Send + Sync {
    fn generate_token(&self, user_id: i64, username: &str) -> Result<String, AuthError>;

    /// Decode `token`, rejecting bad signatures, foreign issuers and expired tokens.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of freshly issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Hashes account passwords.
pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on a wrong password; `Err` only for an unreadable hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing bearer token")]
    MissingAuth,

    #[error("Password hashing failed: {0}")]
    HashingError(String),
}
