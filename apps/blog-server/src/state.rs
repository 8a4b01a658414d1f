//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::BlogService;
use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_infra::{Argon2PasswordService, InMemoryBlogStore, JwtConfig, JwtTokenService};

use crate::config::AppConfig;
use crate::seed;

#[cfg(feature = "postgres")]
use blogicum_core::service::Repositories;
#[cfg(feature = "postgres")]
use blogicum_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use blogicum_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the state on PostgreSQL when configured and reachable, else on
    /// the in-memory store.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let blog = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => BlogService::new(postgres_repositories(&connections)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory_blog()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_blog()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let blog = {
            tracing::info!("Running without postgres feature - using in-memory store");
            in_memory_blog()
        };

        if config.seed_catalog {
            if let Err(e) = seed::seed(&blog, config.catalog_path.as_deref()).await {
                tracing::error!(error = %e, "Catalog seeding failed");
            }
        }

        tracing::info!("Application state initialized");

        Self::with_blog(blog, config.jwt.clone())
    }

    pub fn with_blog(blog: BlogService, jwt: JwtConfig) -> Self {
        Self {
            blog,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}

fn in_memory_blog() -> BlogService {
    BlogService::new(Arc::new(InMemoryBlogStore::new()).repositories())
}

#[cfg(feature = "postgres")]
fn postgres_repositories(connections: &DatabaseConnections) -> Repositories {
    let db = &connections.main;
    Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
        locations: Arc::new(PostgresLocationRepository::new(db.clone())),
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
    }
}
