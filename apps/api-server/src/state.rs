//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_core::service::{AccountService, ContentService, Repositories};
use blogicum_infra::InMemoryStore;
use blogicum_infra::auth::{Argon2PasswordService, JwtTokenService};
use blogicum_infra::database::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use blogicum_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use blogicum_infra::rate_limit::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentService,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    pub posts_per_page: u64,
    #[cfg(feature = "rate-limit")]
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build the application state, connecting to PostgreSQL when configured.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = open_repositories(config.database.as_ref()).await;
        let state = Self::with_repositories(repos, config);
        tracing::info!("Application state initialized");
        state
    }

    /// Wire services over an already constructed set of repositories.
    pub fn with_repositories(repos: Repositories, config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        Self {
            accounts: AccountService::new(repos.users.clone(), tokens.clone(), passwords),
            content: ContentService::new(repos),
            tokens,
            posts_per_page: config.posts_per_page,
            #[cfg(feature = "rate-limit")]
            rate_limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
        }
    }
}

#[cfg(feature = "postgres")]
async fn open_repositories(config: Option<&DatabaseConfig>) -> Repositories {
    use blogicum_infra::database::{connect, postgres_repositories};

    let Some(config) = config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return InMemoryStore::new().repositories();
    };

    match connect(config).await {
        Ok(conn) => postgres_repositories(conn),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            InMemoryStore::new().repositories()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn open_repositories(_config: Option<&DatabaseConfig>) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory store");
    InMemoryStore::new().repositories()
}
