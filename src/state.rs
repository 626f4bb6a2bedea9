use std::sync::Arc;

use gatehouse_auth::TokenCodec;
use gatehouse_config::{Config, CorsConfig, PasswordConfig, ServerConfig};
use gatehouse_db::{PgUserRepository, UserRepository, init_db_pool, run_migrations};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn UserRepository>,
    pub tokens: TokenCodec,
    pub server_config: ServerConfig,
    pub cors_config: CorsConfig,
    pub password_config: PasswordConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("server_config", &self.server_config)
            .field("cors_config", &self.cors_config)
            .field("password_config", &self.password_config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(repository: Arc<dyn UserRepository>, config: &Config) -> Self {
        Self {
            repository,
            tokens: TokenCodec::new(&config.jwt),
            server_config: config.server.clone(),
            cors_config: config.cors.clone(),
            password_config: config.password.clone(),
        }
    }
}

/// Connects to Postgres, applies migrations and builds the state.
pub async fn init_app_state(config: &Config) -> anyhow::Result<AppState> {
    let pool = init_db_pool(&config.database).await?;
    run_migrations(&pool).await?;
    let repository = Arc::new(PgUserRepository::new(pool));
    Ok(AppState::new(repository, config))
}
