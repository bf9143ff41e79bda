/// Shared application state
use crate::{
    config::ServerConfig,
    error::Result,
    services::{PasswordHasher, QrCodeGenerator, UserService},
};
use qresume_storage::SqliteUserStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(user_service: Arc<UserService>) -> Self {
        Self { user_service }
    }

    /// Connect to the database, run migrations and prepare the QR directory
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let pool = qresume_storage::connect_with_retry(
            &config.storage.database_url,
            config.storage.connect_retries,
            config.storage.connect_retry_delay(),
        )
        .await?;
        qresume_storage::run_migrations(&pool).await?;
        tracing::info!("Database connected");

        let qr_codes = QrCodeGenerator::from_settings(&config.qr);
        qr_codes.initialize().await?;
        tracing::info!("QR code directory ready at {}", qr_codes.output_dir().display());

        let user_service = UserService::new(
            Arc::new(SqliteUserStore::new(pool)),
            PasswordHasher::new(config.auth.bcrypt_cost),
            qr_codes,
            config.auth.min_password_length,
        );

        Ok(Self::new(Arc::new(user_service)))
    }
}
