/// Common test utilities and fixtures
use qresume_core::UserId;
use qresume_server::{
    config::{QrSettings, ServerConfig},
    services::{qr_code, PasswordHasher, QrCodeGenerator, UserService},
    state::AppState,
};
use qresume_storage::SqliteUserStore;
use std::{path::PathBuf, sync::Arc};
use tempfile::TempDir;

/// A service stack over a throwaway database file and QR directory
pub struct TestContext {
    pub state: AppState,
    pub qr: QrSettings,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

        let pool = qresume_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");
        qresume_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let mut qr = ServerConfig::default().qr;
        qr.output_dir = temp_dir.path().join("qrcodes");
        qr.size = 64;

        let qr_codes = QrCodeGenerator::from_settings(&qr);
        qr_codes.initialize().await.expect("Failed to create QR dir");

        let service = UserService::new(
            Arc::new(SqliteUserStore::new(pool)),
            // Minimum bcrypt cost keeps the tests fast
            PasswordHasher::new(4),
            qr_codes,
            fixtures::MIN_PASSWORD_LENGTH,
        );

        Self {
            state: AppState::new(Arc::new(service)),
            qr,
            _temp_dir: temp_dir,
        }
    }

    pub fn service(&self) -> &UserService {
        &self.state.user_service
    }

    /// Id of a registered user
    pub async fn user_id(&self, email: &str) -> UserId {
        self.service()
            .get_details(email)
            .await
            .expect("User should exist")
            .id
    }

    /// Where the QR code `{user_id}_{suffix}.png` lives
    pub fn qr_file(&self, user_id: &UserId, suffix: &str) -> PathBuf {
        self.qr.output_dir.join(qr_code::file_name(user_id, suffix))
    }
}

/// Test user credentials
pub mod fixtures {
    use qresume_server::services::ProfileUpdate;

    pub const MIN_PASSWORD_LENGTH: usize = 8;

    pub const TEST_EMAIL: &str = "ada@example.com";
    pub const TEST_PASSWORD: &str = "TestPassword123!";
    pub const WRONG_PASSWORD: &str = "WrongPassword456!";

    pub fn profile() -> ProfileUpdate {
        ProfileUpdate {
            name: "Ada Lovelace".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            linkedin: "https://linkedin.com/in/ada".to_string(),
            github: "https://github.com/ada".to_string(),
            leetcode: "https://leetcode.com/u/ada".to_string(),
            geeks_for_geeks: String::new(),
            scaler: "https://scaler.com/ada".to_string(),
        }
    }
}
