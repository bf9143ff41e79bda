/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// Range bcrypt accepts for its work factor
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_qr")]
    pub qr: QrSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Connection attempts made at startup before giving up
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    #[serde(default = "default_connect_retry_delay_secs")]
    pub connect_retry_delay_secs: u64,
}

impl StorageSettings {
    pub fn connect_retry_delay(&self) -> Duration {
        Duration::from_secs(self.connect_retry_delay_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QrSettings {
    /// Directory the PNG files are written to and served from
    #[serde(default = "default_qr_output_dir")]
    pub output_dir: PathBuf,

    /// Externally reachable origin, used in encoded links and static URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Route the output directory is mounted on
    #[serde(default = "default_static_route")]
    pub static_route: String,

    /// Minimum side length of the rendered image in pixels
    #[serde(default = "default_qr_size")]
    pub size: u32,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `config.toml` lookup; an explicit path
    /// that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables, e.g. QRESUME_SERVER__PORT=9000
        settings = settings.add_source(
            config::Environment::with_prefix("QRESUME")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST,
                self.auth.bcrypt_cost
            )));
        }

        if self.qr.size == 0 {
            return Err(ServerError::Config("QR code size must be positive".to_string()));
        }

        if !self.qr.static_route.starts_with('/') {
            return Err(ServerError::Config(format!(
                "QR static route must start with '/': {:?}",
                self.qr.static_route
            )));
        }

        url::Url::parse(&self.qr.public_base_url).map_err(|e| {
            ServerError::Config(format!(
                "invalid public base URL {:?}: {}",
                self.qr.public_base_url, e
            ))
        })?;

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        connect_retries: default_connect_retries(),
        connect_retry_delay_secs: default_connect_retry_delay_secs(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/qresume.db".to_string()
}

fn default_connect_retries() -> u32 {
    30
}

fn default_connect_retry_delay_secs() -> u64 {
    3
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        bcrypt_cost: default_bcrypt_cost(),
        min_password_length: default_min_password_length(),
    }
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_min_password_length() -> usize {
    8
}

fn default_qr() -> QrSettings {
    QrSettings {
        output_dir: default_qr_output_dir(),
        public_base_url: default_public_base_url(),
        static_route: default_static_route(),
        size: default_qr_size(),
    }
}

fn default_qr_output_dir() -> PathBuf {
    PathBuf::from("./data/qrcodes")
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_static_route() -> String {
    "/qrcodes".to_string()
}

fn default_qr_size() -> u32 {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            qr: default_qr(),
        }
    }
}
