//! QResume Server Library
//!
//! Registers users, stores their profile links and turns those links into
//! QR codes served back as PNG files.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{PasswordHasher, QrCodeGenerator, SignOn, UserService};
pub use state::AppState;
