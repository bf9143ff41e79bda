//! QResume Core
//!
//! Domain types, the storage trait, and error handling shared by the
//! QResume storage layer and HTTP server.
//!
//! # Example
//!
//! ```rust
//! use qresume_core::types::{Details, User};
//!
//! let mut user = User::new("ada@example.com", "$2b$12$hash");
//! user.details = Details {
//!     github: "https://github.com/ada".to_string(),
//!     ..Details::default()
//! };
//! assert!(user.qr_code_path.is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod types;

pub use error::{CoreError, Result};
pub use storage::UserStore;
pub use types::{Details, DetailsUpdate, Platform, User, UserId};

#[cfg(feature = "mock")]
pub use storage::MockUserStore;
