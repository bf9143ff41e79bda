//! Storage trait for user records

use crate::error::Result;
use crate::types::{DetailsUpdate, User};
use async_trait::async_trait;

/// Access to the single `users` table
///
/// Implemented by the SQLite layer; the server only talks to this trait so
/// services can be tested against a mock.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user
    ///
    /// Fails with [`CoreError::Duplicate`](crate::CoreError::Duplicate) when
    /// the email is already registered.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Look a user up by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look a user up by ID
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Apply a field-level update to the user with this email
    ///
    /// Returns the updated record, or `NotFound` if no user matched.
    async fn update_by_email(&self, email: &str, update: &DetailsUpdate) -> Result<User>;

    /// Get all users ordered by email
    async fn get_all_users(&self) -> Result<Vec<User>>;
}
