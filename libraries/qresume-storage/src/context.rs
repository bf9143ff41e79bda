use crate::users;
use async_trait::async_trait;
use qresume_core::{error::Result, storage::UserStore, types::*};
use sqlx::SqlitePool;

/// `UserStore` backed by a `SQLite` pool
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        Ok(users::create(&self.pool, user).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(users::get_by_email(&self.pool, email).await?)
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(users::get_by_id(&self.pool, id).await?)
    }

    async fn update_by_email(&self, email: &str, update: &DetailsUpdate) -> Result<User> {
        Ok(users::update_by_email(&self.pool, email, update).await?)
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        Ok(users::get_all(&self.pool).await?)
    }
}
