//! User queries
//!
//! All user state lives in one row: credentials, display name, the combined
//! QR code path and the `details_*` profile columns.

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use qresume_core::types::{Details, DetailsUpdate, User, UserId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const USER_COLUMNS: &str = "id, email, password_hash, name, qr_code_path,
    details_phone, details_linkedin, details_github, details_leetcode,
    details_geeks_for_geeks, details_scaler, details_qr_code_url,
    details_qr_code_leetcode, details_qr_code_scaler, details_qr_code_geeks_for_geeks,
    created_at, updated_at";

/// Insert a new user
///
/// A second user with the same email is rejected by the UNIQUE constraint
/// and reported as [`StorageError::Duplicate`].
pub async fn create(pool: &SqlitePool, user: &User) -> Result<()> {
    let details = &user.details;

    sqlx::query(
        "INSERT INTO users (
            id, email, password_hash, name, qr_code_path,
            details_phone, details_linkedin, details_github, details_leetcode,
            details_geeks_for_geeks, details_scaler, details_qr_code_url,
            details_qr_code_leetcode, details_qr_code_scaler, details_qr_code_geeks_for_geeks,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id.as_str())
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.name)
    .bind(&user.qr_code_path)
    .bind(&details.phone)
    .bind(&details.linkedin)
    .bind(&details.github)
    .bind(&details.leetcode)
    .bind(&details.geeks_for_geeks)
    .bind(&details.scaler)
    .bind(&details.qr_code_url)
    .bind(&details.qr_code_leetcode)
    .bind(&details.qr_code_scaler)
    .bind(&details.qr_code_geeks_for_geeks)
    .bind(user.created_at.timestamp())
    .bind(user.updated_at.timestamp())
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a user by email
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Get a user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(row_to_user).transpose()
}

/// Overwrite the name, profile details and QR code path of a user
///
/// Credentials, ID and creation time are left untouched.
pub async fn update_by_email(
    pool: &SqlitePool,
    email: &str,
    update: &DetailsUpdate,
) -> Result<User> {
    let details = &update.details;

    let result = sqlx::query(
        "UPDATE users SET
            name = ?,
            qr_code_path = ?,
            details_phone = ?,
            details_linkedin = ?,
            details_github = ?,
            details_leetcode = ?,
            details_geeks_for_geeks = ?,
            details_scaler = ?,
            details_qr_code_url = ?,
            details_qr_code_leetcode = ?,
            details_qr_code_scaler = ?,
            details_qr_code_geeks_for_geeks = ?,
            updated_at = ?
         WHERE email = ?",
    )
    .bind(&update.name)
    .bind(&update.qr_code_path)
    .bind(&details.phone)
    .bind(&details.linkedin)
    .bind(&details.github)
    .bind(&details.leetcode)
    .bind(&details.geeks_for_geeks)
    .bind(&details.scaler)
    .bind(&details.qr_code_url)
    .bind(&details.qr_code_leetcode)
    .bind(&details.qr_code_scaler)
    .bind(&details.qr_code_geeks_for_geeks)
    .bind(Utc::now().timestamp())
    .bind(email)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", email));
    }

    get_by_email(pool, email)
        .await?
        .ok_or_else(|| StorageError::not_found("User", email))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY email"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(row_to_user).collect()
}

fn row_to_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: UserId::new(row.try_get::<String, _>("id")?),
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        name: row.try_get("name")?,
        qr_code_path: row.try_get("qr_code_path")?,
        details: Details {
            phone: row.try_get("details_phone")?,
            linkedin: row.try_get("details_linkedin")?,
            github: row.try_get("details_github")?,
            leetcode: row.try_get("details_leetcode")?,
            geeks_for_geeks: row.try_get("details_geeks_for_geeks")?,
            scaler: row.try_get("details_scaler")?,
            qr_code_url: row.try_get("details_qr_code_url")?,
            qr_code_leetcode: row.try_get("details_qr_code_leetcode")?,
            qr_code_scaler: row.try_get("details_qr_code_scaler")?,
            qr_code_geeks_for_geeks: row.try_get("details_qr_code_geeks_for_geeks")?,
        },
        created_at: timestamp(row.try_get("created_at")?)?,
        updated_at: timestamp(row.try_get("updated_at")?)?,
    })
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StorageError::InvalidData(format!("Invalid timestamp: {}", secs)))
}
