/// User domain types
use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user and their public profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Login email, unique across users
    pub email: String,

    /// bcrypt hash of the password
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Filesystem path of the combined QR code, once one was generated
    #[serde(rename = "qrCodePath")]
    pub qr_code_path: Option<String>,

    /// Profile links and generated QR code URLs
    pub details: Details,

    /// Account creation time
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user with an empty profile
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            email: email.into(),
            password_hash: password_hash.into(),
            name: String::new(),
            qr_code_path: None,
            details: Details::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Profile sub-record embedded in [`User`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub leetcode: String,
    #[serde(rename = "geeksforgeeks")]
    pub geeks_for_geeks: String,
    pub scaler: String,

    /// Static URL of the combined QR code
    #[serde(rename = "qrCodeUrl")]
    pub qr_code_url: String,
    #[serde(rename = "qrCodeLeetcode")]
    pub qr_code_leetcode: String,
    #[serde(rename = "qrCodeScaler")]
    pub qr_code_scaler: String,
    #[serde(rename = "qrCodeGeeksForGeeks")]
    pub qr_code_geeks_for_geeks: String,
}

impl Details {
    /// Profile link for a platform
    pub fn link(&self, platform: Platform) -> &str {
        match platform {
            Platform::LeetCode => &self.leetcode,
            Platform::Scaler => &self.scaler,
            Platform::GeeksForGeeks => &self.geeks_for_geeks,
        }
    }

    /// Set the QR code URL stored for a platform
    pub fn set_qr_code(&mut self, platform: Platform, url: impl Into<String>) {
        let slot = match platform {
            Platform::LeetCode => &mut self.qr_code_leetcode,
            Platform::Scaler => &mut self.qr_code_scaler,
            Platform::GeeksForGeeks => &mut self.qr_code_geeks_for_geeks,
        };
        *slot = url.into();
    }

    /// QR code URL stored for a platform (empty when none was generated)
    pub fn qr_code(&self, platform: Platform) -> &str {
        match platform {
            Platform::LeetCode => &self.qr_code_leetcode,
            Platform::Scaler => &self.qr_code_scaler,
            Platform::GeeksForGeeks => &self.qr_code_geeks_for_geeks,
        }
    }
}

/// Platforms that get their own QR code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    Scaler,
    GeeksForGeeks,
}

impl Platform {
    /// Every platform, in the order their query parameters appear
    pub const ALL: [Platform; 3] = [Platform::LeetCode, Platform::Scaler, Platform::GeeksForGeeks];

    /// Lowercase identifier used in file names and query strings
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::Scaler => "scaler",
            Platform::GeeksForGeeks => "geeksforgeeks",
        }
    }
}

/// Field-level update applied to a user looked up by email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsUpdate {
    pub name: String,
    pub details: Details,
    pub qr_code_path: Option<String>,
}
