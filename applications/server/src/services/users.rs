/// User service - sign-on, login, profile updates and QR code lookup
use crate::{
    error::{Result, ServerError},
    services::{GeneratedQr, PasswordHasher, QrCodeGenerator},
};
use qresume_core::{Details, DetailsUpdate, Platform, User, UserStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;

const MAX_EMAIL_LENGTH: usize = 255;
const MAX_NAME_LENGTH: usize = 40;
const MAX_PHONE_LENGTH: usize = 20;
const MAX_LINK_LENGTH: usize = 255;
// bcrypt ignores everything past this many bytes
const MAX_PASSWORD_BYTES: usize = 72;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Outcome of a sign-on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOn {
    /// A new account was created
    Registered(User),
    /// The email was already registered and the password matched
    LoggedIn(User),
}

impl SignOn {
    pub fn user(&self) -> &User {
        match self {
            SignOn::Registered(user) | SignOn::LoggedIn(user) => user,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            SignOn::Registered(_) => "registered",
            SignOn::LoggedIn(_) => "logged_in",
        }
    }
}

/// Profile fields supplied by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub leetcode: String,
    pub geeks_for_geeks: String,
    pub scaler: String,
}

pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    qr_codes: QrCodeGenerator,
    min_password_length: usize,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        qr_codes: QrCodeGenerator,
        min_password_length: usize,
    ) -> Self {
        Self {
            store,
            hasher,
            qr_codes,
            min_password_length,
        }
    }

    pub fn qr_codes(&self) -> &QrCodeGenerator {
        &self.qr_codes
    }

    /// Register a new user, or log in if the email is already taken
    ///
    /// Registration and login share one entry point: a duplicate email is
    /// not a conflict but a login attempt with the supplied password.
    pub async fn sign_on(&self, email: &str, password: &str) -> Result<SignOn> {
        validate_email(email)?;
        self.validate_password(password)?;

        let password_hash = self.hasher.hash(password)?;
        let user = User::new(email, password_hash);

        match self.store.create_user(&user).await {
            Ok(()) => {
                tracing::info!("Registered user {}", user.id);
                Ok(SignOn::Registered(user))
            }
            Err(e) if e.is_duplicate() => {
                tracing::debug!("{} already registered, trying login", email);
                self.login(email, password).await.map(SignOn::LoggedIn)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials
    ///
    /// An unknown email and a wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| ServerError::Auth(INVALID_CREDENTIALS.to_string()))?;

        self.check_password(&user, password)?;
        Ok(user)
    }

    /// Replace a user's profile and regenerate their QR codes
    ///
    /// The combined code is always rewritten. Platform codes are written for
    /// every non-empty LeetCode, Scaler and GeeksForGeeks link and removed for
    /// empty ones. Codes are rendered before the record is stored and only
    /// touch the disk once the store accepted the update.
    pub async fn update_details(
        &self,
        email: &str,
        password: &str,
        profile: ProfileUpdate,
    ) -> Result<User> {
        validate_email(email)?;
        self.validate_password(password)?;
        validate_profile(&profile)?;

        let user = self.get_details(email).await?;
        self.check_password(&user, password)?;

        let mut details = Details {
            phone: profile.phone,
            linkedin: profile.linkedin,
            github: profile.github,
            leetcode: profile.leetcode,
            geeks_for_geeks: profile.geeks_for_geeks,
            scaler: profile.scaler,
            ..Details::default()
        };

        let combined = self.qr_codes.generate_combined(&user.id, &details)?;
        details.qr_code_url = combined.url.clone();
        let qr_code_path = combined.path.to_string_lossy().into_owned();

        let mut rendered = vec![combined];
        let mut stale = Vec::new();
        for platform in Platform::ALL {
            let link = details.link(platform);
            if link.is_empty() {
                stale.push(platform);
            } else {
                let generated = self.qr_codes.generate_platform(&user.id, platform, link)?;
                details.set_qr_code(platform, generated.url.clone());
                rendered.push(generated);
            }
        }

        let update = DetailsUpdate {
            name: profile.name,
            details,
            qr_code_path: Some(qr_code_path),
        };

        let updated = self.store.update_by_email(email, &update).await?;

        if let Err(e) = self.write_qr_codes(&updated, &rendered, &stale).await {
            tracing::error!(
                "Stored details for user {} but failed to write QR codes: {}",
                updated.id,
                e
            );
            return Err(e);
        }

        tracing::info!("Updated details for user {}", updated.id);
        Ok(updated)
    }

    /// Fetch a user by email
    pub async fn get_details(&self, email: &str) -> Result<User> {
        self.store
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| ServerError::NotFound(format!("User not found: {}", email)))
    }

    /// Path of the user's combined QR code, if it still exists on disk
    pub async fn qr_code_path(&self, email: &str) -> Result<PathBuf> {
        let user = self.get_details(email).await?;
        let not_found = || ServerError::NotFound(format!("QR code not found for user {}", email));

        let path = user.qr_code_path.map(PathBuf::from).ok_or_else(not_found)?;

        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            _ => {
                tracing::warn!("QR code for {} missing at {}", email, path.display());
                Err(not_found())
            }
        }
    }

    /// Every stored user
    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.store.get_all_users().await?)
    }

    async fn write_qr_codes(
        &self,
        user: &User,
        rendered: &[GeneratedQr],
        stale: &[Platform],
    ) -> Result<()> {
        for qr in rendered {
            self.qr_codes.save(qr).await?;
        }
        for &platform in stale {
            self.qr_codes.remove_platform(&user.id, platform).await?;
        }
        Ok(())
    }

    fn check_password(&self, user: &User, password: &str) -> Result<()> {
        if self.hasher.verify(password, &user.password_hash)? {
            Ok(())
        } else {
            Err(ServerError::Auth(INVALID_CREDENTIALS.to_string()))
        }
    }

    fn validate_password(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.min_password_length {
            return Err(ServerError::BadRequest(format!(
                "password must be at least {} characters",
                self.min_password_length
            )));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(ServerError::BadRequest(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        Ok(())
    }
}

/// Loose structural check: `local@domain.tld`, no whitespace or path separators
pub fn validate_email(email: &str) -> Result<()> {
    let invalid = || ServerError::BadRequest(format!("invalid email address: {:?}", email));

    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(invalid());
    }
    if email
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\'))
    {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}

fn validate_profile(profile: &ProfileUpdate) -> Result<()> {
    check_length("name", &profile.name, MAX_NAME_LENGTH)?;
    check_length("phone", &profile.phone, MAX_PHONE_LENGTH)?;
    check_length("linkedin", &profile.linkedin, MAX_LINK_LENGTH)?;
    check_length("github", &profile.github, MAX_LINK_LENGTH)?;
    check_length("leetcode", &profile.leetcode, MAX_LINK_LENGTH)?;
    check_length("geeksforgeeks", &profile.geeks_for_geeks, MAX_LINK_LENGTH)?;
    check_length("scaler", &profile.scaler, MAX_LINK_LENGTH)
}

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(ServerError::BadRequest(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
