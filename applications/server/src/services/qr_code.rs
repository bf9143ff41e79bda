/// QR code generation - renders profile links to PNG files on disk
use crate::{
    config::QrSettings,
    error::{Result, ServerError},
};
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use qresume_core::{Details, Platform, UserId};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

/// A QR code rendered in memory, ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQr {
    /// Where the PNG file goes
    pub path: PathBuf,
    /// URL the file is served under
    pub url: String,
    png: Vec<u8>,
}

impl GeneratedQr {
    /// Encoded PNG bytes
    pub fn png(&self) -> &[u8] {
        &self.png
    }
}

#[derive(Debug, Clone)]
pub struct QrCodeGenerator {
    output_dir: PathBuf,
    public_base_url: String,
    static_route: String,
    size: u32,
}

impl QrCodeGenerator {
    pub fn new(
        output_dir: PathBuf,
        public_base_url: impl Into<String>,
        static_route: impl Into<String>,
        size: u32,
    ) -> Self {
        Self {
            output_dir,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            static_route: static_route.into().trim_end_matches('/').to_string(),
            size,
        }
    }

    pub fn from_settings(settings: &QrSettings) -> Self {
        Self::new(
            settings.output_dir.clone(),
            settings.public_base_url.clone(),
            settings.static_route.clone(),
            settings.size,
        )
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    /// Link encoded in the combined QR code
    ///
    /// Always carries the three platform parameters in a fixed order so the
    /// same details produce the same URL.
    pub fn profile_url(&self, details: &Details) -> Result<String> {
        let base = format!("{}/user", self.public_base_url);
        let params = Platform::ALL.map(|platform| (platform.slug(), details.link(platform)));

        let url = Url::parse_with_params(&base, params)
            .map_err(|e| ServerError::QrCode(format!("Invalid profile URL {:?}: {}", base, e)))?;
        Ok(url.to_string())
    }

    /// Render the combined profile QR code for a user
    pub fn generate_combined(&self, user_id: &UserId, details: &Details) -> Result<GeneratedQr> {
        let data = self.profile_url(details)?;
        self.render(&file_name(user_id, "combined"), &data)
    }

    /// Render the QR code for a single platform link
    pub fn generate_platform(
        &self,
        user_id: &UserId,
        platform: Platform,
        link: &str,
    ) -> Result<GeneratedQr> {
        if link.is_empty() {
            return Err(ServerError::BadRequest(format!(
                "No {} link to encode",
                platform.slug()
            )));
        }
        self.render(&file_name(user_id, platform.slug()), link)
    }

    /// Write a rendered QR code to disk, replacing any previous file
    pub async fn save(&self, qr: &GeneratedQr) -> Result<()> {
        // The directory may have been removed after startup
        fs::create_dir_all(&self.output_dir).await?;
        fs::write(&qr.path, &qr.png).await?;
        tracing::info!("QR code saved at {}", qr.path.display());
        Ok(())
    }

    /// Delete a platform QR code if one exists
    pub async fn remove_platform(&self, user_id: &UserId, platform: Platform) -> Result<()> {
        let path = self.output_dir.join(file_name(user_id, platform.slug()));
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Removed stale QR code {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Encode `data` as a grayscale PNG
    pub fn encode_png(&self, data: &str) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)?;
        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(self.size, self.size)
            .build();

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    fn render(&self, file_name: &str, data: &str) -> Result<GeneratedQr> {
        Ok(GeneratedQr {
            png: self.encode_png(data)?,
            path: self.output_dir.join(file_name),
            url: format!("{}{}/{}", self.public_base_url, self.static_route, file_name),
        })
    }
}

/// File name for a user's QR code, e.g. `{user_id}_combined.png`
///
/// Keyed by user id rather than email so distinct accounts never share a file.
pub fn file_name(user_id: &UserId, suffix: &str) -> String {
    format!("{}_{}.png", user_id, suffix)
}
