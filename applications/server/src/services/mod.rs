/// Server services
pub mod password;
pub mod qr_code;
pub mod users;

pub use password::PasswordHasher;
pub use qr_code::{GeneratedQr, QrCodeGenerator};
pub use users::{ProfileUpdate, SignOn, UserService};
