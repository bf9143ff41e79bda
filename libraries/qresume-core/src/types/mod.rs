mod ids;
mod user;

pub use ids::UserId;
pub use user::{Details, DetailsUpdate, Platform, User};
