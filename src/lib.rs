pub mod auth;
pub mod config;
pub mod error;
pub mod host;

pub use auth::{AuthPlugin, RemoteJsonAuth, UserRecord};
pub use config::AuthConfig;
pub use error::AuthError;
