//! Authentication result types
//!
//! Defines the user record produced by an authentication attempt.

/// User data extracted from the endpoint response
///
/// A non-empty `username` is the sole success signal. An all-empty record
/// means the remote rejected the credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub real_name: String,
    pub email: String,
}

impl UserRecord {
    /// Look up a field by its contract name
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "username" => Some(&self.username),
            "real_name" => Some(&self.real_name),
            "email" => Some(&self.email),
            _ => None,
        }
    }
}
