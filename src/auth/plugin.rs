//! Wiki plugin contract
//!
//! The method set the wiki engine expects every authentication plugin to
//! provide. The engine calls `authenticate` first and retrieves profile
//! fields through `init_user` and `update_user` afterwards. The remaining
//! methods answer policy questions about where identity truth lives.

use async_trait::async_trait;

use crate::error::AuthError;
use crate::host::WikiUser;

/// Authentication plugin interface dictated by the wiki engine
#[async_trait]
pub trait AuthPlugin {
    /// Check the credentials against the authority holding them.
    ///
    /// A transport or mapping failure propagates to the engine, which
    /// falls back to local authentication.
    async fn authenticate(&mut self, username: &str, password: &str) -> Result<bool, AuthError>;

    /// Whether the named user exists in the external authority.
    fn user_exists(&self, username: &str) -> bool;

    /// Populate a freshly created local user from the external data.
    fn init_user(&self, user: &mut dyn WikiUser, autocreate: bool) -> Result<(), AuthError>;

    /// Refresh a local user from the external data and persist it.
    fn update_user(&self, user: &mut dyn WikiUser) -> Result<bool, AuthError>;

    /// Whether a local account is created automatically on first login.
    fn auto_create(&self) -> bool;

    /// Whether the named user property may be changed locally.
    fn allow_prop_change(&self, prop: &str) -> bool;

    /// Whether passwords may be changed locally.
    fn allow_password_change(&self) -> bool;

    /// Whether a password hash may be stored in the local database.
    fn allow_set_local_password(&self) -> bool;

    /// Set the user's password in the external authority.
    fn set_password(&self, user: &mut dyn WikiUser, password: &str) -> bool;

    /// Push profile changes to the external authority.
    fn update_external_db(&self, user: &mut dyn WikiUser) -> bool;

    /// Push group membership changes to the external authority.
    fn update_external_db_groups(
        &self,
        user: &mut dyn WikiUser,
        add_groups: &[String],
        del_groups: &[String],
    ) -> bool;

    /// Whether accounts can be created in the external authority.
    fn can_create_accounts(&self) -> bool;

    /// Add a user to the external authority.
    fn add_user(
        &self,
        user: &mut dyn WikiUser,
        password: &str,
        email: &str,
        real_name: &str,
    ) -> bool;

    /// Whether local password fallback is disabled for all users.
    fn strict(&self) -> bool;

    /// Whether local password fallback is disabled for the named user.
    fn strict_user_auth(&self, username: &str) -> bool;
}
