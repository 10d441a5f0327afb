//! Remote JSON authentication validator
//!
//! Implements the wiki plugin contract by delegating credential checks to a
//! remote JSON endpoint. One POST per attempt, no retries. Transport and
//! mapping failures propagate so the engine can fall back to local
//! authentication.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use serde_json::{Map, Value};

use crate::auth::plugin::AuthPlugin;
use crate::auth::results::UserRecord;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::host::{Clock, SystemClock, WikiUser, wiki_timestamp};

/// Authentication plugin backed by a remote JSON endpoint
///
/// Holds the record of the last authentication attempt so the engine's
/// follow-up `init_user` and `update_user` calls can read the real name
/// and email without a second round trip. One attempt per instance per
/// logical request, a fresh instance is the reset mechanism.
pub struct RemoteJsonAuth {
    config: Arc<AuthConfig>,
    client: reqwest::Client,
    clock: Box<dyn Clock>,
    user: Option<UserRecord>,
}

impl RemoteJsonAuth {
    /// Build a validator using the system clock
    pub fn new(config: Arc<AuthConfig>) -> Result<Self, AuthError> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Build a validator with an injected clock
    pub fn with_clock(config: Arc<AuthConfig>, clock: Box<dyn Clock>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            config,
            client,
            clock,
            user: None,
        })
    }

    /// Read a field of the authenticated user record by its contract name
    ///
    /// Valid names are `username`, `real_name` and `email`. Fails until an
    /// authentication attempt has populated the record.
    pub fn user_field(&self, name: &str) -> Result<&str, AuthError> {
        let record = self
            .user
            .as_ref()
            .ok_or_else(|| AuthError::InvalidField(name.to_string()))?;

        record
            .field(name)
            .ok_or_else(|| AuthError::InvalidField(name.to_string()))
    }

    /// Get the record of the last authentication attempt, if any
    pub fn user_record(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    /// Nest the credentials into the configured outbound body shape
    fn build_auth_data(&self, username: &str, password: &str) -> Value {
        let mapping = &self.config.request;

        let mut auth_data = Map::new();
        auth_data.insert(
            mapping.username_key.clone(),
            Value::String(username.to_string()),
        );
        auth_data.insert(
            mapping.password_key.clone(),
            Value::String(password.to_string()),
        );

        match mapping.base() {
            Some(base_key) => {
                let mut wrapped = Map::new();
                wrapped.insert(base_key.to_string(), Value::Object(auth_data));
                Value::Object(wrapped)
            }
            None => Value::Object(auth_data),
        }
    }

    /// Extract the user record from the parsed response body
    ///
    /// An absent base key, a JSON null or an empty object all mean the
    /// remote rejected the login and yield an all-empty record. A non-empty
    /// object must carry every mapped key.
    fn extract_user_data(&self, body: Value) -> Result<UserRecord, AuthError> {
        let mapping = &self.config.response;

        let unwrapped = match mapping.base() {
            Some(base_key) => body.get(base_key).cloned().unwrap_or(Value::Null),
            None => body,
        };

        if is_empty_value(&unwrapped) {
            return Ok(UserRecord::default());
        }

        let fields = unwrapped.as_object().ok_or_else(|| {
            AuthError::UnexpectedBody(format!(
                "expected a JSON object, got {}",
                json_type_name(&unwrapped)
            ))
        })?;

        Ok(UserRecord {
            username: required_string(fields, &mapping.username_key)?,
            real_name: required_string(fields, &mapping.real_name_key)?,
            email: required_string(fields, &mapping.email_key)?,
        })
    }

    /// Copy the authenticated record onto the wiki user object
    fn sync_user(&self, user: &mut dyn WikiUser) -> Result<(), AuthError> {
        user.set_real_name(self.user_field("real_name")?);
        user.set_email(self.user_field("email")?);
        user.set_email_authenticated(&wiki_timestamp(self.clock.now()));
        Ok(())
    }
}

#[async_trait]
impl AuthPlugin for RemoteJsonAuth {
    /// Authenticate with the remote JSON endpoint
    ///
    /// Overwrites the user record from the response. Success is a non-empty
    /// username in the mapped response body.
    async fn authenticate(&mut self, username: &str, password: &str) -> Result<bool, AuthError> {
        debug!(
            "Authenticating '{}' against {}",
            username, self.config.endpoint_url
        );

        let auth_data = self.build_auth_data(username, password);

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&auth_data)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = serde_json::from_str(&response.text().await?)?;
        let record = self.extract_user_data(body)?;

        let authenticated = !record.username.is_empty();
        self.user = Some(record);

        if authenticated {
            info!("Remote endpoint accepted '{}'", username);
        } else {
            info!("Remote endpoint rejected '{}'", username);
        }

        Ok(authenticated)
    }

    /// Existence checks are delegated entirely to the remote endpoint
    fn user_exists(&self, _username: &str) -> bool {
        true
    }

    fn init_user(&self, user: &mut dyn WikiUser, _autocreate: bool) -> Result<(), AuthError> {
        self.sync_user(user)
    }

    fn update_user(&self, user: &mut dyn WikiUser) -> Result<bool, AuthError> {
        self.sync_user(user)?;
        user.save_settings();
        Ok(true)
    }

    /// Remotely known users get a local account on first login
    fn auto_create(&self) -> bool {
        true
    }

    fn allow_prop_change(&self, _prop: &str) -> bool {
        false
    }

    fn allow_password_change(&self) -> bool {
        false
    }

    /// No password hash is ever stored in the local database
    fn allow_set_local_password(&self) -> bool {
        false
    }

    fn set_password(&self, _user: &mut dyn WikiUser, _password: &str) -> bool {
        false
    }

    /// Profile pushes to the external authority are a no-op success
    fn update_external_db(&self, _user: &mut dyn WikiUser) -> bool {
        true
    }

    fn update_external_db_groups(
        &self,
        _user: &mut dyn WikiUser,
        _add_groups: &[String],
        _del_groups: &[String],
    ) -> bool {
        true
    }

    fn can_create_accounts(&self) -> bool {
        false
    }

    fn add_user(
        &self,
        _user: &mut dyn WikiUser,
        _password: &str,
        _email: &str,
        _real_name: &str,
    ) -> bool {
        false
    }

    /// Local accounts such as the wiki admin may still log in locally
    fn strict(&self) -> bool {
        false
    }

    fn strict_user_auth(&self, _username: &str) -> bool {
        false
    }
}

/// True for the response values that mean "the remote rejected the login"
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Read a mapped key as a string, erroring on absence or a non-string value
fn required_string(fields: &Map<String, Value>, key: &str) -> Result<String, AuthError> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(AuthError::UnexpectedBody(format!(
            "field '{}' is not a string, got {}",
            key,
            json_type_name(other)
        ))),
        None => Err(AuthError::MissingField(key.to_string())),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RequestMapping, ResponseMapping};
    use serde_json::json;

    fn mapped_config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig {
            endpoint_url: "http://127.0.0.1/auth".to_string(),
            timeout_secs: 5,
            request: RequestMapping {
                base_key: "ReqBaseKey".to_string(),
                username_key: "ReqUsernameKey".to_string(),
                password_key: "ReqPasswordKey".to_string(),
            },
            response: ResponseMapping {
                base_key: "RespBaseKey".to_string(),
                username_key: "RespUsernameKey".to_string(),
                real_name_key: "RespRealNameKey".to_string(),
                email_key: "RespEmailKey".to_string(),
            },
        })
    }

    fn flat_config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig {
            endpoint_url: "http://127.0.0.1/auth".to_string(),
            timeout_secs: 5,
            request: RequestMapping::default(),
            response: ResponseMapping::default(),
        })
    }

    #[test]
    fn test_build_auth_data_with_base_key() {
        let validator = RemoteJsonAuth::new(mapped_config()).unwrap();
        let body = validator.build_auth_data("user123", "password456");

        assert_eq!(
            body,
            json!({
                "ReqBaseKey": {
                    "ReqUsernameKey": "user123",
                    "ReqPasswordKey": "password456",
                }
            })
        );
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_build_auth_data_without_base_key() {
        let validator = RemoteJsonAuth::new(flat_config()).unwrap();
        let body = validator.build_auth_data("alice", "secret");

        assert_eq!(body, json!({"username": "alice", "password": "secret"}));
        assert_eq!(body.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_credentials_are_forwarded_as_is() {
        let validator = RemoteJsonAuth::new(flat_config()).unwrap();
        let body = validator.build_auth_data("", "");

        assert_eq!(body, json!({"username": "", "password": ""}));
    }

    #[test]
    fn test_extract_full_record() {
        let validator = RemoteJsonAuth::new(mapped_config()).unwrap();
        let record = validator
            .extract_user_data(json!({
                "RespBaseKey": {
                    "RespUsernameKey": "Username",
                    "RespRealNameKey": "Real Name",
                    "RespEmailKey": "Email",
                }
            }))
            .unwrap();

        assert_eq!(
            record,
            UserRecord {
                username: "Username".to_string(),
                real_name: "Real Name".to_string(),
                email: "Email".to_string(),
            }
        );
    }

    #[test]
    fn test_extract_empty_object_yields_empty_record() {
        let validator = RemoteJsonAuth::new(mapped_config()).unwrap();
        let record = validator
            .extract_user_data(json!({"RespBaseKey": {}}))
            .unwrap();

        assert_eq!(record, UserRecord::default());
    }

    #[test]
    fn test_extract_absent_base_key_yields_empty_record() {
        let validator = RemoteJsonAuth::new(mapped_config()).unwrap();
        let record = validator
            .extract_user_data(json!({"unrelated": "value"}))
            .unwrap();

        assert_eq!(record, UserRecord::default());
    }

    #[test]
    fn test_extract_partial_object_is_missing_field() {
        let validator = RemoteJsonAuth::new(mapped_config()).unwrap();
        let result = validator.extract_user_data(json!({
            "RespBaseKey": {
                "RespUsernameKey": "Username",
                "RespRealNameKey": "Real Name",
            }
        }));

        match result {
            Err(AuthError::MissingField(key)) => assert_eq!(key, "RespEmailKey"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_non_object_base_value_is_rejected() {
        let validator = RemoteJsonAuth::new(mapped_config()).unwrap();
        let result = validator.extract_user_data(json!({"RespBaseKey": "yes"}));

        assert!(matches!(result, Err(AuthError::UnexpectedBody(_))));
    }

    #[test]
    fn test_extract_non_string_field_is_rejected() {
        let validator = RemoteJsonAuth::new(mapped_config()).unwrap();
        let result = validator.extract_user_data(json!({
            "RespBaseKey": {
                "RespUsernameKey": 42,
                "RespRealNameKey": "Real Name",
                "RespEmailKey": "Email",
            }
        }));

        assert!(matches!(result, Err(AuthError::UnexpectedBody(_))));
    }

    #[test]
    fn test_user_field_before_authentication() {
        let validator = RemoteJsonAuth::new(flat_config()).unwrap();

        assert!(matches!(
            validator.user_field("username"),
            Err(AuthError::InvalidField(_))
        ));
    }

    #[test]
    fn test_user_field_unknown_name() {
        let mut validator = RemoteJsonAuth::new(flat_config()).unwrap();
        validator.user = Some(UserRecord {
            username: "alice".to_string(),
            real_name: "Alice A.".to_string(),
            email: "a@example.com".to_string(),
        });

        assert_eq!(validator.user_field("username").unwrap(), "alice");
        assert!(matches!(
            validator.user_field("realName"),
            Err(AuthError::InvalidField(_))
        ));
        assert!(matches!(
            validator.user_field("password"),
            Err(AuthError::InvalidField(_))
        ));
    }
}
