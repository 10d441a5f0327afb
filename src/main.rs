//! Wiki JSON Auth - Credential Check Entry Point
//!
//! Checks a username/password pair against the configured remote endpoint,
//! over the same call path the wiki plugin uses.

use std::process;
use std::sync::Arc;

use log::{error, info};

use wiki_json_auth::auth::AuthPlugin;
use wiki_json_auth::{AuthConfig, RemoteJsonAuth};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let Some(username) = std::env::args().nth(1) else {
        eprintln!("Usage: wiki-json-auth <username>");
        process::exit(2);
    };

    let config = match AuthConfig::load() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(2);
        }
    };

    let password = match rpassword::prompt_password("Password: ") {
        Ok(password) => password,
        Err(e) => {
            error!("Failed to read password: {}", e);
            process::exit(2);
        }
    };

    info!(
        "Checking credentials for '{}' against {}",
        username, config.endpoint_url
    );

    let mut plugin = match RemoteJsonAuth::new(config) {
        Ok(plugin) => plugin,
        Err(e) => {
            error!("Failed to build the validator: {}", e);
            process::exit(2);
        }
    };

    match plugin.authenticate(&username, &password).await {
        Ok(true) => {
            // Field reads cannot fail once a successful attempt populated the record
            println!("Authenticated: {}", plugin.user_field("username").unwrap_or(""));
            println!("Real name:     {}", plugin.user_field("real_name").unwrap_or(""));
            println!("Email:         {}", plugin.user_field("email").unwrap_or(""));
        }
        Ok(false) => {
            println!("Authentication denied");
            process::exit(1);
        }
        Err(e) => {
            error!("Authentication attempt failed: {}", e);
            process::exit(2);
        }
    }
}
