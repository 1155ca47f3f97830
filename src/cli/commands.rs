//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::auth::{decode_claims, gate};
use crate::cli::{error, info, print_claims, print_decision, success, warn};
use crate::config::{self, loader::CONFIG_FILENAME, Config};

/// Initialize a new salonpanel.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Point [backend].base_url at the REST API and run 'salonpanel serve'");

    Ok(())
}

/// Start the web server
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Backend API: {}", config.backend.base_url));
    if !config.session.secure_cookies() {
        warn("Session cookies are not marked Secure (development environment)");
    }

    crate::web::run_server(config, &host, port).await?;
    Ok(())
}

/// Decode and print an access token's claims without verifying it
pub async fn inspect_token(token: &str) -> Result<()> {
    match decode_claims(token) {
        Ok(claims) => {
            print_claims(&claims);
            Ok(())
        }
        Err(e) => {
            error(&format!("Could not decode token: {}", e));
            Err(e.into())
        }
    }
}

/// Evaluate the route gate for a path and cookie pair
pub async fn check_route(path: &str, access: Option<String>, refresh: Option<String>) -> Result<()> {
    let decision = gate::evaluate(access.as_deref(), refresh.as_deref(), path);
    print_decision(path, &decision);
    if gate::is_orphaned_access(access.as_deref(), refresh.as_deref()) {
        warn("Access token without refresh token; the access cookie would be discarded");
    }
    Ok(())
}

fn load_config() -> Result<Config> {
    Ok(config::load_config()?)
}
