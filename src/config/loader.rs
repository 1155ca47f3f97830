//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "salonpanel.toml";

/// Locate `salonpanel.toml` and load it
pub fn load_config() -> Result<Config> {
    let path = find_config_file()?;
    tracing::debug!("Loading configuration from {}", path.display());
    load_config_from_path(&path)
}

/// Load configuration from an explicit file
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    Ok(toml::from_str(&interpolate_env_vars(&raw)?)?)
}

/// Walk up from the working directory until a config file turns up
fn find_config_file() -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;
    cwd.ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
        .ok_or(Error::ConfigNotFound)
}

const ENV_VAR_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}";

/// Expand `${VAR}` and `${VAR:-default}`; unset variables without a default become empty
fn interpolate_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(ENV_VAR_PATTERN).map_err(|e| Error::Config(e.to_string()))?;
    Ok(re
        .replace_all(content, |caps: &regex::Captures| {
            let fallback = caps.get(2).map_or("", |m| m.as_str());
            env::var(&caps[1]).unwrap_or_else(|_| fallback.to_string())
        })
        .into_owned())
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Salonpanel Configuration

[server]
host = "0.0.0.0"
port = 3000

[backend]
# REST API the panel proxies authenticated calls to
base_url = "${API_URL:-http://localhost:3001}"
timeout_secs = 30

[session]
# "production" marks the session cookies as Secure
environment = "${APP_ENV:-development}"
"#
}
