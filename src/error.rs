//! Error types for Salonpanel

use thiserror::Error;

use crate::backend::ApiError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),

    #[error("Invalid response from auth server: {0}")]
    InvalidAuthResponse(String),

    #[error("Config file not found. Run 'salonpanel init' first.")]
    ConfigNotFound,
}

impl Error {
    /// HTTP status reported by the backend, if this error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Backend(err) => Some(err.status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
