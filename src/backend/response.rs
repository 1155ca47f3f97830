//! Backend response decoding

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::error::Result;

/// A non-success answer from the backend
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub body: Value,
}

impl ApiError {
    /// Build from a status and whatever body came back; the message is the
    /// body's `message` field when there is one.
    pub fn new(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("API error ({})", status));
        Self {
            status,
            message,
            body,
        }
    }
}

/// Parse a body as JSON, falling back to the raw text; empty is `null`
pub fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Read a response body leniently, see [`parse_body`]
pub async fn parse_json_safe(res: Response) -> Result<Value> {
    let text = res.text().await?;
    Ok(parse_body(&text))
}

/// Decode a successful body as `T`, anything else becomes an [`ApiError`]
pub async fn json_or_error<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let body = parse_json_safe(res).await?;
    if status.is_success() {
        Ok(serde_json::from_value(body)?)
    } else {
        Err(ApiError::new(status.as_u16(), body).into())
    }
}

/// Decode the body as `T` only on `expected`, e.g. `201 Created`
pub async fn json_with_status<T: DeserializeOwned>(res: Response, expected: StatusCode) -> Result<T> {
    let status = res.status();
    let body = parse_json_safe(res).await?;
    if status == expected {
        Ok(serde_json::from_value(body)?)
    } else {
        Err(ApiError::new(status.as_u16(), body).into())
    }
}

/// Succeed on any 2xx, ignoring the body
pub async fn expect_success(res: Response) -> Result<()> {
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }
    let body = parse_json_safe(res).await?;
    Err(ApiError::new(status.as_u16(), body).into())
}

/// Succeed only on `expected`, anything else becomes an [`ApiError`]
pub async fn expect_status(res: Response, expected: StatusCode) -> Result<()> {
    let status = res.status();
    if status == expected {
        return Ok(());
    }
    let body = parse_json_safe(res).await?;
    Err(ApiError::new(status.as_u16(), body).into())
}
