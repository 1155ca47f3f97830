//! Unverified access token claim decoding
//!
//! The panel never holds the signing key. Claims read here only drive
//! routing; the backend remains the authority on every API call.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::models::{Role, RoleSet};

/// Landing route for administrators
pub const ADMIN_HOME: &str = "/admin/organisations";
/// Landing route for owners and managers
pub const MANAGER_HOME: &str = "/manager/dashboard";
/// Landing route for staff
pub const STAFF_HOME: &str = "/staff/appointments";
/// Landing route when no known role is present
pub const DEFAULT_HOME: &str = "/dashboard";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token has no payload segment")]
    MissingPayload,

    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not a JSON claims object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims read from the middle segment of an access token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub roles: RoleSet,
    pub iat: Option<i64>,
    pub exp: Option<i64>,
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    roles: Option<RoleSet>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

impl Claims {
    /// Route a user holding these claims lands on
    pub fn default_role_path(&self) -> &'static str {
        default_role_path(&self.roles)
    }
}

/// Decode the claims of a three-part token without checking its signature.
///
/// Both base64 alphabets are accepted, with or without padding.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(DecodeError::MissingPayload)?;

    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD.decode(normalized.as_bytes())?;
    let raw: RawClaims = serde_json::from_slice(&bytes)?;

    Ok(Claims {
        sub: raw.sub,
        email: raw.email,
        roles: raw.roles.unwrap_or_default(),
        iat: raw.iat,
        exp: raw.exp,
    })
}

/// Highest-priority landing route for a role set
pub fn default_role_path(roles: &RoleSet) -> &'static str {
    if roles.contains_any(&[Role::SysAdmin, Role::Admin]) {
        ADMIN_HOME
    } else if roles.contains_any(&[Role::Owner, Role::Manager]) {
        MANAGER_HOME
    } else if roles.contains(Role::Staff) {
        STAFF_HOME
    } else {
        DEFAULT_HOME
    }
}
