//! Route authorization gate
//!
//! A pure decision over the two session cookies and the request path. It
//! performs no I/O and never touches the session; the caller turns a
//! [`GateDecision::Redirect`] into an actual response.

use url::form_urlencoded;

use crate::auth::claims::{decode_claims, DEFAULT_HOME};
use crate::auth::models::Role;

/// Login page unauthenticated visitors are sent to
pub const LOGIN_PATH: &str = "/login";

/// Path prefixes that require a session
pub const PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/profile",
    "/settings",
    "/admin",
    "/manager",
    "/staff",
];

/// Path prefixes for login and registration flows
pub const AUTH_PREFIXES: &[&str] = &["/login", "/register", "/auth/login", "/auth/register"];

/// Area-scoped prefixes and the roles allowed in each
const AREA_ROLES: &[(&str, &[Role])] = &[
    ("/admin", &[Role::SysAdmin, Role::Admin]),
    ("/manager", &[Role::Owner, Role::Manager]),
    ("/staff", &[Role::Staff]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    Auth,
    Public,
}

impl RouteClass {
    pub fn classify(path: &str) -> Self {
        if PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
            RouteClass::Protected
        } else if AUTH_PREFIXES.iter().any(|p| path.starts_with(p)) {
            RouteClass::Auth
        } else {
            RouteClass::Public
        }
    }
}

/// Outcome of a gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(String),
}

impl GateDecision {
    fn redirect(target: impl Into<String>) -> Self {
        GateDecision::Redirect(target.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, GateDecision::Pass)
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            GateDecision::Pass => None,
            GateDecision::Redirect(target) => Some(target),
        }
    }
}

/// Login URL that brings the visitor back to `path` afterwards
pub fn login_redirect(path: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{}?callbackUrl={}", LOGIN_PATH, encoded)
}

/// Decide whether a request for `path` may proceed.
pub fn evaluate(access_token: Option<&str>, refresh_token: Option<&str>, path: &str) -> GateDecision {
    let class = RouteClass::classify(path);

    match (refresh_token, access_token) {
        (None, _) if class == RouteClass::Protected => GateDecision::redirect(login_redirect(path)),
        (Some(_), Some(access)) => evaluate_session(access, class, path),
        // Access token expired but the session can still be refreshed
        (Some(_), None) if class == RouteClass::Auth => GateDecision::redirect(DEFAULT_HOME),
        _ => GateDecision::Pass,
    }
}

fn evaluate_session(access_token: &str, class: RouteClass, path: &str) -> GateDecision {
    let claims = match decode_claims(access_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("Undecodable access token on {}: {}", path, e);
            return if class == RouteClass::Protected {
                GateDecision::redirect(LOGIN_PATH)
            } else {
                GateDecision::Pass
            };
        }
    };

    let home = claims.default_role_path();

    if class == RouteClass::Auth {
        return GateDecision::redirect(home);
    }

    let denied = AREA_ROLES
        .iter()
        .any(|(prefix, roles)| path.starts_with(prefix) && !claims.roles.contains_any(roles));

    if denied {
        GateDecision::redirect(home)
    } else {
        GateDecision::Pass
    }
}

/// An access cookie without its refresh cookie is not a usable session
pub fn is_orphaned_access(access_token: Option<&str>, refresh_token: Option<&str>) -> bool {
    access_token.is_some() && refresh_token.is_none()
}
