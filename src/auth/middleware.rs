//! Authentication middleware and the per-request cookie jar

use std::collections::HashMap;
use std::sync::Mutex;

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::gate::{evaluate, is_orphaned_access, GateDecision};
use crate::auth::session::{
    lock, CookieOptions, CookieStore, ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME,
};

/// Path prefixes the gate never runs on
const UNGATED_PREFIXES: &[&str] = &["/api", "/static", "/favicon.ico"];

/// Whether the route gate applies to `path`
pub fn is_gated(path: &str) -> bool {
    !UNGATED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Parse every `Cookie` header into name/value pairs.
///
/// On a repeated name the first occurrence wins; browsers list the cookie
/// with the most specific path first.
pub fn parse_cookie_header(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(cookie_str) = value.to_str() else {
            continue;
        };
        for cookie in cookie_str.split(';') {
            if let Some((name, value)) = cookie.trim().split_once('=') {
                cookies
                    .entry(name.trim().to_string())
                    .or_insert_with(|| value.trim().to_string());
            }
        }
    }
    cookies
}

/// Cookie jar for a single request.
///
/// Reads come from the inbound `Cookie` header (overlaid with writes made
/// during the request); every write is queued as a `Set-Cookie` header for
/// the response.
#[derive(Debug, Default)]
pub struct RequestCookies {
    values: Mutex<HashMap<String, String>>,
    pending: Mutex<Vec<String>>,
}

impl RequestCookies {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            values: Mutex::new(parse_cookie_header(headers)),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// `Set-Cookie` values queued so far
    pub fn set_cookie_headers(&self) -> Vec<String> {
        lock(&self.pending).clone()
    }

    /// Append queued `Set-Cookie` headers to a response
    pub fn apply(&self, response: &mut Response) {
        for cookie in lock(&self.pending).iter() {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => tracing::warn!("Dropping unrepresentable cookie header: {}", e),
            }
        }
    }
}

impl CookieStore for RequestCookies {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.values).get(name).cloned()
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        lock(&self.values).insert(name.to_string(), value.to_string());
        lock(&self.pending).push(options.to_set_cookie(name, value));
    }

    fn delete(&self, name: &str) {
        lock(&self.values).remove(name);
        lock(&self.pending).push(CookieOptions::expired(name));
    }
}

/// Run the route gate before any page handler
pub async fn route_gate(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    if !is_gated(&path) {
        return next.run(req).await;
    }

    let cookies = parse_cookie_header(req.headers());
    let access = cookies.get(ACCESS_COOKIE_NAME).map(String::as_str);
    let refresh = cookies.get(REFRESH_COOKIE_NAME).map(String::as_str);
    let orphaned = is_orphaned_access(access, refresh);

    let mut response = match evaluate(access, refresh, &path) {
        GateDecision::Pass => next.run(req).await,
        GateDecision::Redirect(target) => {
            tracing::debug!("Gate redirecting {} -> {}", path, target);
            Redirect::temporary(&target).into_response()
        }
    };

    if orphaned {
        tracing::debug!("Discarding access cookie without refresh cookie");
        if let Ok(value) = HeaderValue::from_str(&CookieOptions::expired(ACCESS_COOKIE_NAME)) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gated() {
        assert!(is_gated("/"));
        assert!(is_gated("/admin/organisations"));
        assert!(!is_gated("/api/health"));
        assert!(!is_gated("/favicon.ico"));
    }

    #[test]
    fn test_parse_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_access_token=a.b.c; session_refresh_token=r; theme=dark"),
        );
        let cookies = parse_cookie_header(&headers);
        assert_eq!(cookies.get("session_access_token").map(String::as_str), Some("a.b.c"));
        assert_eq!(cookies.get("session_refresh_token").map(String::as_str), Some("r"));
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn test_duplicate_cookie_keeps_first() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_refresh_token=specific; session_refresh_token=root"),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("session_refresh_token=later"));

        let cookies = parse_cookie_header(&headers);
        assert_eq!(cookies.get(REFRESH_COOKIE_NAME).map(String::as_str), Some("specific"));
    }

    #[test]
    fn test_request_cookies_queue_writes() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_refresh_token=old"));
        let jar = RequestCookies::from_headers(&headers);

        assert_eq!(jar.get(REFRESH_COOKIE_NAME).as_deref(), Some("old"));
        jar.set(REFRESH_COOKIE_NAME, "new", &CookieOptions::session(false, 60));
        assert_eq!(jar.get(REFRESH_COOKIE_NAME).as_deref(), Some("new"));

        jar.delete(ACCESS_COOKIE_NAME);
        let pending = jar.set_cookie_headers();
        assert_eq!(pending.len(), 2);
        assert!(pending[0].starts_with("session_refresh_token=new;"));
        assert_eq!(pending[1], "session_access_token=; Path=/; Max-Age=0");
    }

    #[test]
    fn test_apply_appends_set_cookie() {
        let jar = RequestCookies::default();
        jar.set(ACCESS_COOKIE_NAME, "a", &CookieOptions::session(false, 7200));
        jar.set(REFRESH_COOKIE_NAME, "r", &CookieOptions::session(false, 2_592_000));

        let mut response = Response::new(axum::body::Body::empty());
        jar.apply(&mut response);
        assert_eq!(response.headers().get_all(header::SET_COOKIE).iter().count(), 2);
    }
}
