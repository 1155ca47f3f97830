//! Cookie-backed session management
//!
//! The session is two opaque tokens held in http-only cookies. Storage is
//! injected through [`CookieStore`] so the same [`SessionStore`] runs
//! against a request's cookie jar in the web edge and an in-memory jar in
//! tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cookie holding the short-lived access token
pub const ACCESS_COOKIE_NAME: &str = "session_access_token";
/// Cookie holding the long-lived refresh token
pub const REFRESH_COOKIE_NAME: &str = "session_refresh_token";

/// Access cookie lifetime (2 hours)
pub const ACCESS_MAX_AGE_SECS: u64 = 2 * 60 * 60;
/// Refresh cookie lifetime (30 days)
pub const REFRESH_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// Attributes written alongside a cookie value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age: Option<u64>,
}

impl CookieOptions {
    /// Attributes shared by both session cookies
    pub fn session(secure: bool, max_age: u64) -> Self {
        Self {
            http_only: true,
            secure,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age: Some(max_age),
        }
    }

    /// Render a `Set-Cookie` header value
    pub fn to_set_cookie(&self, name: &str, value: &str) -> String {
        let mut header = format!("{}={}; Path={}", name, value, self.path);
        if let Some(max_age) = self.max_age {
            header.push_str(&format!("; Max-Age={}", max_age));
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header.push_str(&format!("; SameSite={}", self.same_site));
        header
    }

    /// Render a `Set-Cookie` header value that expires `name` immediately
    pub fn expired(name: &str) -> String {
        format!("{}=; Path=/; Max-Age=0", name)
    }
}

/// Key-value cookie jar the session is persisted in
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&self, name: &str, value: &str, options: &CookieOptions);

    /// Remove a cookie; removing an absent cookie is not an error
    fn delete(&self, name: &str);
}

impl<T: CookieStore + ?Sized> CookieStore for Arc<T> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        (**self).set(name, value, options)
    }

    fn delete(&self, name: &str) {
        (**self).delete(name)
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Cookie maps hold plain strings, a panicked writer cannot leave them torn
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A cookie as recorded by [`MemoryCookieStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCookie {
    pub value: String,
    pub options: CookieOptions,
}

/// In-memory cookie jar
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: Mutex<HashMap<String, StoredCookie>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value and attributes of a stored cookie
    pub fn cookie(&self, name: &str) -> Option<StoredCookie> {
        lock(&self.cookies).get(name).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.cookies).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.cookies).get(name).map(|c| c.value.clone())
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) {
        lock(&self.cookies).insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                options: options.clone(),
            },
        );
    }

    fn delete(&self, name: &str) {
        lock(&self.cookies).remove(name);
    }
}

/// Reads and writes the session token pair
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
    secure: bool,
}

impl<S: CookieStore> SessionStore<S> {
    /// Wrap a cookie jar; `secure` sets the `Secure` attribute on writes
    pub fn new(store: S, secure: bool) -> Self {
        Self { store, secure }
    }

    /// Store a fresh token pair, replacing any existing one
    pub fn create(&self, access_token: &str, refresh_token: &str) {
        self.store.set(
            ACCESS_COOKIE_NAME,
            access_token,
            &CookieOptions::session(self.secure, ACCESS_MAX_AGE_SECS),
        );
        self.store.set(
            REFRESH_COOKIE_NAME,
            refresh_token,
            &CookieOptions::session(self.secure, REFRESH_MAX_AGE_SECS),
        );
        tracing::info!("Session created");
    }

    /// Drop both tokens
    pub fn destroy(&self) {
        self.store.delete(ACCESS_COOKIE_NAME);
        self.store.delete(REFRESH_COOKIE_NAME);
        tracing::info!("Session destroyed");
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_COOKIE_NAME)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_COOKIE_NAME)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_read_session() {
        let session = SessionStore::new(MemoryCookieStore::new(), false);
        session.create("access-a", "refresh-r");

        assert_eq!(session.access_token().as_deref(), Some("access-a"));
        assert_eq!(session.refresh_token().as_deref(), Some("refresh-r"));
    }

    #[test]
    fn test_cookie_attributes() {
        let session = SessionStore::new(MemoryCookieStore::new(), true);
        session.create("a", "r");

        let access = session.store().cookie(ACCESS_COOKIE_NAME).unwrap();
        assert_eq!(access.options, CookieOptions::session(true, 7200));
        assert_eq!(access.options.same_site, SameSite::Lax);

        let refresh = session.store().cookie(REFRESH_COOKIE_NAME).unwrap();
        assert_eq!(refresh.options.max_age, Some(2_592_000));
        assert!(refresh.options.http_only);
        assert_eq!(refresh.options.path, "/");
    }

    #[test]
    fn test_create_overwrites() {
        let session = SessionStore::new(MemoryCookieStore::new(), false);
        session.create("a1", "r1");
        session.create("a2", "r2");

        assert_eq!(session.access_token().as_deref(), Some("a2"));
        assert_eq!(session.refresh_token().as_deref(), Some("r2"));
        assert_eq!(session.store().len(), 2);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let session = SessionStore::new(MemoryCookieStore::new(), false);
        session.create("a", "r");
        session.destroy();
        assert!(session.store().is_empty());

        session.destroy();
        assert!(session.store().is_empty());
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn test_set_cookie_rendering() {
        let header = CookieOptions::session(true, 7200).to_set_cookie(ACCESS_COOKIE_NAME, "tok");
        assert_eq!(
            header,
            "session_access_token=tok; Path=/; Max-Age=7200; HttpOnly; Secure; SameSite=Lax"
        );

        let header = CookieOptions::session(false, 2_592_000).to_set_cookie(REFRESH_COOKIE_NAME, "r");
        assert_eq!(
            header,
            "session_refresh_token=r; Path=/; Max-Age=2592000; HttpOnly; SameSite=Lax"
        );

        assert_eq!(
            CookieOptions::expired(ACCESS_COOKIE_NAME),
            "session_access_token=; Path=/; Max-Age=0"
        );
    }

    #[test]
    fn test_shared_store_through_arc() {
        let jar = Arc::new(MemoryCookieStore::new());
        let session = SessionStore::new(Arc::clone(&jar), false);
        session.create("a", "r");
        assert_eq!(jar.get(ACCESS_COOKIE_NAME).as_deref(), Some("a"));
    }
}
