//! HTTP client for the REST backend
//!
//! [`BackendClient::fetch_with_auth`] attaches the session's bearer token and
//! recovers from an expired access token with a single refresh-and-replay.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;

use crate::auth::models::{RefreshRequest, TokenPair};
use crate::auth::session::{CookieStore, SessionStore};
use crate::config::BackendConfig;
use crate::error::Result;

/// Backend endpoint that exchanges a refresh token for a new pair
pub const REFRESH_PATH: &str = "/auth/refresh-token";

/// Options for a single backend call.
///
/// The body is kept as a string so the call can be replayed after a refresh.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<String>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Serialize `body` as the JSON request body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Add a header; caller headers override the defaults
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

fn bearer(token: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(&format!("Bearer {}", token)) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Access token is not a valid header value, sending without it");
            None
        }
    }
}

/// Default headers, bearer token, then caller headers on top
fn build_headers(access_token: Option<&str>, extra: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(value) = access_token.and_then(bearer) {
        headers.insert(AUTHORIZATION, value);
    }
    for (name, value) in extra {
        headers.insert(name.clone(), value.clone());
    }
    headers
}

/// Client for the REST backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client from configuration
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(http, &config.base_url))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, path: &str, options: &RequestOptions, headers: HeaderMap) -> Result<Response> {
        let mut request = self
            .http
            .request(options.method.clone(), self.url(path))
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }
        Ok(request.send().await?)
    }

    /// POST a JSON body without credentials
    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        let options = RequestOptions::post().json(body)?;
        self.send(path, &options, build_headers(None, &options.headers))
            .await
    }

    /// Perform one authenticated call.
    ///
    /// A 401 triggers at most one refresh; on success the call is replayed
    /// once with the new token and that response is returned whatever its
    /// status. If no refresh is possible the session is destroyed and the
    /// original 401 is returned. Only transport failures and an unreadable
    /// refresh body are errors.
    pub async fn fetch_with_auth<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response> {
        let access_token = session.access_token();
        let headers = build_headers(access_token.as_deref(), &options.headers);
        let response = self.send(path, &options, headers).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(refresh_token) = session.refresh_token() else {
            tracing::debug!("401 from {} with no refresh token, clearing session", path);
            session.destroy();
            return Ok(response);
        };

        let Some(pair) = self.refresh(&refresh_token).await? else {
            session.destroy();
            return Ok(response);
        };

        session.create(&pair.access_token, &pair.refresh_token);

        let mut headers = build_headers(Some(&pair.access_token), &options.headers);
        if let Some(value) = bearer(&pair.access_token) {
            headers.insert(AUTHORIZATION, value);
        }
        tracing::debug!("Replaying {} {} after token refresh", options.method, path);
        self.send(path, &options, headers).await
    }

    /// Exchange a refresh token; `None` when the backend refuses it.
    ///
    /// A success whose body is not a token pair is an error, and the session
    /// is left as it was.
    async fn refresh(&self, refresh_token: &str) -> Result<Option<TokenPair>> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response = self.post_json(REFRESH_PATH, &body).await?;

        if !response.status().is_success() {
            tracing::warn!("Token refresh rejected with status {}", response.status());
            return Ok(None);
        }

        let pair = response.json::<TokenPair>().await?;
        Ok(Some(pair))
    }
}
