//! Login, registration, one-time-code verification and logout

use crate::auth::claims::{decode_claims, DEFAULT_HOME};
use crate::auth::gate::LOGIN_PATH;
use crate::auth::models::{
    LoginRequest, RefreshRequest, RegisterRequest, VerifyOtpRequest, VerifyOtpResponse,
};
use crate::auth::session::{CookieStore, SessionStore};
use crate::backend::response::{json_or_error, parse_json_safe};
use crate::backend::{ApiError, BackendClient};
use crate::error::{Error, Result};

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_API_PATH: &str = "/auth/login";
pub const VERIFY_OTP_PATH: &str = "/auth/verify-otp";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Drives the backend's passwordless login flow and seeds the session
#[derive(Debug, Clone)]
pub struct AuthClient {
    backend: BackendClient,
}

impl AuthClient {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    async fn post_expecting_success<T: serde::Serialize>(&self, path: &str, body: &T) -> Result<()> {
        let res = self.backend.post_json(path, body).await?;
        let status = res.status();
        if status.is_success() {
            return Ok(());
        }
        let body = parse_json_safe(res).await?;
        Err(ApiError::new(status.as_u16(), body).into())
    }

    /// Create an account; the backend mails a one-time code
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        self.post_expecting_success(REGISTER_PATH, request).await?;
        tracing::info!("Registration accepted for {}", request.email);
        Ok(())
    }

    /// Ask the backend to mail a one-time code
    pub async fn login(&self, email: &str) -> Result<()> {
        let request = LoginRequest {
            email: email.to_string(),
        };
        self.post_expecting_success(LOGIN_API_PATH, &request).await?;
        tracing::info!("One-time code requested for {}", email);
        Ok(())
    }

    /// Exchange a one-time code for a session.
    ///
    /// Returns the landing route for the roles in the new access token,
    /// falling back to `/dashboard` when the token cannot be decoded.
    pub async fn verify_otp<S: CookieStore>(
        &self,
        session: &SessionStore<S>,
        email: &str,
        otp_code: &str,
    ) -> Result<String> {
        let request = VerifyOtpRequest {
            email: email.to_string(),
            otp_code: otp_code.to_string(),
        };
        let res = self.backend.post_json(VERIFY_OTP_PATH, &request).await?;
        let body: VerifyOtpResponse = json_or_error(res).await?;

        let pair = body
            .token_pair()
            .ok_or_else(|| Error::InvalidAuthResponse("token missing".to_string()))?;

        session.create(&pair.access_token, &pair.refresh_token);

        let landing = match decode_claims(&pair.access_token) {
            Ok(claims) => claims.default_role_path(),
            Err(e) => {
                tracing::warn!("Could not read roles from new access token: {}", e);
                DEFAULT_HOME
            }
        };
        tracing::info!("Signed in {}, landing on {}", email, landing);
        Ok(landing.to_string())
    }

    /// End the session; returns the route to send the user to.
    ///
    /// The backend is told to revoke the refresh token on a best-effort
    /// basis; the local session is cleared either way.
    pub async fn logout<S: CookieStore>(&self, session: &SessionStore<S>) -> String {
        if let Some(refresh_token) = session.refresh_token() {
            let body = RefreshRequest { refresh_token };
            match self.backend.post_json(LOGOUT_PATH, &body).await {
                Ok(res) if !res.status().is_success() => {
                    tracing::warn!("Logout rejected by backend with status {}", res.status());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Logout call failed: {}", e),
            }
        }

        session.destroy();
        LOGIN_PATH.to_string()
    }
}
