//! Login flow tests against a mocked backend

mod common;

use common::{malformed_token, mint_token};
use salonpanel::auth::models::RegisterRequest;
use salonpanel::auth::session::{MemoryCookieStore, SessionStore};
use salonpanel::auth::AuthClient;
use salonpanel::backend::BackendClient;
use salonpanel::Error;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn auth_for(server: &MockServer) -> AuthClient {
    AuthClient::new(BackendClient::with_client(
        reqwest::Client::new(),
        &server.uri(),
    ))
}

fn empty_session() -> SessionStore<MemoryCookieStore> {
    SessionStore::new(MemoryCookieStore::new(), false)
}

#[tokio::test]
async fn test_verify_otp_creates_session_and_lands_by_role() {
    let server = MockServer::start().await;
    let access = mint_token(&["MANAGER"]);

    Mock::given(method("POST"))
        .and(path("/auth/verify-otp"))
        .and(body_json(json!({ "email": "ana@example.com", "otpCode": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": access,
            "refreshToken": "R"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = empty_session();
    let landing = auth_for(&server)
        .verify_otp(&session, "ana@example.com", "123456")
        .await
        .unwrap();

    assert_eq!(landing, "/manager/dashboard");
    assert_eq!(session.access_token().as_deref(), Some(access.as_str()));
    assert_eq!(session.refresh_token().as_deref(), Some("R"));
}

#[tokio::test]
async fn test_verify_otp_nested_refresh_token() {
    let server = MockServer::start().await;
    let access = mint_token(&["STAFF"]);

    Mock::given(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": access,
            "user": { "id": "u1", "email": "sam@example.com", "refreshToken": "nested" }
        })))
        .mount(&server)
        .await;

    let session = empty_session();
    let landing = auth_for(&server)
        .verify_otp(&session, "sam@example.com", "000000")
        .await
        .unwrap();

    assert_eq!(landing, "/staff/appointments");
    assert_eq!(session.refresh_token().as_deref(), Some("nested"));
}

#[tokio::test]
async fn test_verify_otp_undecodable_token_lands_on_dashboard() {
    let server = MockServer::start().await;

    Mock::given(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": malformed_token(),
            "refreshToken": "R"
        })))
        .mount(&server)
        .await;

    let session = empty_session();
    let landing = auth_for(&server)
        .verify_otp(&session, "ana@example.com", "123456")
        .await
        .unwrap();

    assert_eq!(landing, "/dashboard");
    assert!(session.access_token().is_some());
}

#[tokio::test]
async fn test_verify_otp_missing_token() {
    let server = MockServer::start().await;

    Mock::given(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "refreshToken": "R" })))
        .mount(&server)
        .await;

    let session = empty_session();
    let err = auth_for(&server)
        .verify_otp(&session, "ana@example.com", "123456")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidAuthResponse(_)));
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn test_verify_otp_wrong_code() {
    let server = MockServer::start().await;

    Mock::given(path("/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "Invalid OTP" })))
        .mount(&server)
        .await;

    let session = empty_session();
    let err = auth_for(&server)
        .verify_otp(&session, "ana@example.com", "999999")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Backend error: Invalid OTP");
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn test_login_and_register() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "ana@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "OTP sent" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "firstname": "Ana",
            "lastname": "Berg",
            "email": "taken@example.com",
            "TOSAccepted": true
        })))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Email already in use" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let auth = auth_for(&server);
    auth.login("ana@example.com").await.unwrap();

    let err = auth
        .register(&RegisterRequest {
            firstname: "Ana".to_string(),
            lastname: "Berg".to_string(),
            email: "taken@example.com".to_string(),
            tos_accepted: true,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Backend error: Email already in use");
}

#[tokio::test]
async fn test_logout_revokes_and_clears() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(body_json(json!({ "refreshToken": "R" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let session = empty_session();
    session.create("A", "R");

    let target = auth_for(&server).logout(&session).await;

    assert_eq!(target, "/login");
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn test_logout_clears_even_when_backend_fails() {
    let server = MockServer::start().await;

    Mock::given(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let session = empty_session();
    session.create("A", "R");
    auth_for(&server).logout(&session).await;
    assert!(session.refresh_token().is_none());

    // Unreachable backend
    let offline = AuthClient::new(BackendClient::with_client(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
    ));
    let session = empty_session();
    session.create("A", "R");
    assert_eq!(offline.logout(&session).await, "/login");
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn test_logout_without_session_skips_backend() {
    let server = MockServer::start().await;

    Mock::given(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let session = empty_session();
    assert_eq!(auth_for(&server).logout(&session).await, "/login");
}
