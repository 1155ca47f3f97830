//! Authenticated fetch wrapper tests against a mocked backend

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use salonpanel::auth::session::{CookieOptions, CookieStore, MemoryCookieStore, SessionStore};
use salonpanel::backend::{BackendClient, RequestOptions};
use salonpanel::Error;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::with_client(reqwest::Client::new(), &server.uri())
}

fn session_with(access: &str, refresh: &str) -> SessionStore<MemoryCookieStore> {
    let session = SessionStore::new(MemoryCookieStore::new(), false);
    session.create(access, refresh);
    session
}

#[tokio::test]
async fn test_attaches_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/organisations"))
        .and(header("authorization", "Bearer A"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with("A", "R");
    let res = client_for(&server)
        .fetch_with_auth(&session, "/organisations", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_always_unauthorized_refreshes_once() {
    let server = MockServer::start().await;

    Mock::given(path("/salons"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "B", "refreshToken": "R2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with("A", "R");
    let res = client_for(&server)
        .fetch_with_auth(&session, "/salons", RequestOptions::get())
        .await
        .unwrap();

    // The replayed 401 is returned as-is
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(session.access_token().as_deref(), Some("B"));
    server.verify().await;
}

#[tokio::test]
async fn test_successful_refresh_replays_with_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/organisations"))
        .and(header("authorization", "Bearer B"))
        .and(body_json(json!({ "name": "Downtown" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "o1" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/organisations"))
        .and(header("authorization", "Bearer A"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(body_json(json!({ "refreshToken": "R" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "B", "refreshToken": "R2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with("A", "R");
    let options = RequestOptions::post()
        .json(&json!({ "name": "Downtown" }))
        .unwrap();
    let res = client_for(&server)
        .fetch_with_auth(&session, "/organisations", options)
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(session.access_token().as_deref(), Some("B"));
    assert_eq!(session.refresh_token().as_deref(), Some("R2"));
}

#[tokio::test]
async fn test_unauthorized_without_refresh_token_clears_session() {
    let server = MockServer::start().await;

    Mock::given(path("/users"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionStore::new(MemoryCookieStore::new(), false);
    session.store().set(
        "session_access_token",
        "A",
        &CookieOptions::session(false, 7200),
    );

    let res = client_for(&server)
        .fetch_with_auth(&session, "/users", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(session.access_token().is_none());
    assert!(session.store().is_empty());
}

#[tokio::test]
async fn test_rejected_refresh_returns_original_response() {
    let server = MockServer::start().await;

    Mock::given(path("/organisations/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with("A", "R");
    let res = client_for(&server)
        .fetch_with_auth(&session, "/organisations/me", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], "expired");
    assert!(session.access_token().is_none());
    assert!(session.refresh_token().is_none());
}

#[tokio::test]
async fn test_other_errors_pass_through_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(path("/roles"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = session_with("A", "R");
    let res = client_for(&server)
        .fetch_with_auth(&session, "/roles", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(session.access_token().as_deref(), Some("A"));
}

#[tokio::test]
async fn test_caller_headers_are_merged_last() {
    let server = MockServer::start().await;

    Mock::given(path("/reports"))
        .and(header("content-type", "text/csv"))
        .and(header("authorization", "Bearer A"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with("A", "R");
    let options =
        RequestOptions::get().header(CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    let res = client_for(&server)
        .fetch_with_auth(&session, "/reports", options)
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_network_failure_propagates() {
    // Nothing listens on the discard port
    let client = BackendClient::with_client(reqwest::Client::new(), "http://127.0.0.1:9");
    let session = session_with("A", "R");

    let result = client
        .fetch_with_auth(&session, "/organisations", RequestOptions::get())
        .await;

    assert!(matches!(result, Err(Error::Http(_))));
    assert_eq!(session.access_token().as_deref(), Some("A"));
}

#[tokio::test]
async fn test_unreadable_refresh_body_is_an_error_and_keeps_session() {
    let server = MockServer::start().await;

    Mock::given(path("/salons"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_with("A", "R");
    let result = client_for(&server)
        .fetch_with_auth(&session, "/salons", RequestOptions::get())
        .await;

    assert!(matches!(result, Err(Error::Http(_))));
    assert_eq!(session.access_token().as_deref(), Some("A"));
    assert_eq!(session.refresh_token().as_deref(), Some("R"));
}
