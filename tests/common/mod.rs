//! Helpers shared by the integration tests

#![allow(dead_code)]

use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

/// Secret the panel never sees; the gate must not care
const FOREIGN_SECRET: &[u8] = b"backend-only-signing-secret";

#[derive(Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    roles: Vec<&'a str>,
    iat: i64,
    exp: i64,
}

/// Mint a signed access token carrying `roles`
pub fn mint_token(roles: &[&str]) -> String {
    let claims = TestClaims {
        sub: "user-1",
        roles: roles.to_vec(),
        iat: 1_700_000_000,
        exp: 4_102_444_800,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(FOREIGN_SECRET),
    )
    .expect("Failed to mint token")
}

/// A token whose payload segment is not base64url JSON
pub fn malformed_token() -> String {
    "eyJhbGciOiJIUzI1NiJ9.this-is-not-json!.c2ln".to_string()
}
