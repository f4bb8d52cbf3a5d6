//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use expense_manager::{
    api::routes::build_app,
    auth::jwt::TOKEN_ALGORITHM,
    types::Claims,
    AppConfig, AppState, TursoClient,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde_json::json;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test_jwt_secret_key_for_testing_only";
pub const USER_NAME: &str = "exampleUser";
pub const PASSWORD: &str = "examplePass";
pub const FULL_NAME: &str = "Example";

/// Server over a fresh in-memory store; the store handle is returned for
/// direct seeding and inspection.
pub async fn create_test_server() -> (TestServer, Arc<TursoClient>) {
    let store = Arc::new(
        TursoClient::new_memory()
            .await
            .expect("Failed to create in-memory database"),
    );

    let state = AppState::new(AppConfig::default(), TEST_SECRET, store.clone())
        .expect("Failed to build app state");

    let server = TestServer::new(build_app(state)).expect("Failed to create test server");
    (server, store)
}

pub fn basic_auth(user_name: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", user_name, password))
    )
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub async fn register_example_user(server: &TestServer) {
    server
        .post("/api/users")
        .json(&json!({
            "userName": USER_NAME,
            "password": PASSWORD,
            "fullName": FULL_NAME
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}

/// Registers the example user and logs in, returning the token.
pub async fn login_example_user(server: &TestServer) -> String {
    register_example_user(server).await;

    let response = server
        .post("/api/auth/login")
        .add_header("Authorization", basic_auth(USER_NAME, PASSWORD))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    body["authToken"]
        .as_str()
        .expect("authToken should be a string")
        .to_string()
}

pub fn decode_claims(token: &str) -> Claims {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
        &Validation::new(TOKEN_ALGORITHM),
    )
    .expect("token should decode with the test secret")
    .claims
}
