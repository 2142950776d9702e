#![allow(dead_code)]

use axum::http::{HeaderValue, header};
use axum_test::{TestResponse, TestServer};
use linkvault::config::Config;
use linkvault::routes::router;
use linkvault::state::AppState;
use serde_json::{Value, json};

pub const TEST_PASSWORD: &str = "secret-password";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "debug".to_string(),
        log_format: "text".to_string(),
        jwt_access_secret: "test-access-secret".to_string(),
        jwt_refresh_secret: "test-refresh-secret".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 3_600,
        short_code_length: 6,
        short_code_alphabet: "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789"
            .to_string(),
        short_code_max_attempts: 10,
        password_min_length: 6,
        cookie_secure: false,
        db_max_connections: 5,
        db_connect_timeout: 5,
        db_idle_timeout: 60,
        db_max_lifetime: 300,
    }
}

pub fn create_test_state() -> AppState {
    AppState::in_memory(&test_config()).unwrap()
}

pub fn create_test_server() -> TestServer {
    TestServer::new(router(create_test_state())).unwrap()
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

pub fn refresh_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("refresh_token={}", token)).unwrap()
}

/// Value of the `refresh_token` cookie set by a response.
pub fn refresh_token_of(response: &TestResponse) -> String {
    let set_cookie = response.header(header::SET_COOKIE);
    let cookie = cookie::Cookie::parse(set_cookie.to_str().unwrap().to_string()).unwrap();
    assert_eq!(cookie.name(), "refresh_token");
    cookie.value().to_string()
}

/// Registers an account and returns `(access_token, refresh_token)`.
pub async fn register(server: &TestServer, name: &str, email: &str) -> (String, String) {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let body = response.json::<Value>();
    let access = body["access_token"].as_str().unwrap().to_string();
    (access, refresh_token_of(&response))
}

pub fn error_message(response: &TestResponse) -> String {
    response.json::<Value>()["error"]["message"]
        .as_str()
        .unwrap()
        .to_string()
}
