mod common;

use axum::http::{StatusCode, header};
use serde_json::{Value, json};

#[tokio::test]
async fn test_register_success() {
    let server = common::create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "alice",
            "email": "Alice@Example.com",
            "password": "secret-password"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let set_cookie = response.header(header::SET_COOKIE);
    let set_cookie = set_cookie.to_str().unwrap();
    assert!(set_cookie.starts_with("refresh_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/api/auth"));
    assert!(set_cookie.contains("SameSite=Strict"));

    let json = response.json::<Value>();
    assert_eq!(json["user"]["name"], "alice");
    assert_eq!(json["user"]["email"], "alice@example.com");
    assert!(json["user"].get("password_hash").is_none());
    assert_eq!(json["token_type"], "Bearer");
    let expires_in = json["expires_in"].as_i64().unwrap();
    assert!((890..=900).contains(&expires_in));
    assert!(json["access_token"].is_string());
}

#[tokio::test]
async fn test_register_missing_fields() {
    let server = common::create_test_server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "name": "alice" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["message"], "All fields are required");
}

#[tokio::test]
async fn test_register_rejects_invalid_fields() {
    let server = common::create_test_server();

    let cases = [
        (
            json!({ "name": "al", "email": "a@example.com", "password": "secret-password" }),
            "Name must be between 3 and 20 characters",
        ),
        (
            json!({ "name": "alice", "email": "not-an-email", "password": "secret-password" }),
            "Invalid email format",
        ),
        (
            json!({ "name": "alice", "email": "a@example.com", "password": "12345" }),
            "Password must be at least 6 characters",
        ),
    ];

    for (body, message) in cases {
        let response = server.post("/api/auth/register").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(common::error_message(&response), message);
    }
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let server = common::create_test_server();
    common::register(&server, "alice", "alice@example.com").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "alice2",
            "email": "ALICE@example.com",
            "password": "secret-password"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(common::error_message(&response), "User already exists");
}

#[tokio::test]
async fn test_login_success() {
    let server = common::create_test_server();
    common::register(&server, "alice", "alice@example.com").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": " Alice@example.com ",
            "password": common::TEST_PASSWORD
        }))
        .await;

    response.assert_status_ok();
    assert!(!common::refresh_token_of(&response).is_empty());

    let json = response.json::<Value>();
    assert_eq!(json["token_type"], "Bearer");
    assert!(json["access_token"].is_string());
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let server = common::create_test_server();
    common::register(&server, "alice", "alice@example.com").await;

    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "wrong-password" }))
        .await;

    let unknown_email = server
        .post("/api/auth/login")
        .json(&json!({ "email": "bob@example.com", "password": "wrong-password" }))
        .await;

    wrong_password.assert_status(StatusCode::BAD_REQUEST);
    unknown_email.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        common::error_message(&wrong_password),
        "Invalid email or password"
    );
    assert_eq!(
        common::error_message(&wrong_password),
        common::error_message(&unknown_email)
    );
}

#[tokio::test]
async fn test_refresh_rotates_token() {
    let server = common::create_test_server();
    let (_, refresh) = common::register(&server, "alice", "alice@example.com").await;

    let response = server
        .post("/api/auth/refresh-token")
        .add_header(header::COOKIE, common::refresh_cookie(&refresh))
        .await;

    response.assert_status_ok();
    let rotated = common::refresh_token_of(&response);
    assert_ne!(rotated, refresh);
    assert!(response.json::<Value>()["access_token"].is_string());

    // The replaced token is dead.
    let replay = server
        .post("/api/auth/refresh-token")
        .add_header(header::COOKIE, common::refresh_cookie(&refresh))
        .await;
    replay.assert_status(StatusCode::UNAUTHORIZED);

    // The rotated one works, also over GET.
    let response = server
        .get("/api/auth/refresh-token")
        .add_header(header::COOKIE, common::refresh_cookie(&rotated))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_refresh_without_cookie() {
    let server = common::create_test_server();

    let response = server.post("/api/auth/refresh-token").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_refresh_with_garbage_cookie() {
    let server = common::create_test_server();

    let response = server
        .post("/api/auth/refresh-token")
        .add_header(header::COOKIE, common::refresh_cookie("not.a.jwt"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_supersedes_previous_session() {
    let server = common::create_test_server();
    let (_, first_refresh) = common::register(&server, "alice", "alice@example.com").await;

    server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": common::TEST_PASSWORD }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/auth/refresh-token")
        .add_header(header::COOKIE, common::refresh_cookie(&first_refresh))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_access_token() {
    let server = common::create_test_server();
    let (access, refresh) = common::register(&server, "alice", "alice@example.com").await;

    let response = server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, common::bearer(&access))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["email"], "alice@example.com");

    let missing = server.get("/api/auth/me").await;
    missing.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(missing.header(header::WWW_AUTHENTICATE), "Bearer");

    // A refresh token is not an access token.
    let wrong_kind = server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, common::bearer(&refresh))
        .await;
    wrong_kind.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let server = common::create_test_server();
    let (access, refresh) = common::register(&server, "alice", "alice@example.com").await;

    let response = server
        .post("/api/auth/logout")
        .add_header(header::AUTHORIZATION, common::bearer(&access))
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    let set_cookie = response.header(header::SET_COOKIE);
    assert!(set_cookie.to_str().unwrap().starts_with("refresh_token=;"));

    let refreshed = server
        .post("/api/auth/refresh-token")
        .add_header(header::COOKIE, common::refresh_cookie(&refresh))
        .await;
    refreshed.assert_status(StatusCode::UNAUTHORIZED);

    // The access token is stateless and keeps working until it expires.
    server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, common::bearer(&access))
        .await
        .assert_status_ok();
}
