//! Handlers for registration, login, token refresh and logout.
//!
//! The access token is returned in the JSON body. The refresh token is set
//! as an HttpOnly cookie scoped to `/api/auth`, so scripts never see it and
//! it is only sent where it is needed.

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use cookie::{Cookie, SameSite};
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, RegisterRequest, RegisterResponse, TokenResponse, UserResponse,
};
use crate::api::middleware::auth::AuthUser;
use crate::application::services::IssuedToken;
use crate::error::AppError;
use crate::state::AppState;

pub const REFRESH_COOKIE: &str = "refresh_token";
const REFRESH_COOKIE_PATH: &str = "/api/auth";

fn refresh_cookie(refresh: &IssuedToken, secure: bool) -> String {
    Cookie::build((REFRESH_COOKIE, refresh.token.clone()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path(REFRESH_COOKIE_PATH)
        .build()
        .to_string()
}

fn expired_refresh_cookie(secure: bool) -> String {
    let mut cookie = Cookie::build((REFRESH_COOKIE, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path(REFRESH_COOKIE_PATH)
        .build();
    cookie.make_removal();
    cookie.to_string()
}

/// Reads the refresh token from the `Cookie` header(s), if present.
pub fn refresh_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value.to_string()))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Creates an account and signs it in.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Request Body
///
/// ```json
/// { "name": "Ann", "email": "a@x.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if a field is missing or invalid, or the email
/// is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (user, tokens) = state
        .auth_service
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    let body = RegisterResponse {
        user: UserResponse::from(user),
        token: TokenResponse::from(&tokens),
    };

    Ok((
        StatusCode::CREATED,
        [(
            header::SET_COOKIE,
            refresh_cookie(&tokens.refresh, state.cookie_secure),
        )],
        Json(body),
    ))
}

/// Signs in with email and password, superseding any previous session.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Errors
///
/// Returns 400 Bad Request with "Invalid email or password" on bad
/// credentials.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tokens = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok((
        [(
            header::SET_COOKIE,
            refresh_cookie(&tokens.refresh, state.cookie_secure),
        )],
        Json(TokenResponse::from(&tokens)),
    ))
}

/// Exchanges the refresh token cookie for a new access token and cookie.
///
/// # Endpoint
///
/// `GET|POST /api/auth/refresh-token`
///
/// # Errors
///
/// Returns 401 Unauthorized if the cookie is missing, the token is invalid
/// or expired, or it has been superseded by a newer login or refresh.
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let presented = refresh_token_from_headers(&headers);

    let tokens = state.auth_service.refresh(presented.as_deref()).await?;

    Ok((
        [(
            header::SET_COOKIE,
            refresh_cookie(&tokens.refresh, state.cookie_secure),
        )],
        Json(TokenResponse::from(&tokens)),
    ))
}

/// Ends the current session.
///
/// # Endpoint
///
/// `POST /api/auth/logout` (Bearer token required)
///
/// The stored refresh token is cleared and the cookie expired. The access
/// token used for this call stays valid until it expires.
pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(user.user_id).await?;

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, expired_refresh_cookie(state.cookie_secure))],
    ))
}

/// Returns the authenticated account.
///
/// # Endpoint
///
/// `GET /api/auth/me` (Bearer token required)
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.auth_service.current_user(user.user_id).await?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Utc;

    #[test]
    fn test_refresh_cookie_attributes() {
        let issued = IssuedToken {
            token: "abc.def.ghi".to_string(),
            expires_at: Utc::now(),
        };

        let cookie = refresh_cookie(&issued, true);
        assert!(cookie.starts_with("refresh_token=abc.def.ghi"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/api/auth"));

        assert!(!refresh_cookie(&issued, false).contains("Secure"));
    }

    #[test]
    fn test_expired_cookie_clears_value() {
        let cookie = expired_refresh_cookie(false);
        assert!(cookie.starts_with("refresh_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_refresh_token_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(refresh_token_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; refresh_token=tok123; other=1"),
        );
        assert_eq!(
            refresh_token_from_headers(&headers).as_deref(),
            Some("tok123")
        );
    }

    #[test]
    fn test_refresh_token_from_second_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("refresh_token=tok456"));

        assert_eq!(
            refresh_token_from_headers(&headers).as_deref(),
            Some("tok456")
        );
    }
}
