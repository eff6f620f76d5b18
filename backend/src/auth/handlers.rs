//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for registration, login,
//! password changes and session inspection, and interact with the
//! `auth::service` for core business logic. The session token is transported
//! exclusively as an HTTP-only cookie.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::middleware::SESSION_COOKIE;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::config::Config;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sqlx::SqlitePool;

fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_seconds))
        .build()
}

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<UserInfo>>), (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.register(payload).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(user, "User registered successfully")),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<LoginResponse>>), (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.login(payload).await {
        Ok((token, response)) => {
            let cookie = session_cookie(token, response.expires_in as i64);
            Ok((
                jar.add(cookie),
                ResponseJson(ApiResponse::success(response, "Login successful")),
            ))
        }
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle change-password request
#[axum::debug_handler]
pub async fn change_password(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.change_password(payload).await {
        Ok(()) => Ok(ResponseJson(ApiResponse::success(
            (),
            "Password updated successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request by clearing the session cookie
#[axum::debug_handler]
pub async fn logout(jar: CookieJar) -> (CookieJar, ResponseJson<ApiResponse<()>>) {
    // Sessions are stateless; logout just expires the client-side cookie.
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        jar.remove(removal),
        ResponseJson(ApiResponse::success((), "Logged out successfully")),
    )
}

/// Get current user information from the session
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<UserInfo>>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.get_profile(claims.user_id()).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            user,
            "User retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}
