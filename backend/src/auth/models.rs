//! Data structures for authentication-related entities.
//!
//! This module defines the request and response payloads for registration,
//! login, and the change-password flow.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1-255 characters"
    ))]
    pub username: String,

    #[serde(default)]
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Change-password request payload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// User information returned by auth endpoints
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Login response body; the session token itself travels only in the cookie
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserInfo,
    /// Session lifetime in seconds
    pub expires_in: u64,
}
