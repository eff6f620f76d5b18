//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle endpoints like user registration, login, password
//! changes and logout. They are designed to be integrated into the main
//! Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::session_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/change-password", post(change_password))
        .route("/logout", post(logout))
        .route("/me", get(me).layer(middleware::from_fn(session_auth)))
}
