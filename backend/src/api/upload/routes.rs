//! Defines the HTTP route for file uploads.

use super::handlers::upload_file;
use crate::auth::middleware::session_auth;
use axum::{Router, middleware, routing::post};

pub fn upload_router() -> Router {
    Router::new().route(
        "/",
        post(upload_file).layer(middleware::from_fn(session_auth)),
    )
}
