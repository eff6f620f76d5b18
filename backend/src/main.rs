//! Main entry point for the StudyLog backend.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall
//! structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    db.migrate().await.unwrap();
    let pool = db.pool().clone();

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/notes", api::note::routes::note_router())
        .nest("/tasks", api::task::routes::task_router())
        .nest("/dsa", api::dsa::routes::dsa_router())
        .nest("/gpt-month", api::journal::routes::journal_router())
        .nest("/uploads", api::upload::routes::upload_router())
        .layer(Extension(pool))
        .layer(Extension(config.clone()));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting StudyLog server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "StudyLog Backend",
            "version": "0.1.0"
        }),
        "Welcome to StudyLog API",
    ))
}
