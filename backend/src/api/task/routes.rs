//! Defines the HTTP routes for vocabulary flashcards.

use super::handlers::{create_task, delete_task, list_tasks, update_task};
use crate::auth::middleware::session_auth;
use axum::{Router, middleware, routing::get};

pub fn task_router() -> Router {
    Router::new().route(
        "/",
        get(list_tasks)
            .post(create_task)
            .put(update_task)
            .delete(delete_task)
            .layer(middleware::from_fn(session_auth)),
    )
}
