//! Defines the HTTP routes for algorithm-practice questions.

use super::handlers::{create_question, delete_question, list_questions, update_question};
use crate::auth::middleware::session_auth;
use axum::{Router, middleware, routing::get};

pub fn dsa_router() -> Router {
    Router::new().route(
        "/",
        get(list_questions)
            .post(create_question)
            .put(update_question)
            .delete(delete_question)
            .layer(middleware::from_fn(session_auth)),
    )
}
