//! Defines the HTTP routes for notes.

use super::handlers::{create_note, delete_note, list_notes, update_note};
use crate::auth::middleware::session_auth;
use axum::{Router, middleware, routing::get};

pub fn note_router() -> Router {
    Router::new().route(
        "/",
        get(list_notes)
            .post(create_note)
            .put(update_note)
            .delete(delete_note)
            .layer(middleware::from_fn(session_auth)),
    )
}
