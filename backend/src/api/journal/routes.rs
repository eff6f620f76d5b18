//! Defines the HTTP routes for monthly journals, their posts, and
//! summarization.

use super::handlers::{
    add_post, create_journal, delete_journal, delete_post, list_journals, summarize,
    update_journal, update_post,
};
use crate::auth::middleware::session_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn journal_router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_journals)
                .post(create_journal)
                .put(update_journal)
                .delete(delete_journal),
        )
        .route(
            "/posts",
            post(add_post).put(update_post).delete(delete_post),
        )
        .route("/summarize", post(summarize))
        .layer(middleware::from_fn(session_auth))
}
