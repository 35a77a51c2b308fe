//! Route definitions for the `/laboratories` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::laboratory;
use crate::state::AppState;

/// Routes mounted at `/laboratories`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// PATCH  /{id}            -> update
/// DELETE /{id}            -> delete
/// GET    /{id}/card       -> card
/// POST   /{id}/intents    -> raise_intent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(laboratory::list).post(laboratory::create))
        .route(
            "/{id}",
            get(laboratory::get_by_id)
                .put(laboratory::update)
                .patch(laboratory::update)
                .delete(laboratory::delete),
        )
        .route("/{id}/card", get(laboratory::card))
        .route("/{id}/intents", post(laboratory::raise_intent))
}
