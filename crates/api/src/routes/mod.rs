pub mod dashboard;
pub mod health;
pub mod laboratory;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /laboratories                      list (?active_only), create
/// /laboratories/{id}                 get, update (PUT/PATCH), soft delete
/// /laboratories/{id}/card            card projection (GET)
/// /laboratories/{id}/intents         raise select/edit/delete intent (POST)
///
/// /dashboard                         summary + cards (GET, ?active_only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/laboratories", laboratory::router())
        .nest("/dashboard", dashboard::router())
}
