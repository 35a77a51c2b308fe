#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use marie_api::config::{ServerConfig, StoreBackend};
use marie_api::router::build_app_router;
use marie_api::state::AppState;
use marie_core::store::{InMemoryLaboratoryStore, LaboratoryStore};
use marie_db::PgLaboratoryStore;
use marie_events::EventBus;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        store: StoreBackend::Memory,
    }
}

/// Application state over the given store with a fresh event bus.
pub fn test_state(store: Arc<dyn LaboratoryStore>) -> AppState {
    AppState {
        store,
        config: Arc::new(test_config()),
        event_bus: Arc::new(EventBus::default()),
    }
}

/// Full router (same middleware stack as production) over `state`.
pub fn build_app(state: AppState) -> Router {
    build_app_router(state, &test_config())
}

/// Full router over a store seeded with the three sample laboratories.
pub fn build_seeded_app() -> Router {
    build_app(test_state(Arc::new(InMemoryLaboratoryStore::seeded())))
}

/// Full router over an empty in-memory store.
pub fn build_empty_app() -> Router {
    build_app(test_state(Arc::new(InMemoryLaboratoryStore::new())))
}

/// Full router over a PostgreSQL-backed store.
pub fn build_pg_app(pool: PgPool) -> Router {
    build_app(test_state(Arc::new(PgLaboratoryStore::new(pool))))
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

/// Send a raw (possibly malformed) JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
