//! End-to-end API tests against the PostgreSQL store.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn crud_round_through_postgres(pool: PgPool) {
    let app = common::build_pg_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/laboratories",
        json!({"name": "Linguistics", "icon": "🗣️"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["display_name"], "🗣️ Linguistics");
    assert!(created["created_at"].as_str().unwrap().ends_with('Z'));

    let response = patch_json(
        app.clone(),
        &format!("/api/v1/laboratories/{id}"),
        json!({"is_archived": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["is_archived"], true);
    assert_eq!(updated["icon"], "🗣️");

    let response = delete(app.clone(), &format!("/api/v1/laboratories/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, "/api/v1/dashboard?active_only=true").await).await;
    assert_eq!(json["data"]["summary"]["total_laboratories"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_name_is_conflict(pool: PgPool) {
    let app = common::build_pg_app(pool);

    post_json(app.clone(), "/api/v1/laboratories", json!({"name": "Music"})).await;
    let response = post_json(app, "/api/v1/laboratories", json!({"name": "Music"})).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_store(pool: PgPool) {
    let app = common::build_pg_app(pool);
    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["store_healthy"], true);
}
