//! Handlers for the `/laboratories` resource.
//!
//! Every mutation passes through the core request shaping functions before
//! it reaches the store, and announces itself on the event bus afterwards.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use marie_core::error::CoreError;
use marie_core::intent::{IntentSignal, LaboratoryIntent};
use marie_core::laboratory::{
    build_create_request, build_update_request, CreateLaboratory, Laboratory, UpdateLaboratory,
};
use marie_core::presentation::LaboratoryCard;
use marie_core::store::{LaboratoryFilter, ENTITY};
use marie_core::types::DbId;
use marie_events::{EventKind, LaboratoryEvent};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// Turn axum's plain-text JSON rejections into our JSON error body.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// POST /api/v1/laboratories
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateLaboratory>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Laboratory>)> {
    let input = build_create_request(json_body(payload)?)?;
    let lab = state.store.create(&input).await?;

    tracing::info!(id = lab.id, name = %lab.name, "Laboratory created");
    state
        .event_bus
        .publish(LaboratoryEvent::new(EventKind::Created, lab.id));
    Ok((StatusCode::CREATED, Json(lab)))
}

/// GET /api/v1/laboratories
///
/// Soft-deleted (inactive) laboratories are included unless the caller
/// passes `?active_only=true`, so the dashboard can still show them with
/// their "Inactive" badge.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<LaboratoryFilter>,
) -> AppResult<Json<Vec<Laboratory>>> {
    let labs = state.store.list(filter).await?;
    Ok(Json(labs))
}

/// GET /api/v1/laboratories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Laboratory>> {
    let lab = state.store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(lab))
}

/// PUT/PATCH /api/v1/laboratories/{id}
///
/// An update that supplies no fields returns the current record unchanged.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<UpdateLaboratory>, JsonRejection>,
) -> AppResult<Json<Laboratory>> {
    let input = build_update_request(json_body(payload)?)?;

    if input.is_empty() {
        let lab = state.store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        return Ok(Json(lab));
    }

    let lab = state
        .store
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, fields = ?input.supplied_fields(), "Laboratory updated");
    state
        .event_bus
        .publish(LaboratoryEvent::new(EventKind::Updated, id));
    Ok(Json(lab))
}

/// DELETE /api/v1/laboratories/{id}
///
/// Soft delete: the laboratory is marked inactive and stays listed.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if !state.store.soft_delete(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(id, "Laboratory soft-deleted");
    state
        .event_bus
        .publish(LaboratoryEvent::new(EventKind::Deleted, id));
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/laboratories/{id}/card
pub async fn card(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LaboratoryCard>>> {
    let lab = state.store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: LaboratoryCard::project(&lab),
    }))
}

/// Request body for `POST /laboratories/{id}/intents`.
#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    pub intent: LaboratoryIntent,
}

/// POST /api/v1/laboratories/{id}/intents
///
/// Publishes the intent for whoever handles navigation or confirmation.
/// Nothing about the laboratory changes here.
pub async fn raise_intent(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<IntentRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<IntentSignal>>)> {
    let request = json_body(payload)?;
    if state.store.find_by_id(id).await?.is_none() {
        return Err(not_found(id));
    }

    let signal = IntentSignal::new(id, request.intent);
    tracing::debug!(id, intent = ?signal.intent, "Laboratory intent raised");
    state.event_bus.publish(LaboratoryEvent::from(signal));
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: signal })))
}
