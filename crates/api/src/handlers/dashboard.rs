//! Handler for the laboratories dashboard.
//!
//! Takes one snapshot from the store and derives both the headline summary
//! and the per-card values from it, so the two always agree.

use axum::extract::{Query, State};
use axum::Json;
use marie_core::dashboard::DashboardSummary;
use marie_core::presentation::LaboratoryCard;
use marie_core::store::LaboratoryFilter;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Payload of `GET /dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    pub laboratories: Vec<LaboratoryCard>,
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(filter): Query<LaboratoryFilter>,
) -> AppResult<Json<DataResponse<DashboardView>>> {
    let labs = state.store.list(filter).await?;

    let view = DashboardView {
        summary: DashboardSummary::from_laboratories(&labs),
        laboratories: labs.iter().map(LaboratoryCard::project).collect(),
    };
    Ok(Json(DataResponse { data: view }))
}
