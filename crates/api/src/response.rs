//! Shared response envelope types for API handlers.
//!
//! Aggregate views (dashboard, cards) use a `{ "data": ... }` envelope;
//! plain CRUD endpoints return the entity itself.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
