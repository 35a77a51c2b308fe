use std::sync::Arc;

use marie_core::store::LaboratoryStore;
use marie_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Where laboratories are read from and written to.
    pub store: Arc<dyn LaboratoryStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fan-out for laboratory lifecycle events and user intents.
    pub event_bus: Arc<EventBus>,
}
