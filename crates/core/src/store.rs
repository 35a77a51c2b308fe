//! Data-provider abstraction for laboratories.
//!
//! Handlers and the dashboard never reach into a database directly; they
//! receive an `Arc<dyn LaboratoryStore>` and work on the snapshot it returns.
//! [`InMemoryLaboratoryStore`] backs tests and the demo mode; the PostgreSQL
//! implementation lives in `marie-db`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::laboratory::{
    CreateLaboratory, Laboratory, LaboratorySettings, UpdateLaboratory, DEFAULT_COLOR,
    DEFAULT_ICON,
};
use crate::types::{to_wire_timestamp, DbId};

/// Entity name used in [`CoreError::NotFound`].
pub const ENTITY: &str = "Laboratory";

/// Query filter for [`LaboratoryStore::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LaboratoryFilter {
    /// Only return laboratories with `is_active = true`.
    #[serde(default)]
    pub active_only: bool,
}

impl LaboratoryFilter {
    pub fn matches(&self, lab: &Laboratory) -> bool {
        !self.active_only || lab.is_active
    }
}

/// Source and sink for laboratory records.
///
/// Implementations assign ids, timestamps and zeroed counters on create,
/// refresh `updated_at` on update, and never hard-delete.
#[async_trait]
pub trait LaboratoryStore: Send + Sync {
    /// All laboratories matching `filter`, ordered by id.
    async fn list(&self, filter: LaboratoryFilter) -> Result<Vec<Laboratory>, CoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Laboratory>, CoreError>;

    /// Persist a validated create request. Duplicate names are a
    /// [`CoreError::Conflict`].
    async fn create(&self, input: &CreateLaboratory) -> Result<Laboratory, CoreError>;

    /// Apply a validated partial update. Returns `None` if `id` is unknown.
    async fn update(
        &self,
        id: DbId,
        input: &UpdateLaboratory,
    ) -> Result<Option<Laboratory>, CoreError>;

    /// Mark a laboratory inactive. Returns `false` if `id` is unknown.
    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError>;

    /// Cheap liveness probe used by `/health`.
    async fn health_check(&self) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    next_id: DbId,
    rows: BTreeMap<DbId, Laboratory>,
}

impl MemoryState {
    fn name_taken(&self, name: &str, except: Option<DbId>) -> bool {
        self.rows
            .values()
            .any(|lab| lab.name == name && Some(lab.id) != except)
    }
}

/// A [`LaboratoryStore`] kept entirely in process memory.
#[derive(Debug)]
pub struct InMemoryLaboratoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryLaboratoryStore {
    pub fn new() -> Self {
        Self::with_laboratories(Vec::new())
    }

    /// Start from existing records. New ids continue after the largest one.
    pub fn with_laboratories(labs: Vec<Laboratory>) -> Self {
        let next_id = labs.iter().map(|lab| lab.id).max().unwrap_or(0) + 1;
        let rows = labs.into_iter().map(|lab| (lab.id, lab)).collect();
        Self {
            state: RwLock::new(MemoryState { next_id, rows }),
        }
    }

    /// Pre-populated with [`sample_laboratories`].
    pub fn seeded() -> Self {
        Self::with_laboratories(sample_laboratories())
    }
}

impl Default for InMemoryLaboratoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_name(name: &str) -> CoreError {
    CoreError::Conflict(format!("A laboratory named '{name}' already exists"))
}

#[async_trait]
impl LaboratoryStore for InMemoryLaboratoryStore {
    async fn list(&self, filter: LaboratoryFilter) -> Result<Vec<Laboratory>, CoreError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .values()
            .filter(|lab| filter.matches(lab))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Laboratory>, CoreError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, input: &CreateLaboratory) -> Result<Laboratory, CoreError> {
        let mut state = self.state.write().await;
        if state.name_taken(&input.name, None) {
            return Err(duplicate_name(&input.name));
        }

        let id = state.next_id;
        state.next_id += 1;
        let now = to_wire_timestamp(chrono::Utc::now());
        let lab = Laboratory {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            color: input.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            icon: input.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string()),
            is_active: true,
            is_archived: false,
            settings: LaboratorySettings::new(),
            lightweight_model: input.lightweight_model.clone(),
            deep_model: input.deep_model.clone(),
            concept_count: 0,
            source_count: 0,
            study_hours: 0,
            created_at: now.clone(),
            updated_at: now,
        };
        state.rows.insert(id, lab.clone());
        tracing::debug!(id, name = %lab.name, "Laboratory created in memory");
        Ok(lab)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateLaboratory,
    ) -> Result<Option<Laboratory>, CoreError> {
        let mut state = self.state.write().await;
        if !state.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(name) = &input.name {
            if state.name_taken(name, Some(id)) {
                return Err(duplicate_name(name));
            }
        }

        let Some(lab) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        lab.apply(input);
        lab.updated_at = to_wire_timestamp(chrono::Utc::now());
        Ok(Some(lab.clone()))
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError> {
        let mut state = self.state.write().await;
        let Some(lab) = state.rows.get_mut(&id) else {
            return Ok(false);
        };
        lab.is_active = false;
        lab.updated_at = to_wire_timestamp(chrono::Utc::now());
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

/// The three demo laboratories shown on a fresh dashboard.
pub fn sample_laboratories() -> Vec<Laboratory> {
    let lab = |id: DbId,
               name: &str,
               description: &str,
               color: &str,
               icon: &str,
               is_active: bool,
               counts: (u32, u32, u32),
               created_at: &str,
               updated_at: &str| Laboratory {
        id,
        name: name.to_string(),
        description: Some(description.to_string()),
        color: color.to_string(),
        icon: icon.to_string(),
        is_active,
        is_archived: false,
        settings: LaboratorySettings::new(),
        lightweight_model: None,
        deep_model: None,
        concept_count: counts.0,
        source_count: counts.1,
        study_hours: counts.2,
        created_at: created_at.to_string(),
        updated_at: updated_at.to_string(),
    };

    vec![
        lab(
            1,
            "Artificial Intelligence",
            "Machine Learning, Deep Learning, and AI applications",
            "#3B82F6",
            "🤖",
            true,
            (24, 12, 180),
            "2024-01-15T10:00:00.000Z",
            "2024-01-20T15:30:00.000Z",
        ),
        lab(
            2,
            "Philosophy",
            "Stoicism, Ethics, and Modern Philosophy",
            "#8B5CF6",
            "🏛️",
            true,
            (18, 8, 120),
            "2024-01-10T09:00:00.000Z",
            "2024-01-18T14:20:00.000Z",
        ),
        lab(
            3,
            "Physics",
            "Quantum Mechanics and Theoretical Physics",
            "#10B981",
            "⚛️",
            false,
            (6, 4, 45),
            "2024-01-05T08:00:00.000Z",
            "2024-01-12T11:15:00.000Z",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
