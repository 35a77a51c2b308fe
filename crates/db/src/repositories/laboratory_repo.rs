//! Repository for the `laboratories` table.

use marie_core::laboratory::{CreateLaboratory, UpdateLaboratory};
use marie_core::types::DbId;
use sqlx::PgPool;

use crate::models::laboratory::LaboratoryRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, color, icon, is_active, is_archived, settings, \
     lightweight_model, deep_model, concept_count, source_count, study_hours, \
     created_at, updated_at";

/// Provides CRUD operations for laboratories.
pub struct LaboratoryRepo;

impl LaboratoryRepo {
    /// Insert a new laboratory, returning the created row.
    ///
    /// `color` and `icon` fall back to the column defaults when omitted.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLaboratory,
    ) -> Result<LaboratoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO laboratories (name, description, color, icon, lightweight_model, deep_model)
             VALUES ($1, $2, COALESCE($3, '#3B82F6'), COALESCE($4, '🧪'), $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LaboratoryRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(&input.icon)
            .bind(&input.lightweight_model)
            .bind(&input.deep_model)
            .fetch_one(pool)
            .await
    }

    /// Find a laboratory by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LaboratoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM laboratories WHERE id = $1");
        sqlx::query_as::<_, LaboratoryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List laboratories ordered by ID, optionally restricted to active ones.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<LaboratoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM laboratories WHERE ($1 = FALSE OR is_active) ORDER BY id"
        );
        sqlx::query_as::<_, LaboratoryRow>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Count all laboratories, active or not.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM laboratories")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Update a laboratory. Only supplied fields in `input` are applied.
    ///
    /// Non-nullable columns use `COALESCE`. The nullable `description`,
    /// `lightweight_model` and `deep_model` columns take a "provided" flag
    /// so that an explicit `null` clears them.
    ///
    /// `updated_at` is refreshed by the `trg_laboratories_updated_at` trigger.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLaboratory,
    ) -> Result<Option<LaboratoryRow>, sqlx::Error> {
        let query = format!(
            "UPDATE laboratories SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                color = COALESCE($5, color),
                icon = COALESCE($6, icon),
                lightweight_model = CASE WHEN $7 THEN $8 ELSE lightweight_model END,
                deep_model = CASE WHEN $9 THEN $10 ELSE deep_model END,
                is_active = COALESCE($11, is_active),
                is_archived = COALESCE($12, is_archived),
                settings = COALESCE($13, settings)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LaboratoryRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(&input.color)
            .bind(&input.icon)
            .bind(input.lightweight_model.is_some())
            .bind(input.lightweight_model.as_ref().and_then(|v| v.as_deref()))
            .bind(input.deep_model.is_some())
            .bind(input.deep_model.as_ref().and_then(|v| v.as_deref()))
            .bind(input.is_active)
            .bind(input.is_archived)
            .bind(input.settings.clone().map(serde_json::Value::Object))
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a laboratory by marking it inactive.
    ///
    /// Returns `true` if the row exists. Rows are never removed.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE laboratories SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the externally maintained counters for a laboratory.
    ///
    /// Used by whatever ingests concepts, sources and study sessions.
    /// Returns `false` if no row with the given `id` exists.
    pub async fn set_counters(
        pool: &PgPool,
        id: DbId,
        concept_count: i32,
        source_count: i32,
        study_minutes: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE laboratories
             SET concept_count = $2, source_count = $3, study_hours = $4
             WHERE id = $1",
        )
        .bind(id)
        .bind(concept_count)
        .bind(source_count)
        .bind(study_minutes)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
