//! Laboratory row model.

use marie_core::error::CoreError;
use marie_core::laboratory::{Laboratory, LaboratorySettings};
use marie_core::types::{to_wire_timestamp, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `laboratories` table.
#[derive(Debug, Clone, FromRow)]
pub struct LaboratoryRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub is_active: bool,
    pub is_archived: bool,
    pub settings: serde_json::Value,
    pub lightweight_model: Option<String>,
    pub deep_model: Option<String>,
    pub concept_count: i32,
    pub source_count: i32,
    pub study_hours: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn counter(row_id: DbId, column: &str, value: i32) -> Result<u32, CoreError> {
    u32::try_from(value).map_err(|_| {
        CoreError::Internal(format!(
            "laboratory {row_id} has negative {column} ({value})"
        ))
    })
}

impl TryFrom<LaboratoryRow> for Laboratory {
    type Error = CoreError;

    /// Negative counters can only come from a schema without the `CHECK`
    /// constraints and are reported as an internal error.
    fn try_from(row: LaboratoryRow) -> Result<Self, Self::Error> {
        let settings = match row.settings {
            serde_json::Value::Object(map) => map,
            _ => LaboratorySettings::new(),
        };

        Ok(Laboratory {
            concept_count: counter(row.id, "concept_count", row.concept_count)?,
            source_count: counter(row.id, "source_count", row.source_count)?,
            study_hours: counter(row.id, "study_hours", row.study_hours)?,
            id: row.id,
            name: row.name,
            description: row.description,
            color: row.color,
            icon: row.icon,
            is_active: row.is_active,
            is_archived: row.is_archived,
            settings,
            lightweight_model: row.lightweight_model,
            deep_model: row.deep_model,
            created_at: to_wire_timestamp(row.created_at),
            updated_at: to_wire_timestamp(row.updated_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    fn row() -> LaboratoryRow {
        LaboratoryRow {
            id: 5,
            name: "Philosophy".to_string(),
            description: None,
            color: "#8B5CF6".to_string(),
            icon: "🏛️".to_string(),
            is_active: true,
            is_archived: false,
            settings: serde_json::json!({"theme": "dark"}),
            lightweight_model: Some("llama3.2:3b".to_string()),
            deep_model: None,
            concept_count: 18,
            source_count: 8,
            study_hours: 120,
            created_at: chrono::Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
            updated_at: chrono::Utc.with_ymd_and_hms(2024, 1, 18, 14, 20, 0).unwrap(),
        }
    }

    #[test]
    fn converts_row_into_entity() {
        let lab = Laboratory::try_from(row()).unwrap();
        assert_eq!(lab.concept_count, 18);
        assert_eq!(lab.settings["theme"], "dark");
        assert_eq!(lab.updated_at, "2024-01-18T14:20:00.000Z");
        assert_eq!(lab.display_name(), "🏛️ Philosophy");
    }

    #[test]
    fn non_object_settings_become_empty() {
        let mut r = row();
        r.settings = serde_json::Value::Null;
        assert!(Laboratory::try_from(r).unwrap().settings.is_empty());
    }

    #[test]
    fn negative_counter_is_rejected() {
        let mut r = row();
        r.study_hours = -1;
        assert_matches!(Laboratory::try_from(r), Err(CoreError::Internal(_)));
    }
}
