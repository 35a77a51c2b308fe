//! Laboratory entity and mutation request shaping.
//!
//! A [`Laboratory`] is a named knowledge domain with its own color, icon
//! and statistics. Counters are maintained by the persistence layer and are
//! never recomputed here. [`CreateLaboratory`] and [`UpdateLaboratory`] are
//! the only way mutations enter the system; both pass through
//! [`build_create_request`] / [`build_update_request`] before reaching a store.

use std::borrow::Cow;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Color assigned by persistence when a create request omits one.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Icon assigned by persistence when a create request omits one.
pub const DEFAULT_ICON: &str = "🧪";

/// Open key/value bag attached to every laboratory. Never interpreted here.
pub type LaboratorySettings = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A laboratory record as supplied by a store.
///
/// `study_hours` holds accumulated **minutes**; the name is historical and
/// kept so that stored values keep their meaning.
///
/// Timestamps are RFC 3339 strings (see [`crate::types::to_wire_timestamp`]).
/// They stay strings so a malformed value from an upstream source degrades
/// to an "Invalid Date" label instead of rejecting the whole record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Laboratory {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub is_active: bool,
    pub is_archived: bool,
    #[serde(default)]
    pub settings: LaboratorySettings,
    #[serde(default)]
    pub lightweight_model: Option<String>,
    #[serde(default)]
    pub deep_model: Option<String>,
    #[serde(default)]
    pub concept_count: u32,
    #[serde(default)]
    pub source_count: u32,
    #[serde(default)]
    pub study_hours: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Laboratory {
    /// Icon and name joined by a single space, e.g. `"🤖 Artificial Intelligence"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }

    /// Apply every supplied field of `update` to this record.
    ///
    /// Fields left as `None` are untouched and an explicit `null` clears a
    /// nullable field. `settings` is replaced wholesale.
    /// Does not touch `updated_at`; refreshing it is the store's job.
    pub fn apply(&mut self, update: &UpdateLaboratory) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(color) = &update.color {
            self.color = color.clone();
        }
        if let Some(icon) = &update.icon {
            self.icon = icon.clone();
        }
        if let Some(model) = &update.lightweight_model {
            self.lightweight_model = model.clone();
        }
        if let Some(model) = &update.deep_model {
            self.deep_model = model.clone();
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(is_archived) = update.is_archived {
            self.is_archived = is_archived;
        }
        if let Some(settings) = &update.settings {
            self.settings = settings.clone();
        }
    }
}

// `display_name` is derived on the way out so it can never drift from
// `icon` / `name`. Incoming `display_name` keys are ignored by `Deserialize`.
impl Serialize for Laboratory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Laboratory", 16)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("color", &self.color)?;
        state.serialize_field("icon", &self.icon)?;
        state.serialize_field("is_active", &self.is_active)?;
        state.serialize_field("is_archived", &self.is_archived)?;
        state.serialize_field("settings", &self.settings)?;
        state.serialize_field("lightweight_model", &self.lightweight_model)?;
        state.serialize_field("deep_model", &self.deep_model)?;
        state.serialize_field("concept_count", &self.concept_count)?;
        state.serialize_field("source_count", &self.source_count)?;
        state.serialize_field("study_hours", &self.study_hours)?;
        state.serialize_field("created_at", &self.created_at)?;
        state.serialize_field("updated_at", &self.updated_at)?;
        state.serialize_field("display_name", &self.display_name())?;
        state.end()
    }
}

// ---------------------------------------------------------------------------
// Mutation DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a laboratory.
///
/// Optional fields are serialized only when supplied, so a request built
/// from `{"name": "Physics"}` serializes back to exactly that object.
/// A missing `name` key deserializes to `""` and is rejected by
/// [`build_create_request`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateLaboratory {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lightweight_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_model: Option<String>,
}

impl CreateLaboratory {
    /// A request carrying only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// DTO for partially updating a laboratory. All fields are optional.
///
/// `None` means "leave unchanged"; `Some(false)` or `Some("")` are real
/// values and are applied. Only supplied keys are serialized.
///
/// `description`, `lightweight_model` and `deep_model` are nullable:
/// `Some(None)` (an explicit JSON `null`) clears the stored value. The
/// remaining fields cannot be null; a `null` for one of them is recorded in
/// `explicit_nulls` and rejected by [`build_update_request`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(from = "UpdateLaboratoryWire")]
pub struct UpdateLaboratory {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lightweight_model: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_model: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<LaboratorySettings>,
    /// Non-nullable keys that arrived as `null`.
    #[serde(skip)]
    pub explicit_nulls: Vec<&'static str>,
}

/// Incoming JSON shape of [`UpdateLaboratory`]. Every key is read as
/// `Option<Option<T>>` so an explicit `null` stays distinct from a missing key.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateLaboratoryWire {
    #[serde(default, deserialize_with = "present")]
    name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    color: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    lightweight_model: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    deep_model: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    is_active: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    is_archived: Option<Option<bool>>,
    #[serde(default, deserialize_with = "present")]
    settings: Option<Option<LaboratorySettings>>,
}

/// Wrap any present value, `null` included, in `Some`. A missing key never
/// reaches this function and falls back to `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Unwrap a non-nullable key, remembering it if it was sent as `null`.
fn non_null<T>(
    field: &'static str,
    value: Option<Option<T>>,
    nulls: &mut Vec<&'static str>,
) -> Option<T> {
    match value {
        Some(None) => {
            nulls.push(field);
            None
        }
        other => other.flatten(),
    }
}

impl From<UpdateLaboratoryWire> for UpdateLaboratory {
    fn from(wire: UpdateLaboratoryWire) -> Self {
        let mut nulls = Vec::new();
        Self {
            name: non_null("name", wire.name, &mut nulls),
            description: wire.description,
            color: non_null("color", wire.color, &mut nulls),
            icon: non_null("icon", wire.icon, &mut nulls),
            lightweight_model: wire.lightweight_model,
            deep_model: wire.deep_model,
            is_active: non_null("is_active", wire.is_active, &mut nulls),
            is_archived: non_null("is_archived", wire.is_archived, &mut nulls),
            settings: non_null("settings", wire.settings, &mut nulls),
            explicit_nulls: nulls,
        }
    }
}

impl UpdateLaboratory {
    /// Names of the fields the caller supplied, in declaration order.
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("description", self.description.is_some()),
            ("color", self.color.is_some()),
            ("icon", self.icon.is_some()),
            ("lightweight_model", self.lightweight_model.is_some()),
            ("deep_model", self.deep_model.is_some()),
            ("is_active", self.is_active.is_some()),
            ("is_archived", self.is_archived.is_some()),
            ("settings", self.settings.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, supplied)| {
            (supplied || self.explicit_nulls.contains(&field)).then_some(field)
        })
        .collect()
    }

    /// `true` when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.supplied_fields().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Shaping
// ---------------------------------------------------------------------------

/// Normalize and validate a create request.
///
/// The name is trimmed; a blank or missing name fails with
/// [`CoreError::Validation`] on `name`. Optional fields pass through
/// untouched and are never defaulted here.
pub fn build_create_request(mut input: CreateLaboratory) -> Result<CreateLaboratory, CoreError> {
    input.name = input.name.trim().to_string();
    input.validate().map_err(first_field_error)?;
    Ok(input)
}

/// Normalize and validate a partial update.
///
/// A `null` for a non-nullable field fails on that field. Otherwise only a
/// supplied `name` is checked (and trimmed). Key presence is kept exactly as
/// the caller provided it.
pub fn build_update_request(mut input: UpdateLaboratory) -> Result<UpdateLaboratory, CoreError> {
    if let Some(field) = input.explicit_nulls.first() {
        return Err(CoreError::validation(*field, "must not be null"));
    }
    if let Some(name) = input.name.as_mut() {
        *name = name.trim().to_string();
    }
    input.validate().map_err(first_field_error)?;
    Ok(input)
}

/// Reject strings that are empty once surrounding whitespace is removed.
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

/// Collapse `validator` output into a single [`CoreError::Validation`],
/// picking the alphabetically first offending field for stable messages.
fn first_field_error(errors: ValidationErrors) -> CoreError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    match fields.first() {
        Some((field, field_errors)) => {
            let message = field_errors
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            CoreError::validation(field.to_string(), message)
        }
        None => CoreError::validation("request", errors.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn lab() -> Laboratory {
        Laboratory {
            id: 1,
            name: "Artificial Intelligence".to_string(),
            description: Some("Machine Learning".to_string()),
            color: "#3B82F6".to_string(),
            icon: "🤖".to_string(),
            is_active: true,
            is_archived: false,
            settings: LaboratorySettings::new(),
            lightweight_model: None,
            deep_model: None,
            concept_count: 24,
            source_count: 12,
            study_hours: 180,
            created_at: "2024-01-15T10:00:00.000Z".to_string(),
            updated_at: "2024-01-20T15:30:00.000Z".to_string(),
        }
    }

    // -- Entity ----------------------------------------------------------

    #[test]
    fn display_name_joins_icon_and_name() {
        assert_eq!(lab().display_name(), "🤖 Artificial Intelligence");
    }

    #[test]
    fn serialization_includes_derived_display_name() {
        let value = serde_json::to_value(lab()).unwrap();
        assert_eq!(value["display_name"], "🤖 Artificial Intelligence");
        assert_eq!(value["study_hours"], 180);
        assert_eq!(value["settings"], json!({}));
    }

    #[test]
    fn stale_display_name_in_input_is_ignored() {
        let mut value = serde_json::to_value(lab()).unwrap();
        value["display_name"] = json!("something else");
        value["icon"] = json!("🧠");

        let parsed: Laboratory = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.display_name(), "🧠 Artificial Intelligence");
    }

    #[test]
    fn missing_counters_deserialize_as_zero() {
        let parsed: Laboratory = serde_json::from_value(json!({
            "id": 9,
            "name": "Bare",
            "color": "#000000",
            "icon": "x",
            "is_active": true,
            "is_archived": false
        }))
        .unwrap();
        assert_eq!(parsed.concept_count, 0);
        assert_eq!(parsed.source_count, 0);
        assert_eq!(parsed.study_hours, 0);
        assert!(parsed.updated_at.is_empty());
    }

    #[test]
    fn apply_changes_only_supplied_fields() {
        let mut record = lab();
        let update = UpdateLaboratory {
            is_active: Some(false),
            description: Some(Some(String::new())),
            ..Default::default()
        };
        record.apply(&update);

        assert!(!record.is_active);
        assert_eq!(record.description.as_deref(), Some(""));
        assert_eq!(record.name, "Artificial Intelligence");
        assert_eq!(record.color, "#3B82F6");
    }

    #[test]
    fn apply_replaces_settings_wholesale() {
        let mut record = lab();
        record.settings.insert("old".into(), json!(1));

        let mut settings = LaboratorySettings::new();
        settings.insert("new".into(), json!(true));
        record.apply(&UpdateLaboratory {
            settings: Some(settings),
            ..Default::default()
        });

        assert!(record.settings.get("old").is_none());
        assert_eq!(record.settings["new"], json!(true));
    }

    // -- build_create_request -----------------------------------------------

    #[test]
    fn create_with_empty_name_fails_on_name() {
        let err = build_create_request(CreateLaboratory::new("")).unwrap_err();
        assert_matches!(err, CoreError::Validation { ref field, .. } if field == "name");
    }

    #[test]
    fn create_with_whitespace_name_fails() {
        assert_matches!(
            build_create_request(CreateLaboratory::new("   \t")),
            Err(CoreError::Validation { .. })
        );
    }

    #[test]
    fn create_with_absent_name_fails() {
        let input: CreateLaboratory = serde_json::from_value(json!({"color": "#fff"})).unwrap();
        assert_matches!(
            build_create_request(input),
            Err(CoreError::Validation { ref field, .. }) if field == "name"
        );
    }

    #[test]
    fn create_with_name_only_serializes_to_name_only() {
        let request = build_create_request(CreateLaboratory::new("Physics")).unwrap();
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"name": "Physics"}));
    }

    #[test]
    fn create_trims_name() {
        let request = build_create_request(CreateLaboratory::new("  Physics ")).unwrap();
        assert_eq!(request.name, "Physics");
    }

    #[test]
    fn create_keeps_explicit_empty_optional_values() {
        let input: CreateLaboratory =
            serde_json::from_value(json!({"name": "Physics", "description": ""})).unwrap();
        let request = build_create_request(input).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "Physics", "description": ""})
        );
    }

    #[test]
    fn create_rejects_unknown_fields() {
        let parsed: Result<CreateLaboratory, _> =
            serde_json::from_value(json!({"name": "Physics", "concept_count": 3}));
        assert!(parsed.is_err());
    }

    // -- build_update_request -----------------------------------------------

    #[test]
    fn update_with_false_flag_keeps_exactly_that_key() {
        let input: UpdateLaboratory = serde_json::from_value(json!({"is_active": false})).unwrap();
        let request = build_update_request(input).unwrap();

        assert_eq!(request.supplied_fields(), vec!["is_active"]);
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"is_active": false}));
    }

    #[test]
    fn update_with_blank_name_fails() {
        let input = UpdateLaboratory {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_matches!(
            build_update_request(input),
            Err(CoreError::Validation { ref field, .. }) if field == "name"
        );
    }

    #[test]
    fn update_without_name_is_not_validated_for_name() {
        let input = UpdateLaboratory {
            color: Some(String::new()),
            icon: Some(String::new()),
            ..Default::default()
        };
        let request = build_update_request(input).unwrap();
        assert_eq!(request.supplied_fields(), vec!["color", "icon"]);
    }

    #[test]
    fn null_description_is_supplied_and_kept() {
        let input: UpdateLaboratory =
            serde_json::from_value(json!({"description": null})).unwrap();
        let request = build_update_request(input).unwrap();

        assert_eq!(request.description, Some(None));
        assert_eq!(request.supplied_fields(), vec!["description"]);
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"description": null}));
    }

    #[test]
    fn null_clears_nullable_fields_on_apply() {
        let mut record = lab();
        record.deep_model = Some("large".to_string());
        let input: UpdateLaboratory =
            serde_json::from_value(json!({"description": null, "deep_model": null})).unwrap();
        record.apply(&build_update_request(input).unwrap());

        assert_eq!(record.description, None);
        assert_eq!(record.deep_model, None);
        assert_eq!(record.name, "Artificial Intelligence");
    }

    #[test]
    fn null_for_non_nullable_field_fails_on_that_field() {
        for field in ["name", "color", "icon", "is_active", "is_archived", "settings"] {
            let mut body = serde_json::Map::new();
            body.insert(field.to_string(), serde_json::Value::Null);
            let input: UpdateLaboratory =
                serde_json::from_value(serde_json::Value::Object(body)).unwrap();
            assert_eq!(input.supplied_fields(), vec![field]);
            assert_matches!(
                build_update_request(input),
                Err(CoreError::Validation { field: ref f, .. }) if f == field,
                "{field}"
            );
        }
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let parsed: Result<UpdateLaboratory, _> =
            serde_json::from_value(json!({"study_hours": 10}));
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_update_is_empty() {
        let request = build_update_request(UpdateLaboratory::default()).unwrap();
        assert!(request.is_empty());
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({}));
    }
}
