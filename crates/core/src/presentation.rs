//! Per-laboratory values shown on a dashboard card.
//!
//! Each function looks at a single record only. None of them fail:
//! a bad timestamp becomes [`INVALID_DATE`] rather than an error so one
//! malformed record never blocks the rest of the dashboard.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::dashboard::MINUTES_PER_HOUR;
use crate::laboratory::Laboratory;
use crate::types::DbId;

/// Label rendered in place of an unparseable or missing date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Concepts needed to fill the progress bar.
pub const CONCEPTS_FOR_FULL_PROGRESS: u32 = 50;

/// Icon and name joined by a single space.
pub fn display_name(lab: &Laboratory) -> String {
    lab.display_name()
}

/// Heuristic mastery bar: two percent per concept, saturating at 100.
///
/// Not an authoritative measure of progress.
pub fn progress_percent(lab: &Laboratory) -> u8 {
    let pct = u64::from(lab.concept_count) * 100 / u64::from(CONCEPTS_FOR_FULL_PROGRESS);
    pct.min(100) as u8
}

/// Whole hours of study for one laboratory (`study_hours` holds minutes).
pub fn study_hours_display(lab: &Laboratory) -> u32 {
    (u64::from(lab.study_hours) / MINUTES_PER_HOUR) as u32
}

/// Whether the card shows the "Inactive" badge.
///
/// Archived laboratories get no badge of their own; only `is_active` counts.
pub fn is_inactive_badge_visible(lab: &Laboratory) -> bool {
    !lab.is_active
}

/// `updated_at` as a short US-style date (`1/20/2024`).
pub fn formatted_updated_at(lab: &Laboratory) -> String {
    format_display_date(&lab.updated_at)
}

/// Format a stored timestamp as `M/D/YYYY` in UTC.
///
/// Accepts RFC 3339, naive ISO 8601 date-times (read as UTC) and bare
/// `YYYY-MM-DD` dates. Anything else, including the empty string, yields
/// [`INVALID_DATE`].
pub fn format_display_date(raw: &str) -> String {
    match parse_timestamp(raw.trim()) {
        Some(ts) => ts.format("%-m/%-d/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Everything a dashboard card renders for one laboratory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaboratoryCard {
    pub id: DbId,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub concept_count: u32,
    pub source_count: u32,
    pub study_hours: u32,
    pub progress_percent: u8,
    pub show_inactive_badge: bool,
    pub is_archived: bool,
    pub updated_label: String,
}

impl LaboratoryCard {
    pub fn project(lab: &Laboratory) -> Self {
        Self {
            id: lab.id,
            name: lab.name.clone(),
            display_name: display_name(lab),
            description: lab.description.clone(),
            color: lab.color.clone(),
            icon: lab.icon.clone(),
            concept_count: lab.concept_count,
            source_count: lab.source_count,
            study_hours: study_hours_display(lab),
            progress_percent: progress_percent(lab),
            show_inactive_badge: is_inactive_badge_visible(lab),
            is_archived: lab.is_archived,
            updated_label: formatted_updated_at(lab),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
