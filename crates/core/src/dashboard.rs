//! Dashboard-wide aggregation over a collection of laboratories.
//!
//! Every function here is total: it accepts any slice (including an empty
//! one), never fails, and does not depend on ordering. Sums accumulate in
//! `u64`, which cannot wrap for any collection of `u32` counters that fits
//! in memory.

use serde::{Deserialize, Serialize};

use crate::laboratory::Laboratory;

/// Minutes per displayed study hour.
pub const MINUTES_PER_HOUR: u64 = 60;

/// Number of laboratories in the collection.
pub fn total_count(labs: &[Laboratory]) -> u64 {
    labs.len() as u64
}

/// Sum of `concept_count` across the collection.
pub fn total_concepts(labs: &[Laboratory]) -> u64 {
    labs.iter().map(|lab| u64::from(lab.concept_count)).sum()
}

/// Sum of `source_count` across the collection.
pub fn total_sources(labs: &[Laboratory]) -> u64 {
    labs.iter().map(|lab| u64::from(lab.source_count)).sum()
}

/// Accumulated study time in whole hours.
///
/// Minutes are summed first and truncated once, so three labs with 45
/// minutes each report 2 hours, not 0.
pub fn total_study_hours(labs: &[Laboratory]) -> u64 {
    let minutes: u64 = labs.iter().map(|lab| u64::from(lab.study_hours)).sum();
    minutes / MINUTES_PER_HOUR
}

/// The four headline statistics shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_laboratories: u64,
    pub total_concepts: u64,
    pub total_sources: u64,
    pub total_study_hours: u64,
}

impl DashboardSummary {
    pub fn from_laboratories(labs: &[Laboratory]) -> Self {
        Self {
            total_laboratories: total_count(labs),
            total_concepts: total_concepts(labs),
            total_sources: total_sources(labs),
            total_study_hours: total_study_hours(labs),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
