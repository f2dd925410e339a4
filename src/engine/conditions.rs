// Copyright 2025 Cowboy AI, LLC.

//! Conjunctive condition gate

use crate::model::{AmbientState, Condition, ConditionConfig};

/// Whether a single condition holds at `ambient`
///
/// Fails closed: a mismatched config or missing ambient data (unknown
/// charging state, no location fix) evaluates to `false`.
pub fn condition_holds(condition: &Condition, ambient: &AmbientState) -> bool {
    if !condition.has_matching_config() {
        return false;
    }
    match &condition.config {
        ConditionConfig::TimeRange(range) => range.contains_hour(ambient.hour()),
        ConditionConfig::DayOfWeek(days) => days.days.contains(&ambient.day_of_week()),
        ConditionConfig::IsCharging(expected) => ambient.is_charging == Some(*expected),
        ConditionConfig::Location(fence) => ambient
            .location
            .as_ref()
            .is_some_and(|here| fence.contains(here)),
    }
}

/// Whether every condition holds; vacuously true for an empty list
pub fn conditions_hold(conditions: &[Condition], ambient: &AmbientState) -> bool {
    conditions.iter().all(|c| condition_holds(c, ambient))
}
