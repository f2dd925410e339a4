// Copyright 2025 Cowboy AI, LLC.

//! Validators for reminder, trigger and condition configs
//!
//! Every `validate_*_config` function is total and side-effect free: it
//! answers `true` or `false` and never panics. [`validate_reminder`]
//! collects every violation instead of stopping at the first one, because
//! callers present all problems at once.

use crate::errors::{ReminderError, ReminderResult};
use crate::model::{
    AppOpenedConfig, Condition, ConditionConfig, DayOfWeekConfig, LocationConfig, Reminder,
    ScheduledTimeConfig, TimeRangeConfig, TimeWindowConfig, Trigger, TriggerConfig,
};
use serde::{Deserialize, Serialize};

const MAX_HOUR: u8 = 23;
const MAX_DAY: u8 = 6;

/// Outcome of validating a whole reminder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Human-readable violations, in evaluation order
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Whether no violation was found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when valid, otherwise a validation error carrying every message
    pub fn into_result(self) -> ReminderResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ReminderError::validation(self.errors))
        }
    }
}

fn valid_hour(hour: u8) -> bool {
    hour <= MAX_HOUR
}

fn valid_days(days: &[u8]) -> bool {
    days.iter().all(|day| *day <= MAX_DAY)
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Hours within 0..=23; every listed day within 0..=6
pub fn validate_time_window_config(config: &TimeWindowConfig) -> bool {
    valid_hour(config.start_hour)
        && valid_hour(config.end_hour)
        && config.days_of_week.as_deref().map_or(true, valid_days)
}

/// A positive instant
pub fn validate_scheduled_time_config(config: &ScheduledTimeConfig) -> bool {
    config.scheduled_at > 0
}

/// Latitude within ±90, longitude within ±180, radius strictly positive
///
/// Shared by LOCATION_ENTER triggers and AT_LOCATION conditions. NaN
/// fails every comparison and is therefore rejected.
pub fn validate_location_config(config: &LocationConfig) -> bool {
    (-90.0..=90.0).contains(&config.latitude)
        && (-180.0..=180.0).contains(&config.longitude)
        && config.radius > 0.0
        && config.radius.is_finite()
}

/// Non-empty app name and at least one non-empty identity field
pub fn validate_app_opened_config(config: &AppOpenedConfig) -> bool {
    non_blank(Some(config.app_name.as_str()))
        && (non_blank(config.bundle_id.as_deref()) || non_blank(config.activity_id.as_deref()))
}

/// Hours within 0..=23
pub fn validate_time_range_config(config: &TimeRangeConfig) -> bool {
    valid_hour(config.start_hour) && valid_hour(config.end_hour)
}

/// Every listed day within 0..=6
pub fn validate_day_of_week_config(config: &DayOfWeekConfig) -> bool {
    valid_days(&config.days)
}

/// The payload is a plain boolean
pub fn validate_is_charging_config(config: &ConditionConfig) -> bool {
    matches!(config, ConditionConfig::IsCharging(_))
}

/// Discriminant first, then the per-shape rule
pub fn validate_trigger(trigger: &Trigger) -> bool {
    if !trigger.has_matching_config() {
        return false;
    }
    match &trigger.config {
        TriggerConfig::None => true,
        TriggerConfig::TimeWindow(config) => validate_time_window_config(config),
        TriggerConfig::ScheduledTime(config) => validate_scheduled_time_config(config),
        TriggerConfig::Location(config) => validate_location_config(config),
        TriggerConfig::AppOpened(config) => validate_app_opened_config(config),
    }
}

/// Discriminant first, then the per-shape rule
pub fn validate_condition(condition: &Condition) -> bool {
    if !condition.has_matching_config() {
        return false;
    }
    match &condition.config {
        ConditionConfig::TimeRange(config) => validate_time_range_config(config),
        ConditionConfig::DayOfWeek(config) => validate_day_of_week_config(config),
        ConditionConfig::IsCharging(_) => validate_is_charging_config(&condition.config),
        ConditionConfig::Location(config) => validate_location_config(config),
    }
}

/// Validate a whole reminder, reporting every violation
pub fn validate_reminder(reminder: &Reminder) -> ValidationReport {
    let mut errors = Vec::new();

    if reminder.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    }

    if reminder.triggers.is_empty() {
        errors.push("At least one trigger is required".to_string());
    }

    for (index, trigger) in reminder.triggers.iter().enumerate() {
        if !validate_trigger(trigger) {
            errors.push(format!(
                "Trigger {} ({}) has an invalid configuration",
                index + 1,
                trigger.trigger_type
            ));
        }
    }

    for (index, condition) in reminder.conditions.iter().enumerate() {
        if !validate_condition(condition) {
            errors.push(format!(
                "Condition {} ({}) has an invalid configuration",
                index + 1,
                condition.condition_type
            ));
        }
    }

    if let Some(expires_at) = reminder.expires_at {
        if expires_at <= reminder.created_at {
            errors.push("Expiration must be after the creation time".to_string());
        }
    }

    ValidationReport { errors }
}
