// Copyright 2025 Cowboy AI, LLC.

//! Conditions: conjunctive gates checked against ambient state once a
//! trigger is satisfied

use crate::entity::ConditionId;
use crate::model::geo::LocationConfig;
use crate::model::trigger::hour_in_range;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of condition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionType {
    /// Local hour inside a range
    TimeRange,
    /// Current day in a set
    DayOfWeek,
    /// Charging state equals the configured value
    IsCharging,
    /// Last known location inside a geofence
    AtLocation,
}

impl ConditionType {
    /// Wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::TimeRange => "TIME_RANGE",
            ConditionType::DayOfWeek => "DAY_OF_WEEK",
            ConditionType::IsCharging => "IS_CHARGING",
            ConditionType::AtLocation => "AT_LOCATION",
        }
    }

    /// The config kind this condition type requires
    pub fn expected_config(&self) -> ConditionConfigKind {
        match self {
            ConditionType::TimeRange => ConditionConfigKind::TimeRange,
            ConditionType::DayOfWeek => ConditionConfigKind::DayOfWeek,
            ConditionType::IsCharging => ConditionConfigKind::IsCharging,
            ConditionType::AtLocation => ConditionConfigKind::Location,
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hour range with the same half-open, wrapping rule as a time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeConfig {
    /// First hour inside the range
    pub start_hour: u8,
    /// First hour after the range
    pub end_hour: u8,
}

impl TimeRangeConfig {
    /// Create a range
    pub fn new(start_hour: u8, end_hour: u8) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether `hour` falls inside the range
    pub fn contains_hour(&self, hour: u8) -> bool {
        hour_in_range(self.start_hour, self.end_hour, hour)
    }
}

/// Set of allowed days, 0 = Sunday through 6 = Saturday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOfWeekConfig {
    /// Allowed days
    pub days: Vec<u8>,
}

/// Discriminant of [`ConditionConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionConfigKind {
    /// [`TimeRangeConfig`]
    TimeRange,
    /// [`DayOfWeekConfig`]
    DayOfWeek,
    /// Plain boolean
    IsCharging,
    /// [`LocationConfig`]
    Location,
}

/// Condition payload, tagged by shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ConditionConfig {
    /// TIME_RANGE config
    TimeRange(TimeRangeConfig),
    /// DAY_OF_WEEK config
    DayOfWeek(DayOfWeekConfig),
    /// IS_CHARGING config: exactly a boolean
    IsCharging(bool),
    /// AT_LOCATION config
    Location(LocationConfig),
}

impl ConditionConfig {
    /// Discriminant of this payload
    pub fn kind(&self) -> ConditionConfigKind {
        match self {
            ConditionConfig::TimeRange(_) => ConditionConfigKind::TimeRange,
            ConditionConfig::DayOfWeek(_) => ConditionConfigKind::DayOfWeek,
            ConditionConfig::IsCharging(_) => ConditionConfigKind::IsCharging,
            ConditionConfig::Location(_) => ConditionConfigKind::Location,
        }
    }
}

/// A gating condition; all of a reminder's conditions must hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition identity
    pub id: ConditionId,
    /// Discriminant
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    /// Payload whose shape must match `condition_type`
    pub config: ConditionConfig,
}

impl Condition {
    /// Whether the config shape agrees with the condition type
    pub fn has_matching_config(&self) -> bool {
        self.condition_type.expected_config() == self.config.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_charging_serializes_as_plain_boolean() {
        let value = serde_json::to_value(ConditionConfig::IsCharging(true)).unwrap();
        assert_eq!(value, json!({ "kind": "isCharging", "value": true }));
    }

    #[test]
    fn test_is_charging_rejects_record_payload() {
        let raw = json!({ "kind": "isCharging", "value": { "charging": true } });
        assert!(serde_json::from_value::<ConditionConfig>(raw).is_err());
    }

    #[test]
    fn test_day_set_rejects_scalar() {
        let raw = json!({ "kind": "dayOfWeek", "value": { "days": 3 } });
        assert!(serde_json::from_value::<ConditionConfig>(raw).is_err());
    }

    #[test]
    fn test_config_kind_matching() {
        let condition = Condition {
            id: ConditionId::new(),
            condition_type: ConditionType::IsCharging,
            config: ConditionConfig::TimeRange(TimeRangeConfig::new(1, 2)),
        };
        assert!(!condition.has_matching_config());
    }
}
