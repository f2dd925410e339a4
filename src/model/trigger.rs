// Copyright 2025 Cowboy AI, LLC.

//! Triggers: the primary, disjunctive half of a reminder

use crate::entity::{EpochMillis, TriggerId};
use crate::model::geo::LocationConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of trigger kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    /// Wall-clock hour window, optionally restricted to days of the week
    TimeWindow,
    /// One absolute instant, delivered by an external one-shot schedule
    ScheduledTime,
    /// Device unlock (proxied by the app becoming active)
    PhoneUnlock,
    /// Entering a monitored geofence
    LocationEnter,
    /// Charging begins
    ChargingStarted,
    /// A named app is opened
    AppOpened,
}

impl TriggerType {
    /// Every trigger type, in declaration order
    pub const ALL: [TriggerType; 6] = [
        TriggerType::TimeWindow,
        TriggerType::ScheduledTime,
        TriggerType::PhoneUnlock,
        TriggerType::LocationEnter,
        TriggerType::ChargingStarted,
        TriggerType::AppOpened,
    ];

    /// Wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::TimeWindow => "TIME_WINDOW",
            TriggerType::ScheduledTime => "SCHEDULED_TIME",
            TriggerType::PhoneUnlock => "PHONE_UNLOCK",
            TriggerType::LocationEnter => "LOCATION_ENTER",
            TriggerType::ChargingStarted => "CHARGING_STARTED",
            TriggerType::AppOpened => "APP_OPENED",
        }
    }

    /// The config kind this trigger type requires
    pub fn expected_config(&self) -> TriggerConfigKind {
        match self {
            TriggerType::TimeWindow => TriggerConfigKind::TimeWindow,
            TriggerType::ScheduledTime => TriggerConfigKind::ScheduledTime,
            TriggerType::PhoneUnlock | TriggerType::ChargingStarted => TriggerConfigKind::None,
            TriggerType::LocationEnter => TriggerConfigKind::Location,
            TriggerType::AppOpened => TriggerConfigKind::AppOpened,
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hour window in local wall-clock time
///
/// The window is half-open, `[start_hour, end_hour)`. When `end_hour` is
/// below `start_hour` it wraps across midnight; equal bounds describe an
/// empty window. Days use 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindowConfig {
    /// First hour inside the window
    pub start_hour: u8,
    /// First hour after the window
    pub end_hour: u8,
    /// Optional day-of-week restriction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
}

impl TimeWindowConfig {
    /// Window with no day restriction
    pub fn new(start_hour: u8, end_hour: u8) -> Self {
        Self {
            start_hour,
            end_hour,
            days_of_week: None,
        }
    }

    /// Restrict the window to the given days
    pub fn on_days(mut self, days: Vec<u8>) -> Self {
        self.days_of_week = Some(days);
        self
    }

    /// Whether `hour` falls inside the window
    pub fn contains_hour(&self, hour: u8) -> bool {
        hour_in_range(self.start_hour, self.end_hour, hour)
    }

    /// Whether `day` passes the day restriction (always true when unset)
    pub fn allows_day(&self, day: u8) -> bool {
        self.days_of_week
            .as_ref()
            .map_or(true, |days| days.contains(&day))
    }
}

/// Half-open hour range check with midnight wrap
pub(crate) fn hour_in_range(start: u8, end: u8, hour: u8) -> bool {
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

/// A single absolute instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTimeConfig {
    /// When the reminder is due
    pub scheduled_at: EpochMillis,
}

/// Identity of an app; at least one of the identity fields must be present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppOpenedConfig {
    /// Display name
    pub app_name: String,
    /// iOS/macOS bundle identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    /// Android activity / package identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
}

impl AppOpenedConfig {
    /// Identify an app by bundle id
    pub fn with_bundle_id(app_name: impl Into<String>, bundle_id: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            bundle_id: Some(bundle_id.into()),
            activity_id: None,
        }
    }

    /// Identify an app by activity id
    pub fn with_activity_id(app_name: impl Into<String>, activity_id: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            bundle_id: None,
            activity_id: Some(activity_id.into()),
        }
    }
}

/// Discriminant of [`TriggerConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerConfigKind {
    /// No payload
    None,
    /// [`TimeWindowConfig`]
    TimeWindow,
    /// [`ScheduledTimeConfig`]
    ScheduledTime,
    /// [`LocationConfig`]
    Location,
    /// [`AppOpenedConfig`]
    AppOpened,
}

/// Trigger payload, tagged by shape
///
/// The shape is stored next to the trigger's [`TriggerType`]; nothing in
/// storage forces them to agree, so validation checks the pairing before
/// looking at any field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum TriggerConfig {
    /// PHONE_UNLOCK and CHARGING_STARTED carry no config
    None,
    /// TIME_WINDOW config
    TimeWindow(TimeWindowConfig),
    /// SCHEDULED_TIME config
    ScheduledTime(ScheduledTimeConfig),
    /// LOCATION_ENTER config
    Location(LocationConfig),
    /// APP_OPENED config
    AppOpened(AppOpenedConfig),
}

impl TriggerConfig {
    /// Discriminant of this payload
    pub fn kind(&self) -> TriggerConfigKind {
        match self {
            TriggerConfig::None => TriggerConfigKind::None,
            TriggerConfig::TimeWindow(_) => TriggerConfigKind::TimeWindow,
            TriggerConfig::ScheduledTime(_) => TriggerConfigKind::ScheduledTime,
            TriggerConfig::Location(_) => TriggerConfigKind::Location,
            TriggerConfig::AppOpened(_) => TriggerConfigKind::AppOpened,
        }
    }
}

/// A primary trigger; any one satisfied trigger is enough to fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    /// Trigger identity
    pub id: TriggerId,
    /// Discriminant
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    /// Payload whose shape must match `trigger_type`
    pub config: TriggerConfig,
}

impl Trigger {
    /// Whether the config shape agrees with the trigger type
    pub fn has_matching_config(&self) -> bool {
        self.trigger_type.expected_config() == self.config.kind()
    }

    /// Geofence identifier a LOCATION_ENTER trigger listens for
    ///
    /// Uses the configured identifier when present, otherwise the trigger
    /// id. `None` for every other trigger type.
    pub fn geofence_id(&self) -> Option<String> {
        match (&self.trigger_type, &self.config) {
            (TriggerType::LocationEnter, TriggerConfig::Location(location)) => Some(
                location
                    .identifier
                    .clone()
                    .unwrap_or_else(|| self.id.to_string()),
            ),
            _ => None,
        }
    }

    /// Scheduled instant of a SCHEDULED_TIME trigger
    pub fn scheduled_at(&self) -> Option<EpochMillis> {
        match (&self.trigger_type, &self.config) {
            (TriggerType::ScheduledTime, TriggerConfig::ScheduledTime(config)) => {
                Some(config.scheduled_at)
            }
            _ => None,
        }
    }
}
