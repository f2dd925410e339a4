// Copyright 2025 Cowboy AI, LLC.

//! System events pushed in by the native event source

use crate::entity::EpochMillis;
use crate::model::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a [`SystemEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemEventType {
    /// The app came to the foreground; proxy for a device unlock
    AppBecameActive,
    /// Charging began or stopped
    ChargingStateChanged,
    /// The region monitor reported entry into a geofence
    LocationRegionEntered,
    /// A named app was opened
    AppOpened,
    /// Synthetic "time advanced" tick
    TimeTick,
}

impl SystemEventType {
    /// Wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemEventType::AppBecameActive => "APP_BECAME_ACTIVE",
            SystemEventType::ChargingStateChanged => "CHARGING_STATE_CHANGED",
            SystemEventType::LocationRegionEntered => "LOCATION_REGION_ENTERED",
            SystemEventType::AppOpened => "APP_OPENED",
            SystemEventType::TimeTick => "TIME_TICK",
        }
    }
}

impl fmt::Display for SystemEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific event payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemEventPayload {
    /// No payload
    AppBecameActive,
    /// New charging state
    #[serde(rename_all = "camelCase")]
    ChargingStateChanged {
        /// Whether the device is now charging
        is_charging: bool,
    },
    /// Region entry
    #[serde(rename_all = "camelCase")]
    LocationRegionEntered {
        /// Identifier the region was registered under
        region_id: String,
        /// Where the device was when the region fired, if reported
        #[serde(default, skip_serializing_if = "Option::is_none")]
        coordinates: Option<Coordinates>,
    },
    /// Foreground app identity
    #[serde(rename_all = "camelCase")]
    AppOpened {
        /// Display name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        app_name: Option<String>,
        /// Bundle identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bundle_id: Option<String>,
        /// Activity / package identifier
        #[serde(default, skip_serializing_if = "Option::is_none")]
        activity_id: Option<String>,
    },
    /// No payload; the evaluation time comes from ambient state
    TimeTick,
}

/// An ephemeral, timestamped signal about a device-state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemEvent {
    /// When the event was observed
    pub timestamp: EpochMillis,
    /// Kind and payload
    #[serde(flatten)]
    pub payload: SystemEventPayload,
}

impl SystemEvent {
    /// Create an event from a payload
    pub fn new(timestamp: EpochMillis, payload: SystemEventPayload) -> Self {
        Self { timestamp, payload }
    }

    /// App came to the foreground
    pub fn app_became_active(timestamp: EpochMillis) -> Self {
        Self::new(timestamp, SystemEventPayload::AppBecameActive)
    }

    /// Charging state changed
    pub fn charging_state_changed(timestamp: EpochMillis, is_charging: bool) -> Self {
        Self::new(
            timestamp,
            SystemEventPayload::ChargingStateChanged { is_charging },
        )
    }

    /// Region entered
    pub fn region_entered(timestamp: EpochMillis, region_id: impl Into<String>) -> Self {
        Self::new(
            timestamp,
            SystemEventPayload::LocationRegionEntered {
                region_id: region_id.into(),
                coordinates: None,
            },
        )
    }

    /// App opened, identified by bundle id
    pub fn app_opened(timestamp: EpochMillis, bundle_id: impl Into<String>) -> Self {
        Self::new(
            timestamp,
            SystemEventPayload::AppOpened {
                app_name: None,
                bundle_id: Some(bundle_id.into()),
                activity_id: None,
            },
        )
    }

    /// Synthetic time tick
    pub fn time_tick(timestamp: EpochMillis) -> Self {
        Self::new(timestamp, SystemEventPayload::TimeTick)
    }

    /// Discriminant of this event
    pub fn event_type(&self) -> SystemEventType {
        match self.payload {
            SystemEventPayload::AppBecameActive => SystemEventType::AppBecameActive,
            SystemEventPayload::ChargingStateChanged { .. } => {
                SystemEventType::ChargingStateChanged
            }
            SystemEventPayload::LocationRegionEntered { .. } => {
                SystemEventType::LocationRegionEntered
            }
            SystemEventPayload::AppOpened { .. } => SystemEventType::AppOpened,
            SystemEventPayload::TimeTick => SystemEventType::TimeTick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_format_is_flat() {
        let event = SystemEvent::charging_state_changed(1_000, true);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({ "timestamp": 1000, "type": "CHARGING_STATE_CHANGED", "isCharging": true })
        );

        let back: SystemEvent = serde_json::from_value(value).unwrap();
        assert_eq!(back.event_type(), SystemEventType::ChargingStateChanged);
    }

    #[test]
    fn test_region_event_decodes_from_native_payload() {
        let raw = json!({
            "timestamp": 5,
            "type": "LOCATION_REGION_ENTERED",
            "regionId": "home",
            "coordinates": { "latitude": 1.5, "longitude": 2.5 }
        });
        let event: SystemEvent = serde_json::from_value(raw).unwrap();
        match event.payload {
            SystemEventPayload::LocationRegionEntered {
                region_id,
                coordinates,
            } => {
                assert_eq!(region_id, "home");
                assert_eq!(coordinates, Some(Coordinates::new(1.5, 2.5)));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let raw = json!({ "timestamp": 5, "type": "SCREEN_DIMMED" });
        assert!(serde_json::from_value::<SystemEvent>(raw).is_err());
    }
}
