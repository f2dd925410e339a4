// Copyright 2025 Cowboy AI, LLC.

//! Saved places: named geofences reused when building location triggers

use crate::entity::{now_millis, EpochMillis, SavedPlaceId};
use crate::model::geo::LocationConfig;
use serde::{Deserialize, Serialize};

/// A named, reusable geofence
///
/// Only consulted when a LOCATION_ENTER trigger is built; evaluation never
/// looks at saved places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlace {
    /// Place identity
    pub id: SavedPlaceId,
    /// Display name
    pub name: String,
    /// Centre latitude
    pub latitude: f64,
    /// Centre longitude
    pub longitude: f64,
    /// Radius in meters
    pub radius: f64,
    /// How many triggers were built from this place
    #[serde(default)]
    pub usage_count: u32,
    /// When the place was last used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<EpochMillis>,
    /// When the place was saved
    pub created_at: EpochMillis,
}

impl SavedPlace {
    /// Save a new place
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, radius: f64) -> Self {
        Self {
            id: SavedPlaceId::new(),
            name: name.into(),
            latitude,
            longitude,
            radius,
            usage_count: 0,
            last_used_at: None,
            created_at: now_millis(),
        }
    }

    /// Geofence for a trigger or condition, identified by this place's id
    pub fn location_config(&self) -> LocationConfig {
        LocationConfig::new(self.latitude, self.longitude, self.radius)
            .with_identifier(self.id.to_string())
            .with_name(self.name.clone())
    }

    /// Copy of this place with its usage counters advanced
    pub fn record_use(&self, at: EpochMillis) -> Self {
        Self {
            usage_count: self.usage_count.saturating_add(1),
            last_used_at: Some(at),
            ..self.clone()
        }
    }
}
