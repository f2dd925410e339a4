// Copyright 2025 Cowboy AI, LLC.

//! Per-type trigger satisfaction

use crate::model::{
    AmbientState, AppOpenedConfig, SystemEvent, SystemEventPayload, Trigger, TriggerConfig,
    TriggerType,
};

/// Whether `event` satisfies `trigger` at `ambient`
///
/// A trigger whose config does not match its type is never satisfied.
/// Geofence radius is not re-checked here: the region monitor that emitted
/// the event already enforced it, so LOCATION_ENTER is an identity match.
pub fn trigger_satisfied(trigger: &Trigger, event: &SystemEvent, ambient: &AmbientState) -> bool {
    match (trigger.trigger_type, &trigger.config, &event.payload) {
        (TriggerType::PhoneUnlock, TriggerConfig::None, SystemEventPayload::AppBecameActive) => {
            true
        }
        (
            TriggerType::ChargingStarted,
            TriggerConfig::None,
            SystemEventPayload::ChargingStateChanged { is_charging },
        ) => *is_charging,
        (
            TriggerType::LocationEnter,
            TriggerConfig::Location(_),
            SystemEventPayload::LocationRegionEntered { region_id, .. },
        ) => trigger.geofence_id().as_deref() == Some(region_id.as_str()),
        (
            TriggerType::AppOpened,
            TriggerConfig::AppOpened(config),
            SystemEventPayload::AppOpened {
                bundle_id,
                activity_id,
                ..
            },
        ) => app_identity_matches(config, bundle_id.as_deref(), activity_id.as_deref()),
        (
            TriggerType::TimeWindow,
            TriggerConfig::TimeWindow(window),
            SystemEventPayload::TimeTick,
        ) => window.contains_hour(ambient.hour()) && window.allows_day(ambient.day_of_week()),
        _ => false,
    }
}

fn app_identity_matches(
    config: &AppOpenedConfig,
    bundle_id: Option<&str>,
    activity_id: Option<&str>,
) -> bool {
    fn same(configured: Option<&str>, observed: Option<&str>) -> bool {
        match (configured, observed) {
            (Some(a), Some(b)) => !a.trim().is_empty() && a == b,
            _ => false,
        }
    }

    same(config.bundle_id.as_deref(), bundle_id) || same(config.activity_id.as_deref(), activity_id)
}
