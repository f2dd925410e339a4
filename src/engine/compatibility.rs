// Copyright 2025 Cowboy AI, LLC.

//! Fixed event → trigger-type compatibility table

use crate::model::{SystemEventType, TriggerType};

/// Trigger types an event of `event_type` can satisfy
///
/// SCHEDULED_TIME is absent on purpose: it is delivered by an external
/// one-shot schedule, not by the event feed.
pub fn compatible_trigger_types(event_type: SystemEventType) -> &'static [TriggerType] {
    match event_type {
        SystemEventType::AppBecameActive => &[TriggerType::PhoneUnlock],
        SystemEventType::ChargingStateChanged => &[TriggerType::ChargingStarted],
        SystemEventType::LocationRegionEntered => &[TriggerType::LocationEnter],
        SystemEventType::AppOpened => &[TriggerType::AppOpened],
        SystemEventType::TimeTick => &[TriggerType::TimeWindow],
    }
}

/// Whether an event of `event_type` can satisfy a trigger of `trigger_type`
pub fn is_compatible(event_type: SystemEventType, trigger_type: TriggerType) -> bool {
    compatible_trigger_types(event_type).contains(&trigger_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_trigger_type_has_at_most_one_event() {
        let events = [
            SystemEventType::AppBecameActive,
            SystemEventType::ChargingStateChanged,
            SystemEventType::LocationRegionEntered,
            SystemEventType::AppOpened,
            SystemEventType::TimeTick,
        ];
        for trigger_type in TriggerType::ALL {
            let matches = events
                .iter()
                .filter(|e| is_compatible(**e, trigger_type))
                .count();
            let expected = usize::from(trigger_type != TriggerType::ScheduledTime);
            assert_eq!(matches, expected, "{trigger_type}");
        }
    }

    #[test]
    fn test_unlock_ignores_charging() {
        assert!(!is_compatible(
            SystemEventType::ChargingStateChanged,
            TriggerType::PhoneUnlock
        ));
        assert!(is_compatible(
            SystemEventType::AppBecameActive,
            TriggerType::PhoneUnlock
        ));
    }
}
