// Copyright 2025 Cowboy AI, LLC.

//! Edge detection for charging events

use crate::config::ChargingEdgePolicy;
use crate::model::{SystemEvent, SystemEventPayload};
use tracing::debug;

/// Drops CHARGING_STATE_CHANGED events that repeat the last observed state
///
/// Some platforms re-send the current charging state on resume; without
/// this, a CHARGING_STARTED reminder created after plugging in would fire on
/// the next repeat.
#[derive(Debug, Clone, Default)]
pub struct ChargingEdgeFilter {
    policy: ChargingEdgePolicy,
    last_observed: Option<bool>,
}

impl ChargingEdgeFilter {
    /// Filter applying `policy`
    pub fn new(policy: ChargingEdgePolicy) -> Self {
        Self {
            policy,
            last_observed: None,
        }
    }

    /// Filter that already knows the current charging state
    pub fn seeded(policy: ChargingEdgePolicy, is_charging: Option<bool>) -> Self {
        Self {
            policy,
            last_observed: is_charging,
        }
    }

    /// Policy in force
    pub fn policy(&self) -> ChargingEdgePolicy {
        self.policy
    }

    /// Last charging state seen
    pub fn last_observed(&self) -> Option<bool> {
        self.last_observed
    }

    /// Whether `event` should reach the engine
    ///
    /// Events of other kinds always pass.
    pub fn admit(&mut self, event: &SystemEvent) -> bool {
        let SystemEventPayload::ChargingStateChanged { is_charging } = event.payload else {
            return true;
        };

        let previous = self.last_observed.replace(is_charging);
        match self.policy {
            ChargingEdgePolicy::TrustSource => true,
            ChargingEdgePolicy::SuppressRepeats if previous == Some(is_charging) => {
                debug!(is_charging, "Dropping repeated charging state");
                false
            }
            ChargingEdgePolicy::SuppressRepeats => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ChargingEdgePolicy::SuppressRepeats, &[true, true, false, false, true], &[true, false, true, false, true]; "suppress repeats")]
    #[test_case(ChargingEdgePolicy::TrustSource, &[true, true, false], &[true, true, true]; "trust source")]
    fn test_admission(policy: ChargingEdgePolicy, states: &[bool], expected: &[bool]) {
        let mut filter = ChargingEdgeFilter::new(policy);
        let admitted: Vec<bool> = states
            .iter()
            .map(|s| filter.admit(&SystemEvent::charging_state_changed(0, *s)))
            .collect();
        assert_eq!(admitted, expected);
    }

    #[test]
    fn test_seeded_state_suppresses_first_repeat() {
        let mut filter = ChargingEdgeFilter::seeded(ChargingEdgePolicy::SuppressRepeats, Some(true));
        assert!(!filter.admit(&SystemEvent::charging_state_changed(0, true)));
        assert!(filter.admit(&SystemEvent::charging_state_changed(1, false)));
        assert_eq!(filter.last_observed(), Some(false));
    }

    #[test]
    fn test_other_events_pass() {
        let mut filter = ChargingEdgeFilter::seeded(ChargingEdgePolicy::SuppressRepeats, Some(true));
        assert!(filter.admit(&SystemEvent::app_became_active(0)));
        assert!(filter.admit(&SystemEvent::app_became_active(0)));
    }
}
