// Copyright 2025 Cowboy AI, LLC.

//! Configuration for the gate and the runtime
//!
//! Every field has a default, so a partial JSON document is enough:
//!
//! ```rust
//! use cim_domain_reminder::ReminderConfig;
//!
//! let config = ReminderConfig::from_json_str(r#"{ "freeTier": { "maxReminders": 5 } }"#).unwrap();
//! assert_eq!(config.free_tier.max_reminders, 5);
//! assert_eq!(config.runtime.sweep_interval_secs, 60);
//! ```

use crate::errors::ReminderResult;
use crate::model::TriggerType;
use crate::state_machine::ReminderStatus;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which existing reminders count toward the free-tier ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReminderCountPolicy {
    /// WAITING and FIRED reminders count; EXPIRED ones do not
    #[default]
    WaitingAndFired,
    /// Only WAITING reminders count
    WaitingOnly,
    /// Every stored reminder counts
    All,
}

impl ReminderCountPolicy {
    /// Whether a reminder in `status` counts toward the ceiling
    pub fn counts(&self, status: ReminderStatus) -> bool {
        match self {
            ReminderCountPolicy::WaitingAndFired => status != ReminderStatus::Expired,
            ReminderCountPolicy::WaitingOnly => status == ReminderStatus::Waiting,
            ReminderCountPolicy::All => true,
        }
    }
}

/// Limits applied to users without pro access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FreeTierLimits {
    /// Reminder ceiling
    pub max_reminders: usize,
    /// Trigger types that require pro access
    pub blocked_trigger_types: Vec<TriggerType>,
    /// Which reminders count toward the ceiling
    pub count_policy: ReminderCountPolicy,
}

impl Default for FreeTierLimits {
    fn default() -> Self {
        Self {
            max_reminders: 3,
            blocked_trigger_types: vec![TriggerType::LocationEnter, TriggerType::AppOpened],
            count_policy: ReminderCountPolicy::default(),
        }
    }
}

/// How repeated CHARGING_STATE_CHANGED events are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChargingEdgePolicy {
    /// The native source only emits on real edges
    TrustSource,
    /// Drop events that repeat the last observed charging state
    #[default]
    SuppressRepeats,
}

/// Event loop settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuntimeConfig {
    /// Seconds between periodic expiration sweeps
    pub sweep_interval_secs: u64,
    /// Whether each periodic sweep also evaluates a synthetic time tick
    pub emit_time_ticks: bool,
    /// Charging de-duplication ahead of the engine
    pub charging_edge: ChargingEdgePolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
            emit_time_ticks: true,
            charging_edge: ChargingEdgePolicy::default(),
        }
    }
}

impl RuntimeConfig {
    /// Sweep interval as a duration, never shorter than one second
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReminderConfig {
    /// Free-tier limits
    pub free_tier: FreeTierLimits,
    /// Runtime settings
    pub runtime: RuntimeConfig,
}

impl ReminderConfig {
    /// Parse a JSON config document; missing fields take defaults
    pub fn from_json_str(json: &str) -> ReminderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace the free-tier limits
    pub fn with_free_tier(mut self, free_tier: FreeTierLimits) -> Self {
        self.free_tier = free_tier;
        self
    }

    /// Replace the charging edge policy
    pub fn with_charging_edge(mut self, policy: ChargingEdgePolicy) -> Self {
        self.runtime.charging_edge = policy;
        self
    }

    /// Replace the sweep interval
    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.runtime.sweep_interval_secs = secs;
        self
    }
}
