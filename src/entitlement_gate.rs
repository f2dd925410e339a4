// Copyright 2025 Cowboy AI, LLC.

//! Free-tier gate applied when a reminder is created
//!
//! The gate runs when a reminder is created or its triggers are edited.
//! Stored reminders are never re-checked, so a lapsed subscription does not
//! invalidate them.

use crate::config::FreeTierLimits;
use crate::model::{PaymentEntitlement, Reminder, Trigger, TriggerType};
use crate::state_machine::ReminderStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Why creation was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementViolation {
    /// The ceiling is already reached
    #[error("free tier allows {limit} reminders, {current} already exist")]
    ReminderLimitReached {
        /// Configured ceiling
        limit: usize,
        /// Reminders counted under the active policy
        current: usize,
    },

    /// A trigger type is reserved for pro users
    #[error("trigger type {0} requires pro access")]
    TriggerTypeRequiresPro(TriggerType),
}

/// Existing reminder counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderUsage {
    /// WAITING reminders
    pub waiting: usize,
    /// FIRED reminders
    pub fired: usize,
    /// EXPIRED reminders
    pub expired: usize,
}

impl ReminderUsage {
    /// Tally a set of reminders
    pub fn from_reminders<'a>(reminders: impl IntoIterator<Item = &'a Reminder>) -> Self {
        reminders
            .into_iter()
            .fold(Self::default(), |usage, r| usage.with(r.status))
    }

    /// Usage with one more reminder in `status`
    pub fn with(mut self, status: ReminderStatus) -> Self {
        match status {
            ReminderStatus::Waiting => self.waiting += 1,
            ReminderStatus::Fired => self.fired += 1,
            ReminderStatus::Expired => self.expired += 1,
        }
        self
    }

    /// Number of reminders `limits` counts toward the ceiling
    pub fn counted(&self, limits: &FreeTierLimits) -> usize {
        [
            (ReminderStatus::Waiting, self.waiting),
            (ReminderStatus::Fired, self.fired),
            (ReminderStatus::Expired, self.expired),
        ]
        .into_iter()
        .filter(|(status, _)| limits.count_policy.counts(*status))
        .map(|(_, n)| n)
        .sum()
    }

    /// Total of every status
    pub fn total(&self) -> usize {
        self.waiting + self.fired + self.expired
    }
}

/// Creation-time entitlement check
#[derive(Debug, Clone, Default)]
pub struct EntitlementGate {
    limits: FreeTierLimits,
}

impl EntitlementGate {
    /// Gate enforcing `limits`
    pub fn new(limits: FreeTierLimits) -> Self {
        Self { limits }
    }

    /// The limits in force
    pub fn limits(&self) -> &FreeTierLimits {
        &self.limits
    }

    /// Allow or refuse a reminder with `triggers`
    ///
    /// Pro users always pass. Free users are refused when the counted
    /// usage has reached the ceiling, or when any trigger type is blocked.
    pub fn check(
        &self,
        entitlement: &PaymentEntitlement,
        usage: &ReminderUsage,
        triggers: &[Trigger],
    ) -> Result<(), EntitlementViolation> {
        if entitlement.has_pro_access {
            return Ok(());
        }

        let current = usage.counted(&self.limits);
        if current >= self.limits.max_reminders {
            debug!(
                current,
                limit = self.limits.max_reminders,
                "Free-tier reminder ceiling reached"
            );
            return Err(EntitlementViolation::ReminderLimitReached {
                limit: self.limits.max_reminders,
                current,
            });
        }

        self.check_trigger_types(entitlement, triggers)
    }

    /// Refuse pro-only trigger types for free users
    ///
    /// Used alone when an existing reminder is edited: the edit does not add
    /// a reminder, so only the trigger types are re-checked.
    pub fn check_trigger_types(
        &self,
        entitlement: &PaymentEntitlement,
        triggers: &[Trigger],
    ) -> Result<(), EntitlementViolation> {
        if entitlement.has_pro_access {
            return Ok(());
        }

        if let Some(blocked) = triggers
            .iter()
            .map(|t| t.trigger_type)
            .find(|t| self.limits.blocked_trigger_types.contains(t))
        {
            debug!(trigger_type = %blocked, "Trigger type blocked on free tier");
            return Err(EntitlementViolation::TriggerTypeRequiresPro(blocked));
        }

        Ok(())
    }
}
