// Copyright 2025 Cowboy AI, LLC.

//! The reminder aggregate

use crate::entity::{EpochMillis, NotificationHandle, ReminderId};
use crate::model::condition::Condition;
use crate::model::trigger::{Trigger, TriggerType};
use crate::state_machine::ReminderStatus;
use serde::{Deserialize, Serialize};

/// A reminder that fires when its context is satisfied
///
/// Construct through [`crate::factories::create_reminder`] and change
/// status only through the `mark_reminder_as_*` helpers; those keep
/// `fired_at` set exactly when the status is FIRED.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Reminder identity
    pub id: ReminderId,
    /// Non-empty title
    pub title: String,
    /// Optional body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Disjunctive triggers, at least one
    pub triggers: Vec<Trigger>,
    /// Conjunctive conditions, possibly none
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Lifecycle status
    pub status: ReminderStatus,
    /// Creation instant, immutable
    pub created_at: EpochMillis,
    /// Fire instant, set exactly once
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fired_at: Option<EpochMillis>,
    /// Expiry instant, strictly after `created_at`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<EpochMillis>,
    /// External scheduler correlation id for SCHEDULED_TIME triggers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_handle: Option<NotificationHandle>,
}

impl Reminder {
    /// Whether the reminder is still pending
    pub fn is_waiting(&self) -> bool {
        self.status == ReminderStatus::Waiting
    }

    /// Whether any trigger has the given type
    pub fn has_trigger_type(&self, trigger_type: TriggerType) -> bool {
        self.triggers.iter().any(|t| t.trigger_type == trigger_type)
    }

    /// Whether the expiry instant has passed at `now`
    pub fn is_expired_at(&self, now: EpochMillis) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// Whether `fired_at` agrees with the status
    pub fn fired_at_consistent(&self) -> bool {
        self.fired_at.is_some() == (self.status == ReminderStatus::Fired)
    }
}
