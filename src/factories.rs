// Copyright 2025 Cowboy AI, LLC.

//! Constructors and status mutators that preserve reminder invariants
//!
//! These are the only places that mint ids, stamp `created_at`, or change
//! a reminder's status. Status helpers return a new value and leave their
//! input untouched, since callers may be iterating a shared snapshot. They
//! do not re-check the current status; callers only hand them WAITING
//! reminders.

use crate::entity::{now_millis, ConditionId, EpochMillis, ReminderId, TriggerId};
use crate::model::{
    Condition, ConditionConfig, ConditionType, Reminder, SavedPlace, Trigger, TriggerConfig,
    TriggerType,
};
use crate::state_machine::ReminderStatus;

/// Input for [`create_reminder`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    /// Title shown in the notification
    pub title: String,
    /// Optional body text
    pub description: Option<String>,
    /// Disjunctive triggers
    pub triggers: Vec<Trigger>,
    /// Conjunctive conditions
    pub conditions: Vec<Condition>,
    /// Optional expiry instant
    pub expires_at: Option<EpochMillis>,
}

impl NewReminder {
    /// Request with a title and triggers, nothing else
    pub fn new(title: impl Into<String>, triggers: Vec<Trigger>) -> Self {
        Self {
            title: title.into(),
            description: None,
            triggers,
            conditions: Vec::new(),
            expires_at: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the conditions
    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    /// Set the expiry instant
    pub fn expiring_at(mut self, expires_at: EpochMillis) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Build a WAITING reminder stamped with the current time
pub fn create_reminder(request: NewReminder) -> Reminder {
    create_reminder_at(request, now_millis())
}

/// Build a WAITING reminder stamped with `created_at`
pub fn create_reminder_at(request: NewReminder, created_at: EpochMillis) -> Reminder {
    Reminder {
        id: ReminderId::new(),
        title: request.title,
        description: request.description,
        triggers: request.triggers,
        conditions: request.conditions,
        status: ReminderStatus::Waiting,
        created_at,
        fired_at: None,
        expires_at: request.expires_at,
        notification_handle: None,
    }
}

/// Build a trigger with a fresh id
pub fn create_trigger(trigger_type: TriggerType, config: TriggerConfig) -> Trigger {
    Trigger {
        id: TriggerId::new(),
        trigger_type,
        config,
    }
}

/// Build a condition with a fresh id
pub fn create_condition(condition_type: ConditionType, config: ConditionConfig) -> Condition {
    Condition {
        id: ConditionId::new(),
        condition_type,
        config,
    }
}

/// Build a LOCATION_ENTER trigger from a saved place
///
/// Returns the trigger together with the place's advanced usage counters;
/// persisting the place is the caller's business.
pub fn create_location_trigger_from_place(
    place: &SavedPlace,
    at: EpochMillis,
) -> (Trigger, SavedPlace) {
    let trigger = create_trigger(
        TriggerType::LocationEnter,
        TriggerConfig::Location(place.location_config()),
    );
    (trigger, place.record_use(at))
}

/// Copy of `reminder` with status FIRED and `fired_at` stamped
pub fn mark_reminder_as_fired(reminder: &Reminder, fired_at: EpochMillis) -> Reminder {
    Reminder {
        status: ReminderStatus::Fired,
        fired_at: Some(fired_at),
        ..reminder.clone()
    }
}

/// Copy of `reminder` with status EXPIRED
pub fn mark_reminder_as_expired(reminder: &Reminder) -> Reminder {
    Reminder {
        status: ReminderStatus::Expired,
        fired_at: None,
        ..reminder.clone()
    }
}
