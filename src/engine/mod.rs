// Copyright 2025 Cowboy AI, LLC.

//! Trigger/condition evaluation engine
//!
//! The engine is a pure function of (event or tick, reminder snapshot,
//! ambient snapshot) → transition list. It holds no locks, performs no I/O
//! and keeps no memory between passes: offering the same event twice to
//! the same WAITING snapshot yields the same decision twice. Preventing a
//! double application is the store's check-and-set.
//!
//! Per event:
//! 1. keep WAITING reminders with a trigger type compatible with the event
//!    (see [`compatible_trigger_types`]);
//! 2. test each compatible trigger; any one satisfied trigger suffices;
//! 3. gate on the reminder's conditions, all of which must hold;
//! 4. emit a FIRED transition built with [`mark_reminder_as_fired`].

mod compatibility;
mod conditions;
mod sweeper;
mod triggers;

pub use compatibility::{compatible_trigger_types, is_compatible};
pub use conditions::{condition_holds, conditions_hold};
pub use sweeper::sweep_expirations;
pub use triggers::trigger_satisfied;

use crate::entity::{EpochMillis, NotificationHandle, ReminderId, TriggerId};
use crate::factories::mark_reminder_as_fired;
use crate::model::{AmbientState, Reminder, SystemEvent, TriggerType};
use crate::state_machine::ReminderStatus;
use std::collections::HashSet;
use tracing::debug;

/// A status decision for one reminder
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderTransition {
    /// Reminder the decision applies to
    pub reminder_id: ReminderId,
    /// FIRED or EXPIRED
    pub new_status: ReminderStatus,
    /// The reminder as it should be stored after the transition
    pub reminder: Reminder,
    /// Trigger that fired it, for FIRED decisions
    pub matched_trigger: Option<TriggerId>,
}

impl ReminderTransition {
    pub(crate) fn new(reminder: Reminder, matched_trigger: Option<TriggerId>) -> Self {
        Self {
            reminder_id: reminder.id,
            new_status: reminder.status,
            reminder,
            matched_trigger,
        }
    }
}

/// An external one-shot schedule to cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCancellation {
    /// Reminder owning the schedule
    pub reminder_id: ReminderId,
    /// Handle returned by the scheduler
    pub handle: NotificationHandle,
}

/// Matches system events against WAITING reminders
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationEngine;

impl EvaluationEngine {
    /// Create an engine
    pub fn new() -> Self {
        Self
    }

    /// Decide which reminders `event` fires
    ///
    /// Candidates are processed as an unordered collection; callers must
    /// not rely on the order of the returned transitions.
    pub fn evaluate(
        &self,
        event: &SystemEvent,
        ambient: &AmbientState,
        waiting: &[Reminder],
    ) -> Vec<ReminderTransition> {
        let event_type = event.event_type();
        let compatible = compatible_trigger_types(event_type);
        let fired_at = ambient.now_millis();

        waiting
            .iter()
            .filter(|r| r.is_waiting())
            .filter(|r| r.triggers.iter().any(|t| compatible.contains(&t.trigger_type)))
            .filter_map(|reminder| {
                let matched = reminder
                    .triggers
                    .iter()
                    .filter(|t| compatible.contains(&t.trigger_type))
                    .find(|t| trigger_satisfied(t, event, ambient))?;

                if !conditions_hold(&reminder.conditions, ambient) {
                    debug!(
                        reminder_id = %reminder.id,
                        trigger_id = %matched.id,
                        event_type = %event_type,
                        "Trigger satisfied but conditions did not hold"
                    );
                    return None;
                }

                debug!(
                    reminder_id = %reminder.id,
                    trigger_id = %matched.id,
                    event_type = %event_type,
                    "Reminder fired"
                );
                Some(ReminderTransition::new(
                    mark_reminder_as_fired(reminder, fired_at),
                    Some(matched.id),
                ))
            })
            .collect()
    }

    /// Expire WAITING reminders whose expiry instant is before `now`
    pub fn sweep_expirations(
        &self,
        now: EpochMillis,
        waiting: &[Reminder],
    ) -> Vec<ReminderTransition> {
        sweep_expirations(now, waiting)
    }

    /// Evaluate `event` (if any), then sweep expirations
    ///
    /// Firing wins: a reminder fired by `event` is excluded from the sweep,
    /// so no reminder receives both transitions in one pass.
    pub fn run_cycle(
        &self,
        event: Option<&SystemEvent>,
        ambient: &AmbientState,
        waiting: &[Reminder],
    ) -> Vec<ReminderTransition> {
        let mut transitions = match event {
            Some(event) => self.evaluate(event, ambient, waiting),
            None => Vec::new(),
        };

        let fired: HashSet<ReminderId> = transitions.iter().map(|t| t.reminder_id).collect();
        let remaining: Vec<Reminder> = waiting
            .iter()
            .filter(|r| !fired.contains(&r.id))
            .cloned()
            .collect();

        transitions.extend(self.sweep_expirations(ambient.now_millis(), &remaining));
        transitions
    }

    /// Schedule to cancel when a WAITING reminder is edited or deleted
    ///
    /// Only reminders with a SCHEDULED_TIME trigger and a stored handle
    /// have one; a reminder that already fired or expired has nothing left
    /// to cancel.
    pub fn cancellations_for(&self, reminder: &Reminder) -> Option<ScheduleCancellation> {
        if !reminder.is_waiting() || !reminder.has_trigger_type(TriggerType::ScheduledTime) {
            return None;
        }
        reminder
            .notification_handle
            .clone()
            .map(|handle| ScheduleCancellation {
                reminder_id: reminder.id,
                handle,
            })
    }
}
