// Copyright 2025 Cowboy AI, LLC.

//! Expiration sweep

use crate::engine::ReminderTransition;
use crate::entity::EpochMillis;
use crate::factories::mark_reminder_as_expired;
use crate::model::Reminder;

/// Expire every WAITING reminder whose expiry instant is before `now`
///
/// Independent of event type; reminders that are not WAITING are skipped.
pub fn sweep_expirations(now: EpochMillis, waiting: &[Reminder]) -> Vec<ReminderTransition> {
    waiting
        .iter()
        .filter(|r| r.is_waiting() && r.is_expired_at(now))
        .map(|r| ReminderTransition::new(mark_reminder_as_expired(r), None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::{create_reminder_at, create_trigger, mark_reminder_as_fired, NewReminder};
    use crate::model::{TriggerConfig, TriggerType};
    use crate::state_machine::ReminderStatus;

    fn expiring(created_at: EpochMillis, ttl: EpochMillis) -> Reminder {
        create_reminder_at(
            NewReminder::new(
                "Pick up parcel",
                vec![create_trigger(TriggerType::PhoneUnlock, TriggerConfig::None)],
            )
            .expiring_at(created_at + ttl),
            created_at,
        )
    }

    #[test]
    fn test_sweep_boundary() {
        let reminder = expiring(10_000, 1_000);
        assert!(sweep_expirations(10_999, std::slice::from_ref(&reminder)).is_empty());
        assert!(sweep_expirations(11_000, std::slice::from_ref(&reminder)).is_empty());

        let transitions = sweep_expirations(11_001, std::slice::from_ref(&reminder));
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].reminder_id, reminder.id);
        assert_eq!(transitions[0].new_status, ReminderStatus::Expired);
    }

    #[test]
    fn test_sweep_skips_non_waiting_and_unbounded() {
        let fired = mark_reminder_as_fired(&expiring(0, 10), 5);
        let unbounded = create_reminder_at(
            NewReminder::new(
                "Forever",
                vec![create_trigger(TriggerType::PhoneUnlock, TriggerConfig::None)],
            ),
            0,
        );
        assert!(sweep_expirations(1_000_000, &[fired, unbounded]).is_empty());
    }
}
