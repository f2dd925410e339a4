// Copyright 2025 Cowboy AI, LLC.

//! Reminder lifecycle service
//!
//! Creation runs validate → gate → factory, then stores the reminder and
//! schedules its one-shot notification when it has a SCHEDULED_TIME
//! trigger. Edits and deletes cancel that schedule while the reminder is
//! still WAITING.

use crate::config::FreeTierLimits;
use crate::engine::EvaluationEngine;
use crate::entitlement_gate::{EntitlementGate, ReminderUsage};
use crate::entity::{now_millis, EpochMillis, NotificationHandle, ReminderId};
use crate::errors::{ReminderError, ReminderResult};
use crate::factories::{create_reminder_at, NewReminder};
use crate::infrastructure::{EntitlementProvider, NotificationScheduler, ReminderStore};
use crate::model::{PaymentEntitlement, Reminder};
use crate::state_machine::ReminderStatus;
use crate::validation::validate_reminder;
use std::sync::Arc;
use tracing::{info, warn};

/// Build a reminder if it is valid and the user is entitled to it
///
/// Validation errors win over entitlement errors, so a free user sees
/// every problem with the form before being asked to upgrade.
pub fn admit_reminder(
    request: NewReminder,
    entitlement: &PaymentEntitlement,
    usage: &ReminderUsage,
    limits: &FreeTierLimits,
) -> ReminderResult<Reminder> {
    admit_reminder_at(request, entitlement, usage, limits, now_millis())
}

/// [`admit_reminder`] with an explicit creation instant
pub fn admit_reminder_at(
    request: NewReminder,
    entitlement: &PaymentEntitlement,
    usage: &ReminderUsage,
    limits: &FreeTierLimits,
    created_at: EpochMillis,
) -> ReminderResult<Reminder> {
    let reminder = create_reminder_at(request, created_at);
    validate_reminder(&reminder).into_result()?;
    EntitlementGate::new(limits.clone())
        .check(entitlement, usage, &reminder.triggers)
        .map_err(ReminderError::Entitlement)?;
    Ok(reminder)
}

/// Earliest SCHEDULED_TIME instant of a reminder
fn next_scheduled_at(reminder: &Reminder) -> Option<EpochMillis> {
    reminder.triggers.iter().filter_map(|t| t.scheduled_at()).min()
}

/// Create, edit and delete reminders against a store
pub struct ReminderService {
    gate: EntitlementGate,
    engine: EvaluationEngine,
    store: Arc<dyn ReminderStore>,
    scheduler: Arc<dyn NotificationScheduler>,
    entitlements: Arc<dyn EntitlementProvider>,
}

impl ReminderService {
    /// Create a service
    pub fn new(
        limits: FreeTierLimits,
        store: Arc<dyn ReminderStore>,
        scheduler: Arc<dyn NotificationScheduler>,
        entitlements: Arc<dyn EntitlementProvider>,
    ) -> Self {
        Self {
            gate: EntitlementGate::new(limits),
            engine: EvaluationEngine::default(),
            store,
            scheduler,
            entitlements,
        }
    }

    /// Validate, gate, store and schedule a new reminder
    pub async fn create_reminder(&self, request: NewReminder) -> ReminderResult<Reminder> {
        let entitlement = self.entitlements.entitlement().await?;
        let usage = self.store.count_by_status().await?;
        let mut reminder = admit_reminder(request, &entitlement, &usage, self.gate.limits())?;

        reminder.notification_handle = self.schedule(&reminder).await?;
        if let Err(error) = self.store.insert(reminder.clone()).await {
            self.release(reminder.notification_handle.as_ref()).await;
            return Err(error);
        }

        info!(
            reminder_id = %reminder.id,
            triggers = reminder.triggers.len(),
            conditions = reminder.conditions.len(),
            "Reminder created"
        );
        Ok(reminder)
    }

    /// Replace the contents of a WAITING reminder
    ///
    /// Identity, status and creation time are kept. A new schedule is made
    /// from the edited triggers and the old one is cancelled only once the
    /// edit is stored, so a failed edit leaves the reminder as it was.
    pub async fn edit_reminder(
        &self,
        id: ReminderId,
        contents: NewReminder,
    ) -> ReminderResult<Reminder> {
        let current = self.load(id).await?;
        if !current.is_waiting() {
            return Err(ReminderError::ConcurrencyConflict {
                reminder_id: id,
                expected: ReminderStatus::Waiting,
                actual: current.status,
            });
        }

        let mut updated = Reminder {
            title: contents.title,
            description: contents.description,
            triggers: contents.triggers,
            conditions: contents.conditions,
            expires_at: contents.expires_at,
            notification_handle: None,
            ..current.clone()
        };
        validate_reminder(&updated).into_result()?;

        let entitlement = self.entitlements.entitlement().await?;
        self.gate
            .check_trigger_types(&entitlement, &updated.triggers)
            .map_err(ReminderError::Entitlement)?;

        updated.notification_handle = self.schedule(&updated).await?;
        if let Err(error) = self.store.replace_waiting(updated.clone()).await {
            self.release(updated.notification_handle.as_ref()).await;
            return Err(error);
        }

        // The stored reminder points at the new schedule from here on
        if let Some(cancellation) = self.engine.cancellations_for(&current) {
            self.release(Some(&cancellation.handle)).await;
        }

        info!(reminder_id = %id, "Reminder edited");
        Ok(updated)
    }

    /// Delete a reminder, cancelling its schedule if it is still WAITING
    pub async fn delete_reminder(&self, id: ReminderId) -> ReminderResult<Reminder> {
        let current = self.load(id).await?;
        if let Some(cancellation) = self.engine.cancellations_for(&current) {
            self.scheduler.cancel(&cancellation.handle).await?;
        }

        let removed = self.store.delete(id).await?;
        info!(reminder_id = %id, status = %removed.status, "Reminder deleted");
        Ok(removed)
    }

    /// Stored reminders counted by status
    pub async fn usage(&self) -> ReminderResult<ReminderUsage> {
        self.store.count_by_status().await
    }

    async fn load(&self, id: ReminderId) -> ReminderResult<Reminder> {
        self.store.get(id).await?.ok_or(ReminderError::NotFound(id))
    }

    async fn schedule(&self, reminder: &Reminder) -> ReminderResult<Option<NotificationHandle>> {
        match next_scheduled_at(reminder) {
            Some(at) => Ok(Some(self.scheduler.schedule(reminder, at).await?)),
            None => Ok(None),
        }
    }

    /// Best-effort cancel of a schedule no stored reminder points at
    async fn release(&self, handle: Option<&NotificationHandle>) {
        if let Some(handle) = handle {
            if let Err(error) = self.scheduler.cancel(handle).await {
                warn!(handle = %handle, %error, "Could not cancel orphaned schedule");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::create_trigger;
    use crate::infrastructure::notifications::{
        MockEntitlementProvider, MockNotificationScheduler,
    };
    use crate::infrastructure::{FixedEntitlement, InMemoryReminderStore};
    use crate::model::{LocationConfig, ScheduledTimeConfig, TriggerConfig, TriggerType};
    use mockall::predicate::eq;

    fn unlock_request(title: &str) -> NewReminder {
        NewReminder::new(
            title,
            vec![create_trigger(TriggerType::PhoneUnlock, TriggerConfig::None)],
        )
    }

    fn scheduled_request(at: EpochMillis) -> NewReminder {
        NewReminder::new(
            "Dentist",
            vec![create_trigger(
                TriggerType::ScheduledTime,
                TriggerConfig::ScheduledTime(ScheduledTimeConfig { scheduled_at: at }),
            )],
        )
    }

    fn service(
        store: &InMemoryReminderStore,
        scheduler: MockNotificationScheduler,
        entitlement: PaymentEntitlement,
    ) -> ReminderService {
        ReminderService::new(
            FreeTierLimits::default(),
            Arc::new(store.clone()),
            Arc::new(scheduler),
            Arc::new(FixedEntitlement(entitlement)),
        )
    }

    #[test]
    fn test_admit_reports_validation_before_entitlement() {
        let request = NewReminder::new(
            "",
            vec![create_trigger(
                TriggerType::LocationEnter,
                TriggerConfig::Location(LocationConfig::new(95.0, 0.0, 10.0)),
            )],
        );
        let error = admit_reminder_at(
            request,
            &PaymentEntitlement::free(),
            &ReminderUsage::default(),
            &FreeTierLimits::default(),
            1_000,
        )
        .unwrap_err();

        assert_eq!(
            error.messages(),
            [
                "Title is required".to_string(),
                "Trigger 1 (LOCATION_ENTER) has an invalid configuration".to_string(),
            ]
        );
    }

    #[test]
    fn test_admit_stamps_waiting_reminder() {
        let reminder = admit_reminder_at(
            unlock_request("Stretch"),
            &PaymentEntitlement::free(),
            &ReminderUsage::default(),
            &FreeTierLimits::default(),
            7,
        )
        .unwrap();
        assert_eq!(reminder.status, ReminderStatus::Waiting);
        assert_eq!(reminder.created_at, 7);
        assert_eq!(reminder.fired_at, None);
    }

    #[tokio::test]
    async fn test_create_schedules_scheduled_time() {
        let store = InMemoryReminderStore::new();
        let mut scheduler = MockNotificationScheduler::new();
        scheduler
            .expect_schedule()
            .withf(|_, at| *at == 9_000_000_000_000)
            .times(1)
            .returning(|_, _| Ok(NotificationHandle::new("n-1")));

        let created = service(&store, scheduler, PaymentEntitlement::free())
            .create_reminder(scheduled_request(9_000_000_000_000))
            .await
            .unwrap();

        assert_eq!(created.notification_handle, Some(NotificationHandle::new("n-1")));
        assert_eq!(store.get(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_delete_cancels_waiting_schedule() {
        let store = InMemoryReminderStore::new();
        let mut scheduler = MockNotificationScheduler::new();
        scheduler
            .expect_schedule()
            .returning(|_, _| Ok(NotificationHandle::new("n-7")));
        scheduler
            .expect_cancel()
            .with(eq(NotificationHandle::new("n-7")))
            .times(1)
            .returning(|_| Ok(()));
        let service = service(&store, scheduler, PaymentEntitlement::free());

        let created = service
            .create_reminder(scheduled_request(9_000_000_000_000))
            .await
            .unwrap();
        service.delete_reminder(created.id).await.unwrap();

        assert!(store.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_edit_swaps_schedule() {
        let store = InMemoryReminderStore::new();
        let mut scheduler = MockNotificationScheduler::new();
        scheduler
            .expect_schedule()
            .times(2)
            .returning(|_, at| {
                let handle = if at == 9_000_000_000_000 { "old" } else { "new" };
                Ok(NotificationHandle::new(handle))
            });
        scheduler
            .expect_cancel()
            .with(eq(NotificationHandle::new("old")))
            .times(1)
            .returning(|_| Ok(()));
        let service = service(&store, scheduler, PaymentEntitlement::free());

        let created = service
            .create_reminder(scheduled_request(9_000_000_000_000))
            .await
            .unwrap();
        let edited = service
            .edit_reminder(created.id, scheduled_request(9_100_000_000_000))
            .await
            .unwrap();

        assert_eq!(edited.id, created.id);
        assert_eq!(edited.created_at, created.created_at);
        assert_eq!(edited.notification_handle, Some(NotificationHandle::new("new")));
    }

    #[tokio::test]
    async fn test_edit_refuses_blocked_trigger_for_free_user() {
        let store = InMemoryReminderStore::new();
        let service = service(&store, MockNotificationScheduler::new(), PaymentEntitlement::free());
        let created = service.create_reminder(unlock_request("Walk")).await.unwrap();

        let edit = NewReminder::new(
            "Walk",
            vec![create_trigger(
                TriggerType::LocationEnter,
                TriggerConfig::Location(LocationConfig::new(10.0, 10.0, 50.0)),
            )],
        );
        let error = service.edit_reminder(created.id, edit).await.unwrap_err();
        assert!(error.is_entitlement_error());
    }

    #[tokio::test]
    async fn test_entitlement_provider_failure_propagates() {
        let mut entitlements = MockEntitlementProvider::new();
        entitlements
            .expect_entitlement()
            .returning(|| Err(ReminderError::Store("offline".to_string())));
        let service = ReminderService::new(
            FreeTierLimits::default(),
            Arc::new(InMemoryReminderStore::new()),
            Arc::new(MockNotificationScheduler::new()),
            Arc::new(entitlements),
        );

        let error = service
            .create_reminder(unlock_request("Read"))
            .await
            .unwrap_err();
        assert!(matches!(error, ReminderError::Store(_)));
    }

    #[tokio::test]
    async fn test_missing_reminder() {
        let store = InMemoryReminderStore::new();
        let service = service(&store, MockNotificationScheduler::new(), PaymentEntitlement::free());
        assert!(service
            .delete_reminder(ReminderId::new())
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_failed_reschedule_keeps_old_schedule() {
        let store = InMemoryReminderStore::new();
        let mut scheduler = MockNotificationScheduler::new();
        scheduler
            .expect_schedule()
            .withf(|_, at| *at == 9_000_000_000_000)
            .returning(|_, _| Ok(NotificationHandle::new("old")));
        scheduler
            .expect_schedule()
            .withf(|_, at| *at == 9_100_000_000_000)
            .returning(|_, _| Err(ReminderError::Notification("down".to_string())));
        scheduler.expect_cancel().never();
        let service = service(&store, scheduler, PaymentEntitlement::free());

        let created = service
            .create_reminder(scheduled_request(9_000_000_000_000))
            .await
            .unwrap();
        let error = service
            .edit_reminder(created.id, scheduled_request(9_100_000_000_000))
            .await
            .unwrap_err();

        assert!(matches!(error, ReminderError::Notification(_)));
        assert_eq!(store.get(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_failed_store_releases_new_schedule_only() {
        let store = InMemoryReminderStore::new();
        let fired_meanwhile = store.clone();
        let mut scheduler = MockNotificationScheduler::new();
        scheduler
            .expect_schedule()
            .withf(|_, at| *at == 9_000_000_000_000)
            .returning(|_, _| Ok(NotificationHandle::new("old")));
        scheduler
            .expect_schedule()
            .withf(|_, at| *at == 9_100_000_000_000)
            .returning(move |reminder, _| {
                // The reminder fires while the edit is in flight
                futures::executor::block_on(fired_meanwhile.compare_and_set_status(
                    reminder.id,
                    ReminderStatus::Waiting,
                    ReminderStatus::Fired,
                    Some(1),
                ))?;
                Ok(NotificationHandle::new("new"))
            });
        scheduler
            .expect_cancel()
            .with(eq(NotificationHandle::new("new")))
            .times(1)
            .returning(|_| Ok(()));
        let service = service(&store, scheduler, PaymentEntitlement::free());

        let created = service
            .create_reminder(scheduled_request(9_000_000_000_000))
            .await
            .unwrap();
        let error = service
            .edit_reminder(created.id, scheduled_request(9_100_000_000_000))
            .await
            .unwrap_err();

        assert!(error.is_concurrency_error());
        let stored = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Fired);
        assert_eq!(stored.notification_handle, Some(NotificationHandle::new("old")));
    }
}
