use async_trait::async_trait;
use std::sync::Arc;
use test_case::test_case;
use tokio_test::assert_ok;

use cim_domain_reminder::factories::{
    create_reminder_at, create_trigger, mark_reminder_as_expired, mark_reminder_as_fired,
};
use cim_domain_reminder::infrastructure::{FixedEntitlement, NotificationScheduler};
use cim_domain_reminder::model::{LocationConfig, TimeWindowConfig};
use cim_domain_reminder::{
    EntitlementViolation, EpochMillis, FreeTierLimits, InMemoryReminderStore, NewReminder,
    NotificationHandle, PaymentEntitlement, Reminder, ReminderCountPolicy, ReminderError,
    ReminderResult, ReminderService, ReminderStatus, ReminderStore, TriggerConfig, TriggerType,
};

#[derive(Debug)]
struct NoScheduler;

#[async_trait]
impl NotificationScheduler for NoScheduler {
    async fn schedule(
        &self,
        _reminder: &Reminder,
        _at: EpochMillis,
    ) -> ReminderResult<NotificationHandle> {
        Err(ReminderError::Notification("not expected".to_string()))
    }

    async fn cancel(&self, _handle: &NotificationHandle) -> ReminderResult<()> {
        Ok(())
    }
}

fn unlock_request(title: &str) -> NewReminder {
    NewReminder::new(
        title,
        vec![create_trigger(TriggerType::PhoneUnlock, TriggerConfig::None)],
    )
}

fn existing(status: ReminderStatus, count: usize) -> Vec<Reminder> {
    (0..count)
        .map(|i| {
            let waiting = create_reminder_at(unlock_request(&format!("Existing {i}")), 0);
            match status {
                ReminderStatus::Waiting => waiting,
                ReminderStatus::Fired => mark_reminder_as_fired(&waiting, 1),
                ReminderStatus::Expired => mark_reminder_as_expired(&waiting),
            }
        })
        .collect()
}

fn free_service(store: &InMemoryReminderStore, limits: FreeTierLimits) -> ReminderService {
    ReminderService::new(
        limits,
        Arc::new(store.clone()),
        Arc::new(NoScheduler),
        Arc::new(FixedEntitlement(PaymentEntitlement::free())),
    )
}

#[test_case(ReminderStatus::Waiting, ReminderCountPolicy::WaitingAndFired, false; "three waiting")]
#[test_case(ReminderStatus::Fired, ReminderCountPolicy::WaitingAndFired, false; "three fired count by default")]
#[test_case(ReminderStatus::Expired, ReminderCountPolicy::WaitingAndFired, true; "expired reminders free slots")]
#[test_case(ReminderStatus::Fired, ReminderCountPolicy::WaitingOnly, true; "fired ignored when only waiting counts")]
#[test_case(ReminderStatus::Expired, ReminderCountPolicy::All, false; "every status counts")]
#[tokio::test]
async fn fourth_reminder_on_free_tier(
    status: ReminderStatus,
    count_policy: ReminderCountPolicy,
    admitted: bool,
) {
    let store = InMemoryReminderStore::with_reminders(existing(status, 3));
    let service = free_service(
        &store,
        FreeTierLimits {
            count_policy,
            ..FreeTierLimits::default()
        },
    );

    let outcome = service.create_reminder(unlock_request("Fourth")).await;
    if admitted {
        assert_ok!(outcome);
        assert_eq!(service.usage().await.unwrap().total(), 4);
    } else {
        match outcome {
            Err(ReminderError::Entitlement(EntitlementViolation::ReminderLimitReached {
                limit,
                current,
            })) => {
                assert_eq!(limit, 3);
                assert_eq!(current, 3);
            }
            other => panic!("expected limit error, got {other:?}"),
        }
        assert_eq!(service.usage().await.unwrap().total(), 3);
    }
}

#[tokio::test]
async fn pro_user_creates_location_reminder() {
    let store = InMemoryReminderStore::with_reminders(existing(ReminderStatus::Waiting, 10));
    let service = ReminderService::new(
        FreeTierLimits::default(),
        Arc::new(store.clone()),
        Arc::new(NoScheduler),
        Arc::new(FixedEntitlement(PaymentEntitlement::pro("monthly"))),
    );

    let request = NewReminder::new(
        "Pick up dry cleaning",
        vec![create_trigger(
            TriggerType::LocationEnter,
            TriggerConfig::Location(LocationConfig::new(40.7128, -74.0060, 200.0)),
        )],
    );
    let created = assert_ok!(service.create_reminder(request).await);
    assert_eq!(created.status, ReminderStatus::Waiting);
    assert_eq!(store.get(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn every_validation_message_is_reported() {
    let store = InMemoryReminderStore::new();
    let service = free_service(&store, FreeTierLimits::default());

    let request = NewReminder::new(
        "  ",
        vec![create_trigger(
            TriggerType::TimeWindow,
            TriggerConfig::TimeWindow(TimeWindowConfig::new(9, 24)),
        )],
    )
    .expiring_at(-1);

    let error = service.create_reminder(request).await.unwrap_err();
    assert!(error.is_validation_error());
    assert_eq!(
        error.messages(),
        [
            "Title is required".to_string(),
            "Trigger 1 (TIME_WINDOW) has an invalid configuration".to_string(),
            "Expiration must be after the creation time".to_string(),
        ]
    );
    assert!(store.fetch_waiting().await.unwrap().is_empty());
}

#[tokio::test]
async fn fired_reminders_cannot_be_edited() {
    let fired = mark_reminder_as_fired(&create_reminder_at(unlock_request("Done"), 0), 5);
    let store = InMemoryReminderStore::with_reminders([fired.clone()]);
    let service = free_service(&store, FreeTierLimits::default());

    let error = service
        .edit_reminder(fired.id, unlock_request("Done again"))
        .await
        .unwrap_err();
    assert!(error.is_concurrency_error());
    assert_eq!(store.get(fired.id).await.unwrap(), Some(fired));
}

#[tokio::test]
async fn deleting_a_fired_reminder_skips_cancellation() {
    let fired = mark_reminder_as_fired(&create_reminder_at(unlock_request("Done"), 0), 5);
    let store = InMemoryReminderStore::with_reminders([fired.clone()]);
    let service = free_service(&store, FreeTierLimits::default());

    let removed = assert_ok!(service.delete_reminder(fired.id).await);
    assert_eq!(removed.status, ReminderStatus::Fired);
    assert_eq!(service.usage().await.unwrap().total(), 0);
}
