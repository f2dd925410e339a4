// Copyright 2025 Cowboy AI, LLC.

//! Reminder persistence boundary
//!
//! The engine and the sweeper compute decisions from snapshots and may race
//! on the same reminder. Stores resolve that with a check-and-set on the
//! status field: a write only lands if the stored status is still the one
//! the caller read. A status write touches `status` and `fired_at` only, so
//! an edit stored after the snapshot was taken survives it.

use crate::entitlement_gate::ReminderUsage;
use crate::entity::{EpochMillis, ReminderId};
use crate::errors::{ReminderError, ReminderResult};
use crate::model::{Reminder, TriggerType};
use crate::state_machine::{ReminderStatus, StateTransitions};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Store for reminder aggregates
#[async_trait]
pub trait ReminderStore: Send + Sync + fmt::Debug {
    /// Persist a new reminder
    async fn insert(&self, reminder: Reminder) -> ReminderResult<()>;

    /// Load a reminder by id
    async fn get(&self, id: ReminderId) -> ReminderResult<Option<Reminder>>;

    /// Every WAITING reminder
    async fn fetch_waiting(&self) -> ReminderResult<Vec<Reminder>>;

    /// WAITING reminders with at least one trigger of the given types
    async fn fetch_waiting_by_trigger_types(
        &self,
        trigger_types: &[TriggerType],
    ) -> ReminderResult<Vec<Reminder>>;

    /// Stored reminders counted by status
    async fn count_by_status(&self) -> ReminderResult<ReminderUsage>;

    /// Move a reminder to `new_status` only if its stored status is still
    /// `expected`, returning the reminder as now stored
    ///
    /// Only `status` and `fired_at` are written. Fails with
    /// [`ReminderError::ConcurrencyConflict`] when another writer got there
    /// first, and with [`ReminderError::InvalidStateTransition`] when
    /// `expected` cannot move to `new_status`.
    async fn compare_and_set_status(
        &self,
        id: ReminderId,
        expected: ReminderStatus,
        new_status: ReminderStatus,
        fired_at: Option<EpochMillis>,
    ) -> ReminderResult<Reminder>;

    /// Replace the contents of a reminder that is still WAITING
    async fn replace_waiting(&self, updated: Reminder) -> ReminderResult<()>;

    /// Remove a reminder, returning what was stored
    async fn delete(&self, id: ReminderId) -> ReminderResult<Reminder>;
}

/// In-memory store for tests and single-process hosts
#[derive(Debug, Clone, Default)]
pub struct InMemoryReminderStore {
    reminders: Arc<RwLock<HashMap<ReminderId, Reminder>>>,
}

impl InMemoryReminderStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with `reminders`
    pub fn with_reminders(reminders: impl IntoIterator<Item = Reminder>) -> Self {
        let map = reminders.into_iter().map(|r| (r.id, r)).collect();
        Self {
            reminders: Arc::new(RwLock::new(map)),
        }
    }

    /// Snapshot of everything stored
    pub async fn all(&self) -> Vec<Reminder> {
        self.reminders.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn insert(&self, reminder: Reminder) -> ReminderResult<()> {
        let mut reminders = self.reminders.write().await;
        if reminders.contains_key(&reminder.id) {
            return Err(ReminderError::Store(format!(
                "reminder {} already exists",
                reminder.id
            )));
        }
        reminders.insert(reminder.id, reminder);
        Ok(())
    }

    async fn get(&self, id: ReminderId) -> ReminderResult<Option<Reminder>> {
        Ok(self.reminders.read().await.get(&id).cloned())
    }

    async fn fetch_waiting(&self) -> ReminderResult<Vec<Reminder>> {
        Ok(self
            .reminders
            .read()
            .await
            .values()
            .filter(|r| r.is_waiting())
            .cloned()
            .collect())
    }

    async fn fetch_waiting_by_trigger_types(
        &self,
        trigger_types: &[TriggerType],
    ) -> ReminderResult<Vec<Reminder>> {
        Ok(self
            .reminders
            .read()
            .await
            .values()
            .filter(|r| r.is_waiting())
            .filter(|r| trigger_types.iter().any(|t| r.has_trigger_type(*t)))
            .cloned()
            .collect())
    }

    async fn count_by_status(&self) -> ReminderResult<ReminderUsage> {
        Ok(ReminderUsage::from_reminders(
            self.reminders.read().await.values(),
        ))
    }

    async fn compare_and_set_status(
        &self,
        id: ReminderId,
        expected: ReminderStatus,
        new_status: ReminderStatus,
        fired_at: Option<EpochMillis>,
    ) -> ReminderResult<Reminder> {
        if !expected.can_transition_to(&new_status) {
            return Err(ReminderError::InvalidStateTransition {
                from: expected,
                to: new_status,
            });
        }

        let mut reminders = self.reminders.write().await;
        let stored = reminders.get_mut(&id).ok_or(ReminderError::NotFound(id))?;

        if stored.status != expected {
            return Err(ReminderError::ConcurrencyConflict {
                reminder_id: id,
                expected,
                actual: stored.status,
            });
        }

        stored.status = new_status;
        stored.fired_at = fired_at;
        Ok(stored.clone())
    }

    async fn replace_waiting(&self, updated: Reminder) -> ReminderResult<()> {
        let mut reminders = self.reminders.write().await;
        let stored = reminders
            .get_mut(&updated.id)
            .ok_or(ReminderError::NotFound(updated.id))?;

        if !stored.is_waiting() {
            return Err(ReminderError::ConcurrencyConflict {
                reminder_id: updated.id,
                expected: ReminderStatus::Waiting,
                actual: stored.status,
            });
        }

        *stored = updated;
        Ok(())
    }

    async fn delete(&self, id: ReminderId) -> ReminderResult<Reminder> {
        self.reminders
            .write()
            .await
            .remove(&id)
            .ok_or(ReminderError::NotFound(id))
    }
}
