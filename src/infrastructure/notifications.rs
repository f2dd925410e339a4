// Copyright 2025 Cowboy AI, LLC.

//! Host collaborators: notification delivery, scheduling and sensor snapshots

use crate::entity::{EpochMillis, NotificationHandle};
use crate::errors::ReminderResult;
use crate::model::{AmbientState, PaymentEntitlement, Reminder};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Delivers a fired reminder to the user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Present the notification for `reminder`
    async fn dispatch(&self, reminder: &Reminder) -> ReminderResult<()>;
}

/// One-shot notifications for SCHEDULED_TIME triggers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Schedule a notification for `reminder` at `at`
    async fn schedule(&self, reminder: &Reminder, at: EpochMillis)
        -> ReminderResult<NotificationHandle>;

    /// Cancel a previously scheduled notification
    async fn cancel(&self, handle: &NotificationHandle) -> ReminderResult<()>;
}

/// Current sensor snapshot
///
/// Missing readings are `None` fields, never errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AmbientStateProvider: Send + Sync {
    /// Clock, charging state and last known location right now
    async fn current(&self) -> AmbientState;
}

/// Current payment entitlement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntitlementProvider: Send + Sync {
    /// The user's entitlement
    async fn entitlement(&self) -> ReminderResult<PaymentEntitlement>;
}

/// Dispatcher that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDispatcher;

#[async_trait]
impl NotificationDispatcher for LoggingDispatcher {
    async fn dispatch(&self, reminder: &Reminder) -> ReminderResult<()> {
        info!(reminder_id = %reminder.id, title = %reminder.title, "Reminder notification");
        Ok(())
    }
}

/// Ambient provider holding a snapshot the host updates
#[derive(Debug, Clone)]
pub struct SharedAmbientState {
    state: Arc<RwLock<AmbientState>>,
}

impl SharedAmbientState {
    /// Provider starting at `initial`
    pub fn new(initial: AmbientState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replace the snapshot
    pub async fn set(&self, state: AmbientState) {
        *self.state.write().await = state;
    }
}

#[async_trait]
impl AmbientStateProvider for SharedAmbientState {
    async fn current(&self) -> AmbientState {
        self.state.read().await.clone()
    }
}

/// Entitlement provider with a fixed answer
#[derive(Debug, Clone, Default)]
pub struct FixedEntitlement(pub PaymentEntitlement);

#[async_trait]
impl EntitlementProvider for FixedEntitlement {
    async fn entitlement(&self) -> ReminderResult<PaymentEntitlement> {
        Ok(self.0.clone())
    }
}
