// Copyright 2025 Cowboy AI, LLC.

//! Event loop around the evaluation engine
//!
//! The runtime is the only place where engine decisions meet the store.
//! Each decision is applied with a check-and-set from WAITING; a decision
//! that loses the race (the reminder fired, expired or was deleted since
//! the snapshot was read) is dropped without error. Other store failures
//! are counted per decision and never discard what the batch already
//! applied.

use crate::config::{ReminderConfig, RuntimeConfig};
use crate::engine::{EvaluationEngine, ReminderTransition};
use crate::entity::ReminderId;
use crate::errors::{ReminderError, ReminderResult};
use crate::infrastructure::charging_edge::ChargingEdgeFilter;
use crate::infrastructure::notifications::{AmbientStateProvider, NotificationDispatcher};
use crate::infrastructure::store::ReminderStore;
use crate::model::SystemEvent;
use crate::state_machine::ReminderStatus;
use futures::stream::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

/// What one or more cycles changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Reminders moved to FIRED
    pub fired: Vec<ReminderId>,
    /// Reminders moved to EXPIRED
    pub expired: Vec<ReminderId>,
    /// Decisions dropped because the stored reminder had already moved on
    pub conflicts: usize,
    /// FIRED reminders whose notification could not be delivered
    pub dispatch_failures: usize,
    /// Decisions the store failed to apply
    pub store_failures: usize,
    /// Events dropped before evaluation
    pub suppressed_events: usize,
}

impl CycleReport {
    /// Whether nothing was applied or dropped
    pub fn is_empty(&self) -> bool {
        self == &CycleReport::default()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: CycleReport) {
        self.fired.extend(other.fired);
        self.expired.extend(other.expired);
        self.conflicts += other.conflicts;
        self.dispatch_failures += other.dispatch_failures;
        self.store_failures += other.store_failures;
        self.suppressed_events += other.suppressed_events;
    }
}

/// Feeds events and periodic sweeps through the engine into the store
pub struct ReminderRuntime {
    engine: EvaluationEngine,
    config: RuntimeConfig,
    store: Arc<dyn ReminderStore>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    ambient: Arc<dyn AmbientStateProvider>,
    charging: Mutex<ChargingEdgeFilter>,
}

impl ReminderRuntime {
    /// Create a runtime
    pub fn new(
        config: &ReminderConfig,
        store: Arc<dyn ReminderStore>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        ambient: Arc<dyn AmbientStateProvider>,
    ) -> Self {
        Self {
            engine: EvaluationEngine::new(),
            config: config.runtime.clone(),
            store,
            dispatcher,
            ambient,
            charging: Mutex::new(ChargingEdgeFilter::new(config.runtime.charging_edge)),
        }
    }

    /// The engine in use
    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    /// Seed the charging filter from the ambient provider
    ///
    /// A repeated charging event that arrives first is then recognised as a
    /// repeat. [`run`](Self::run) calls this before reading any event.
    pub async fn seed_charging_state(&self) {
        let is_charging = self.ambient.current().await.is_charging;
        let mut filter = self.charging.lock().await;
        *filter = ChargingEdgeFilter::seeded(filter.policy(), is_charging);
        debug!(?is_charging, "Seeded charging edge filter");
    }

    /// Evaluate one system event, then sweep expirations
    pub async fn process_event(&self, event: &SystemEvent) -> ReminderResult<CycleReport> {
        if !self.charging.lock().await.admit(event) {
            return Ok(CycleReport {
                suppressed_events: 1,
                ..CycleReport::default()
            });
        }

        let ambient = self.ambient.current().await;
        let waiting = self.store.fetch_waiting().await?;
        debug!(
            event_type = %event.event_type(),
            candidates = waiting.len(),
            "Evaluating system event"
        );

        let transitions = self.engine.run_cycle(Some(event), &ambient, &waiting);
        Ok(self.apply(transitions).await)
    }

    /// Periodic pass: time tick (when enabled) and expiration sweep
    pub async fn sweep(&self) -> ReminderResult<CycleReport> {
        let ambient = self.ambient.current().await;
        let waiting = self.store.fetch_waiting().await?;
        let tick = self
            .config
            .emit_time_ticks
            .then(|| SystemEvent::time_tick(ambient.now_millis()));

        let transitions = self.engine.run_cycle(tick.as_ref(), &ambient, &waiting);
        let report = self.apply(transitions).await;
        if !report.is_empty() {
            info!(
                fired = report.fired.len(),
                expired = report.expired.len(),
                conflicts = report.conflicts,
                "Periodic sweep applied"
            );
        }
        Ok(report)
    }

    /// Apply engine decisions through the store's check-and-set
    ///
    /// FIRED notifications carry the reminder as stored, not the snapshot
    /// the decision was made from.
    pub async fn apply(&self, transitions: Vec<ReminderTransition>) -> CycleReport {
        let mut report = CycleReport::default();

        for transition in transitions {
            let reminder_id = transition.reminder_id;
            let stored = match self
                .store
                .compare_and_set_status(
                    reminder_id,
                    ReminderStatus::Waiting,
                    transition.new_status,
                    transition.reminder.fired_at,
                )
                .await
            {
                Ok(stored) => stored,
                Err(ReminderError::ConcurrencyConflict { actual, .. }) => {
                    debug!(
                        reminder_id = %reminder_id,
                        decided = %transition.new_status,
                        actual = %actual,
                        "Dropping stale decision"
                    );
                    report.conflicts += 1;
                    continue;
                }
                Err(ReminderError::NotFound(_)) => {
                    debug!(reminder_id = %reminder_id, "Dropping decision for deleted reminder");
                    report.conflicts += 1;
                    continue;
                }
                Err(error) => {
                    warn!(reminder_id = %reminder_id, %error, "Could not apply reminder transition");
                    report.store_failures += 1;
                    continue;
                }
            };

            info!(
                reminder_id = %reminder_id,
                status = %transition.new_status,
                "Applied reminder transition"
            );

            match transition.new_status {
                ReminderStatus::Fired => {
                    if let Err(error) = self.dispatcher.dispatch(&stored).await {
                        warn!(reminder_id = %reminder_id, %error, "Notification dispatch failed");
                        report.dispatch_failures += 1;
                    }
                    report.fired.push(reminder_id);
                }
                ReminderStatus::Expired => report.expired.push(reminder_id),
                ReminderStatus::Waiting => {}
            }
        }

        report
    }

    /// Drive the runtime until `events` ends
    ///
    /// The charging filter is seeded first. Events are processed as they
    /// arrive; the sweep interval drives the periodic pass. A failing cycle
    /// is logged and the loop carries on.
    pub async fn run<S>(&self, events: S) -> CycleReport
    where
        S: Stream<Item = SystemEvent> + Send,
    {
        self.seed_charging_state().await;
        let mut events = std::pin::pin!(events);
        let mut interval = tokio::time::interval(self.config.sweep_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut total = CycleReport::default();

        info!(
            sweep_interval_secs = self.config.sweep_interval().as_secs(),
            "Reminder runtime started"
        );

        loop {
            let outcome = tokio::select! {
                next = events.next() => match next {
                    Some(event) => self.process_event(&event).await,
                    None => break,
                },
                _ = interval.tick() => self.sweep().await,
            };

            match outcome {
                Ok(report) => total.merge(report),
                Err(error) => warn!(%error, "Reminder cycle failed"),
            }
        }

        info!(
            fired = total.fired.len(),
            expired = total.expired.len(),
            "Reminder runtime stopped"
        );
        total
    }

    /// Drive the runtime from a channel until every sender is dropped
    pub async fn run_receiver(&self, events: mpsc::Receiver<SystemEvent>) -> CycleReport {
        self.run(ReceiverStream::new(events)).await
    }
}
