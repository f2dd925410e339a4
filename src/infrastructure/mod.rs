// Copyright 2025 Cowboy AI, LLC.

//! Infrastructure layer for reminders
//!
//! This module contains the async edges around the pure engine:
//! - Reminder store boundary and an in-memory store
//! - Notification, sensor and entitlement collaborators
//! - Charging edge filtering
//! - The event loop runtime

pub mod charging_edge;
pub mod notifications;
pub mod runtime;
pub mod store;

pub use charging_edge::ChargingEdgeFilter;
pub use notifications::{
    AmbientStateProvider, EntitlementProvider, FixedEntitlement, LoggingDispatcher,
    NotificationDispatcher, NotificationScheduler, SharedAmbientState,
};
pub use runtime::{CycleReport, ReminderRuntime};
pub use store::{InMemoryReminderStore, ReminderStore};
