// Copyright 2025 Cowboy AI, LLC.

//! # CIM Domain Reminder
//!
//! Context-triggered reminders: a reminder fires when a system event
//! satisfies one of its triggers while all of its conditions hold.
//!
//! This crate provides the building blocks:
//! - **Model**: Reminders, triggers, conditions, saved places and events
//! - **Validators**: Total config checks that report every violation
//! - **Factories**: The only constructors and status mutators
//! - **Evaluation Engine**: Pure event → decision matching with fire precedence
//! - **Entitlement Gate**: Free-tier limits applied at creation
//! - **State Machine**: WAITING → FIRED | EXPIRED, nothing else
//! - **Infrastructure**: Store boundary, collaborators and the event loop
//!
//! ## Design Principles
//!
//! 1. **Type Safety**: Phantom-typed ids and sum-typed configs
//! 2. **Purity**: The engine performs no I/O and holds no locks
//! 3. **Fail Closed**: Missing ambient data makes a condition false
//! 4. **Single Writer**: Status changes land through a check-and-set
//! 5. **Controlled State**: Terminal statuses never transition

#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod engine;
pub mod entitlement_gate;
mod entity;
mod errors;
pub mod factories;
pub mod infrastructure;
pub mod model;
pub mod service;
mod state_machine;
pub mod validation;

// Re-export core types
pub use config::{
    ChargingEdgePolicy, FreeTierLimits, ReminderConfig, ReminderCountPolicy,
    RuntimeConfig,
};
pub use engine::{EvaluationEngine, ReminderTransition, ScheduleCancellation};
pub use entitlement_gate::{EntitlementGate, EntitlementViolation, ReminderUsage};
pub use entity::{
    now_millis, ConditionId, ConditionMarker, EntityId, EpochMillis, NotificationHandle,
    ReminderId, ReminderMarker, SavedPlaceId, SavedPlaceMarker, TriggerId, TriggerMarker,
};
pub use errors::{ReminderError, ReminderResult};
pub use factories::NewReminder;
pub use infrastructure::{CycleReport, InMemoryReminderStore, ReminderRuntime, ReminderStore};
pub use model::{
    AmbientState, Condition, ConditionConfig, ConditionType, Coordinates, PaymentEntitlement,
    Reminder, SavedPlace, SystemEvent, SystemEventType, Trigger, TriggerConfig, TriggerType,
};
pub use service::{admit_reminder, ReminderService};
pub use state_machine::{ReminderStatus, State, StateTransitions};
pub use validation::{validate_reminder, ValidationReport};
