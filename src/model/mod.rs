// Copyright 2025 Cowboy AI, LLC.

//! Reminder domain model
//!
//! Entities and value objects: reminders, their triggers and conditions,
//! the system events that drive evaluation, the ambient state that gates
//! it, saved places and the payment entitlement.

pub mod ambient;
pub mod condition;
pub mod entitlement;
pub mod event;
pub mod geo;
pub mod place;
pub mod reminder;
pub mod trigger;

pub use ambient::AmbientState;
pub use condition::{
    Condition, ConditionConfig, ConditionConfigKind, ConditionType, DayOfWeekConfig,
    TimeRangeConfig,
};
pub use entitlement::PaymentEntitlement;
pub use event::{SystemEvent, SystemEventPayload, SystemEventType};
pub use geo::{Coordinates, LocationConfig};
pub use place::SavedPlace;
pub use reminder::Reminder;
pub use trigger::{
    AppOpenedConfig, ScheduledTimeConfig, TimeWindowConfig, Trigger, TriggerConfig,
    TriggerConfigKind, TriggerType,
};
