// Copyright 2025 Cowboy AI, LLC.

//! Error types for reminder operations

use crate::entitlement_gate::EntitlementViolation;
use crate::entity::ReminderId;
use crate::state_machine::ReminderStatus;
use thiserror::Error;

/// Errors that can occur in reminder operations
///
/// A missing piece of ambient state (no location fix, unknown charging
/// state) is deliberately absent from this list: it evaluates as a failed
/// condition and never surfaces as an error.
#[derive(Debug, Clone, Error)]
pub enum ReminderError {
    /// One or more config shape or bound violations
    #[error("Validation failed: {}", messages.join("; "))]
    Validation {
        /// Every violation found, in evaluation order
        messages: Vec<String>,
    },

    /// Creation blocked by free-tier limits
    #[error("Entitlement error: {0}")]
    Entitlement(EntitlementViolation),

    /// A check-and-set on reminder status lost a race
    #[error("Concurrency conflict on reminder {reminder_id}: expected {expected}, found {actual}")]
    ConcurrencyConflict {
        /// Reminder whose status changed underneath the caller
        reminder_id: ReminderId,
        /// Status the caller expected
        expected: ReminderStatus,
        /// Status actually stored
        actual: ReminderStatus,
    },

    /// Invalid status transition
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current status
        from: ReminderStatus,
        /// Attempted target status
        to: ReminderStatus,
    },

    /// Reminder not found
    #[error("Reminder not found: {0}")]
    NotFound(ReminderId),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backing store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Notification scheduling or delivery failure
    #[error("Notification error: {0}")]
    Notification(String),
}

/// Result type for reminder operations
pub type ReminderResult<T> = Result<T, ReminderError>;

impl From<serde_json::Error> for ReminderError {
    fn from(err: serde_json::Error) -> Self {
        ReminderError::Serialization(err.to_string())
    }
}

impl ReminderError {
    /// Build a validation error from collected messages
    pub fn validation(messages: Vec<String>) -> Self {
        ReminderError::Validation { messages }
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ReminderError::Validation { .. })
    }

    /// Check if this is an entitlement error
    pub fn is_entitlement_error(&self) -> bool {
        matches!(self, ReminderError::Entitlement(_))
    }

    /// Check if this is a concurrency error
    pub fn is_concurrency_error(&self) -> bool {
        matches!(self, ReminderError::ConcurrencyConflict { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReminderError::NotFound(_))
    }

    /// Validation messages, empty for every other variant
    pub fn messages(&self) -> &[String] {
        match self {
            ReminderError::Validation { messages } => messages,
            _ => &[],
        }
    }
}
