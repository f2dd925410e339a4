// Copyright 2025 Cowboy AI, LLC.

//! Reminder lifecycle state machine
//!
//! ```text
//! WAITING --(trigger matched ∧ all conditions hold)--> FIRED
//! WAITING --(now > expiresAt)-----------------------> EXPIRED
//! ```
//!
//! FIRED and EXPIRED are terminal; no transition leaves them.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Trait for types that can be used as states in a state machine
pub trait State: Debug + Clone + PartialEq + Eq + Send + Sync {
    /// Get the name of this state for logging/debugging
    fn name(&self) -> &'static str;

    /// Check if this is a terminal state
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Controlled transitions between states
pub trait StateTransitions: State {
    /// Check if a transition to the target state is valid
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Get all valid target states from this state
    fn valid_transitions(&self) -> Vec<Self>;
}

/// Lifecycle status of a reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReminderStatus {
    /// Pending; eligible for evaluation and expiration
    Waiting,
    /// A trigger matched and every condition held
    Fired,
    /// The expiry instant passed before the reminder fired
    Expired,
}

impl State for ReminderStatus {
    fn name(&self) -> &'static str {
        match self {
            ReminderStatus::Waiting => "WAITING",
            ReminderStatus::Fired => "FIRED",
            ReminderStatus::Expired => "EXPIRED",
        }
    }

    fn is_terminal(&self) -> bool {
        !matches!(self, ReminderStatus::Waiting)
    }
}

impl StateTransitions for ReminderStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (ReminderStatus::Waiting, ReminderStatus::Fired)
                | (ReminderStatus::Waiting, ReminderStatus::Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ReminderStatus::Waiting => vec![ReminderStatus::Fired, ReminderStatus::Expired],
            ReminderStatus::Fired | ReminderStatus::Expired => vec![],
        }
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
