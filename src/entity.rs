// Copyright 2025 Cowboy AI, LLC.

//! Identity types shared by every reminder entity

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Milliseconds since the Unix epoch
pub type EpochMillis = i64;

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}

/// A typed entity ID using phantom types for type safety
///
/// IDs for reminders, triggers, conditions and saved places share one
/// representation but cannot be mixed up at compile time.
///
/// ```rust
/// use cim_domain_reminder::{ReminderId, TriggerId};
///
/// let reminder_id = ReminderId::new();
/// let trigger_id = TriggerId::new();
/// assert_ne!(reminder_id.as_uuid(), trigger_id.as_uuid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId<T> {
    id: Uuid,
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

// Stored documents carry bare UUID strings.
impl<T> Serialize for EntityId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for EntityId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Uuid::deserialize(deserializer).map(Self::from_uuid)
    }
}

/// Marker for reminder identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReminderMarker;

/// Marker for trigger identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerMarker;

/// Marker for condition identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionMarker;

/// Marker for saved place identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SavedPlaceMarker;

/// Reminder identity
pub type ReminderId = EntityId<ReminderMarker>;
/// Trigger identity
pub type TriggerId = EntityId<TriggerMarker>;
/// Condition identity
pub type ConditionId = EntityId<ConditionMarker>;
/// Saved place identity
pub type SavedPlaceId = EntityId<SavedPlaceMarker>;

/// Correlation id of a one-shot notification scheduled outside the crate
///
/// Present only on reminders with a SCHEDULED_TIME trigger; used to cancel
/// the OS-level schedule when the reminder is edited or deleted first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationHandle(String);

impl NotificationHandle {
    /// Wrap an external scheduler handle
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Get the raw handle
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
