// Copyright 2025 Cowboy AI, LLC.

//! Payment entitlement snapshot

use crate::entity::EpochMillis;
use serde::{Deserialize, Serialize};

/// What the user has paid for, as reported by the purchase collaborator
///
/// Read-only here: the gate queries it, nothing in this crate mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntitlement {
    /// Whether pro features are unlocked
    pub has_pro_access: bool,
    /// Product or plan identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_type: Option<String>,
    /// When the purchase was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<EpochMillis>,
    /// When the subscription lapses, if it does
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<EpochMillis>,
}

impl PaymentEntitlement {
    /// Free tier
    pub fn free() -> Self {
        Self::default()
    }

    /// Pro access with the given plan
    pub fn pro(subscription_type: impl Into<String>) -> Self {
        Self {
            has_pro_access: true,
            subscription_type: Some(subscription_type.into()),
            ..Self::default()
        }
    }
}
