// Copyright 2025 Cowboy AI, LLC.

//! JSON documents for stored reminders
//!
//! Loading re-runs [`validate_reminder`] and the status/`firedAt` invariant,
//! since a document may have been written by an older build or edited by
//! hand.

use crate::errors::{ReminderError, ReminderResult};
use crate::model::Reminder;
use crate::validation::validate_reminder;
use serde_json::Value;
use tracing::warn;

/// Serialize a reminder to its stored JSON form
pub fn encode_reminder(reminder: &Reminder) -> ReminderResult<String> {
    Ok(serde_json::to_string(reminder)?)
}

/// Decode and re-check a single stored reminder
pub fn decode_reminder(json: &str) -> ReminderResult<Reminder> {
    let reminder: Reminder = serde_json::from_str(json)?;
    check_loaded(reminder)
}

/// Decode a JSON array of stored reminders, skipping bad entries
///
/// Only a document that is not a JSON array at all is an error. Entries
/// that fail to decode or re-check are logged and left out.
pub fn decode_reminders(json: &str) -> ReminderResult<Vec<Reminder>> {
    let documents: Vec<Value> = serde_json::from_str(json)?;

    Ok(documents
        .into_iter()
        .enumerate()
        .filter_map(|(index, document)| {
            let decoded = serde_json::from_value::<Reminder>(document)
                .map_err(ReminderError::from)
                .and_then(check_loaded);
            match decoded {
                Ok(reminder) => Some(reminder),
                Err(error) => {
                    warn!(index, %error, "Skipping stored reminder that failed to load");
                    None
                }
            }
        })
        .collect())
}

fn check_loaded(reminder: Reminder) -> ReminderResult<Reminder> {
    let mut report = validate_reminder(&reminder);
    if !reminder.fired_at_consistent() {
        report.errors.push(format!(
            "Fired time is inconsistent with status {}",
            reminder.status
        ));
    }
    report.into_result().map(|_| reminder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::{create_reminder_at, create_trigger, mark_reminder_as_fired, NewReminder};
    use crate::model::{TriggerConfig, TriggerType};
    use pretty_assertions::assert_eq;

    fn stored() -> Reminder {
        create_reminder_at(
            NewReminder::new(
                "Water the plants",
                vec![create_trigger(TriggerType::ChargingStarted, TriggerConfig::None)],
            ),
            1_000,
        )
    }

    #[test]
    fn test_round_trip_of_valid_document() {
        let reminder = mark_reminder_as_fired(&stored(), 2_000);
        let json = encode_reminder(&reminder).unwrap();
        assert_eq!(decode_reminder(&json).unwrap(), reminder);
    }

    #[test]
    fn test_rejects_fired_without_timestamp() {
        let mut value = serde_json::to_value(stored()).unwrap();
        value["status"] = Value::from("FIRED");

        let error = decode_reminder(&value.to_string()).unwrap_err();
        assert!(error.is_validation_error());
        assert!(error.messages()[0].contains("FIRED"));
    }

    #[test]
    fn test_rejects_type_config_mismatch() {
        let mut value = serde_json::to_value(stored()).unwrap();
        value["triggers"][0]["type"] = Value::from("TIME_WINDOW");

        let error = decode_reminder(&value.to_string()).unwrap_err();
        assert_eq!(
            error.messages(),
            ["Trigger 1 (TIME_WINDOW) has an invalid configuration".to_string()]
        );
    }

    #[test]
    fn test_unknown_trigger_type_fails_to_decode() {
        let mut value = serde_json::to_value(stored()).unwrap();
        value["triggers"][0]["type"] = Value::from("SHAKE");

        assert!(matches!(
            decode_reminder(&value.to_string()),
            Err(ReminderError::Serialization(_))
        ));
    }

    #[test]
    fn test_bulk_decode_skips_bad_entries() {
        let good = stored();
        let mut blank = serde_json::to_value(stored()).unwrap();
        blank["title"] = Value::from("   ");
        let json = Value::Array(vec![
            serde_json::to_value(&good).unwrap(),
            blank,
            Value::from("not a reminder"),
        ])
        .to_string();

        assert_eq!(decode_reminders(&json).unwrap(), vec![good]);
    }

    #[test]
    fn test_bulk_decode_requires_array() {
        assert!(decode_reminders("{}").is_err());
    }
}
