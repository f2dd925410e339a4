// Copyright 2025 Cowboy AI, LLC.

//! Ambient device state supplied by the caller at evaluation time

use crate::entity::EpochMillis;
use crate::model::geo::Coordinates;
use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike, Utc};

/// Snapshot of device context
///
/// The engine has no native access; everything it knows about "now" comes
/// from here. Unknown charging state or location is `None` and makes the
/// dependent conditions fail.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientState {
    /// Local wall-clock time, with the device's UTC offset
    pub now: DateTime<FixedOffset>,
    /// Current charging state, if known
    pub is_charging: Option<bool>,
    /// Last known location, if any
    pub location: Option<Coordinates>,
}

impl AmbientState {
    /// State at a local time with nothing else known
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self {
            now,
            is_charging: None,
            location: None,
        }
    }

    /// State at an epoch instant, read in UTC
    ///
    /// Instants outside chrono's range saturate to its earliest or latest
    /// representable time.
    pub fn at_millis(millis: EpochMillis) -> Self {
        let now = match Utc.timestamp_millis_opt(millis).single() {
            Some(now) => now,
            None if millis < 0 => DateTime::<Utc>::MIN_UTC,
            None => DateTime::<Utc>::MAX_UTC,
        };
        Self::at(now.fixed_offset())
    }

    /// State at the current instant, read in UTC
    pub fn now_utc() -> Self {
        Self::at(Utc::now().fixed_offset())
    }

    /// Set the charging state
    pub fn with_charging(mut self, is_charging: bool) -> Self {
        self.is_charging = Some(is_charging);
        self
    }

    /// Set the last known location
    pub fn with_location(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    /// Evaluation instant in epoch milliseconds
    pub fn now_millis(&self) -> EpochMillis {
        self.now.timestamp_millis()
    }

    /// Local hour, 0..=23
    pub fn hour(&self) -> u8 {
        // Timelike::hour is always < 24
        self.now.hour() as u8
    }

    /// Local day of week, 0 = Sunday
    pub fn day_of_week(&self) -> u8 {
        self.now.weekday().num_days_from_sunday() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_hour_and_day_use_local_offset() {
        // 2024-06-02 is a Sunday; 23:30 UTC is 01:30 Monday at UTC+2
        let utc = NaiveDate::from_ymd_opt(2024, 6, 2)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap()
            .and_utc();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let state = AmbientState::at(utc.with_timezone(&offset));

        assert_eq!(state.hour(), 1);
        assert_eq!(state.day_of_week(), 1);
        assert_eq!(state.now_millis(), utc.timestamp_millis());
    }

    #[test]
    fn test_at_millis_round_trips_instant() {
        let state = AmbientState::at_millis(1_700_000_000_123);
        assert_eq!(state.now_millis(), 1_700_000_000_123);
        assert_eq!(state.is_charging, None);
        assert_eq!(state.location, None);
    }

    #[test]
    fn test_at_millis_saturates_out_of_range() {
        assert_eq!(
            AmbientState::at_millis(i64::MAX).now_millis(),
            DateTime::<Utc>::MAX_UTC.timestamp_millis()
        );
        assert_eq!(
            AmbientState::at_millis(i64::MIN).now_millis(),
            DateTime::<Utc>::MIN_UTC.timestamp_millis()
        );
    }
}
