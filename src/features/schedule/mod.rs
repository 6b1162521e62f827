//! # Feature: Schedule Calculator
//!
//! Computes the next occurrence of a user's daily dose time and how long
//! remains until it. All arithmetic is on naive local time: the service
//! assumes one process-local timezone and dose times carry none.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Added `UpcomingDose::describe` for the status view
//! - 1.0.0: Initial release

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Parses a configured dose time in 24-hour `HH:MM` form.
pub fn parse_medication_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .with_context(|| format!("invalid medication time {value:?} (expected HH:MM)"))
}

/// Next occurrence of `med_time` as seen from `now`: today if the time
/// has not passed yet, otherwise tomorrow. The boundary instant counts
/// as "not yet passed", so it stays today.
pub fn next_occurrence(med_time: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let candidate = now.date().and_time(med_time);
    if now > candidate {
        candidate + Duration::days(1)
    } else {
        candidate
    }
}

/// The next dose as seen from a fixed `now`.
#[derive(Debug, Clone, Copy)]
pub struct UpcomingDose {
    pub at: NaiveDateTime,
    pub remaining: Duration,
}

/// Convenience wrapper pairing [`next_occurrence`] with the remaining
/// duration.
pub fn upcoming_dose(med_time: NaiveTime, now: NaiveDateTime) -> UpcomingDose {
    let at = next_occurrence(med_time, now);
    UpcomingDose { at, remaining: at - now }
}

impl UpcomingDose {
    /// Whole hours remaining, truncated toward zero. Drives the reminder
    /// cadence: one countdown reminder per remaining whole hour.
    pub fn whole_hours(&self) -> i64 {
        self.remaining.num_seconds() / 3600
    }

    /// Human-readable countdown line for the status view.
    pub fn describe(&self) -> String {
        let hours = self.whole_hours();
        let minutes = (self.remaining.num_seconds() % 3600) / 60;
        format!("in {hours} hour(s) and {minutes} minute(s)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_parse_valid_times() {
        assert_eq!(parse_medication_time("08:00").unwrap().hour(), 8);
        assert_eq!(parse_medication_time("23:59").unwrap().minute(), 59);
        assert_eq!(parse_medication_time(" 07:30 ").unwrap().hour(), 7);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_medication_time("25:00").is_err());
        assert!(parse_medication_time("08:61").is_err());
        assert!(parse_medication_time("08:00:00").is_err());
        assert!(parse_medication_time("eight").is_err());
        assert!(parse_medication_time("").is_err());
    }

    #[test]
    fn test_next_occurrence_before_dose_time() {
        let med_time = parse_medication_time("08:00").unwrap();
        let next = next_occurrence(med_time, at(5, 0, 0));
        assert_eq!(next, at(8, 0, 0));
    }

    #[test]
    fn test_next_occurrence_after_dose_time_rolls_over() {
        let med_time = parse_medication_time("08:00").unwrap();
        let next = next_occurrence(med_time, at(8, 0, 1));
        assert_eq!(next.date(), at(0, 0, 0).date() + Duration::days(1));
        assert_eq!(next.time(), med_time);
    }

    #[test]
    fn test_next_occurrence_boundary_stays_today() {
        let med_time = parse_medication_time("08:00").unwrap();
        let next = next_occurrence(med_time, at(8, 0, 0));
        assert_eq!(next, at(8, 0, 0));
    }

    #[test]
    fn test_whole_hours_truncates() {
        let med_time = parse_medication_time("08:00").unwrap();
        // 2h59m59s remaining counts as 2 whole hours
        assert_eq!(upcoming_dose(med_time, at(5, 0, 1)).whole_hours(), 2);
        assert_eq!(upcoming_dose(med_time, at(5, 0, 0)).whole_hours(), 3);
        // 59m59s remaining rounds down to zero
        assert_eq!(upcoming_dose(med_time, at(7, 0, 1)).whole_hours(), 0);
        assert_eq!(upcoming_dose(med_time, at(8, 0, 0)).whole_hours(), 0);
    }

    #[test]
    fn test_rollover_remaining_spans_midnight() {
        let med_time = parse_medication_time("00:10").unwrap();
        let dose = upcoming_dose(med_time, at(21, 0, 0));
        assert_eq!(dose.whole_hours(), 3);
        assert_eq!(dose.at.time(), med_time);
    }

    #[test]
    fn test_describe_matches_dashboard_wording() {
        let med_time = parse_medication_time("08:00").unwrap();
        let dose = upcoming_dose(med_time, at(5, 30, 0));
        assert_eq!(dose.describe(), "in 2 hour(s) and 30 minute(s)");
    }
}
