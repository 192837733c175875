//! Shift duration computation.
//!
//! Turns wall-clock start and end times plus a break into payable hours.
//! A shift whose end time is earlier than its start time is taken to run
//! past midnight; shifts never span more than 24 hours.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;

use crate::models::{CalculationWarning, Severity};

use super::warning;

/// Minutes in a day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Parses a wall-clock time into minutes since midnight.
///
/// Accepts `HH:MM` and `HH:MM:SS` (as returned by database `time` columns).
/// `24:00` is accepted as the end of the day. Returns `None` for anything else.
///
/// # Examples
///
/// ```
/// use cleaning_cost_engine::calculation::parse_time_minutes;
///
/// assert_eq!(parse_time_minutes("09:30"), Some(570));
/// assert_eq!(parse_time_minutes("17:00:00"), Some(1020));
/// assert_eq!(parse_time_minutes("24:00"), Some(1440));
/// assert_eq!(parse_time_minutes("9am"), None);
/// ```
pub fn parse_time_minutes(value: &str) -> Option<u32> {
    let value = value.trim();
    if value == "24:00" || value == "24:00:00" {
        return Some(MINUTES_PER_DAY);
    }

    ["%H:%M", "%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .map(|time| time.hour() * 60 + time.minute())
}

/// The result of computing a shift's duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetHoursResult {
    /// Start time in minutes since midnight, if it parsed.
    pub start_minutes: Option<u32>,
    /// End time in minutes since midnight, if it parsed.
    pub end_minutes: Option<u32>,
    /// Minutes between start and end, after midnight wraparound.
    pub elapsed_minutes: u32,
    /// Break minutes actually deducted (never more than elapsed).
    pub deducted_break_minutes: u32,
    /// Whether the shift runs past midnight.
    pub crosses_midnight: bool,
    /// Elapsed hours before the break.
    pub gross_hours: Decimal,
    /// Payable hours after the break. Never negative.
    pub net_hours: Decimal,
    /// Anomalies found in the input.
    pub warnings: Vec<CalculationWarning>,
}

pub(crate) fn minutes_to_hours(minutes: u32) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// Computes elapsed and net payable hours for a shift.
///
/// - End before start adds a day (the shift crosses midnight).
/// - A negative break is treated as no break.
/// - A break at least as long as the shift gives zero net hours.
/// - An unparseable time gives zero hours and a `malformed_time` warning.
///
/// Never fails; anomalies are returned as warnings and logged.
///
/// # Examples
///
/// ```
/// use cleaning_cost_engine::calculation::calculate_net_hours;
/// use rust_decimal::Decimal;
///
/// let result = calculate_net_hours("22:00", "06:00", 0);
/// assert!(result.crosses_midnight);
/// assert_eq!(result.net_hours, Decimal::new(8, 0));
///
/// let result = calculate_net_hours("09:00", "17:00", 30);
/// assert_eq!(result.net_hours, Decimal::new(75, 1));
/// ```
pub fn calculate_net_hours(start_time: &str, end_time: &str, break_minutes: i64) -> NetHoursResult {
    let mut warnings = Vec::new();
    let start_minutes = parse_time_minutes(start_time);
    let end_minutes = parse_time_minutes(end_time);

    let (Some(start), Some(end)) = (start_minutes, end_minutes) else {
        warnings.push(warning(
            "malformed_time",
            format!(
                "Shift times '{}' to '{}' are not valid HH:MM times, costing 0 hours",
                start_time, end_time
            ),
            Severity::High,
        ));
        return NetHoursResult {
            start_minutes,
            end_minutes,
            elapsed_minutes: 0,
            deducted_break_minutes: 0,
            crosses_midnight: false,
            gross_hours: Decimal::ZERO,
            net_hours: Decimal::ZERO,
            warnings,
        };
    };

    let crosses_midnight = end < start;
    let elapsed_minutes = if crosses_midnight {
        end + MINUTES_PER_DAY - start
    } else {
        end - start
    };

    let break_minutes = if break_minutes < 0 {
        warnings.push(warning(
            "negative_break",
            format!("Break of {} minutes is negative, using 0", break_minutes),
            Severity::Medium,
        ));
        0
    } else {
        u32::try_from(break_minutes).unwrap_or(u32::MAX)
    };

    if break_minutes > 0 && break_minutes >= elapsed_minutes {
        warnings.push(warning(
            "break_exceeds_shift",
            format!(
                "Break of {} minutes covers the whole {} minute shift, costing 0 hours",
                break_minutes, elapsed_minutes
            ),
            Severity::Low,
        ));
    }

    let deducted_break_minutes = break_minutes.min(elapsed_minutes);
    let net_minutes = elapsed_minutes - deducted_break_minutes;

    NetHoursResult {
        start_minutes,
        end_minutes,
        elapsed_minutes,
        deducted_break_minutes,
        crosses_midnight,
        gross_hours: minutes_to_hours(elapsed_minutes),
        net_hours: minutes_to_hours(net_minutes),
        warnings,
    }
}

/// Net payable hours for a shift; see [`calculate_net_hours`].
///
/// ```
/// use cleaning_cost_engine::calculation::net_hours;
/// use rust_decimal::Decimal;
///
/// assert_eq!(net_hours("09:00", "09:00", 0), Decimal::ZERO);
/// assert_eq!(net_hours("09:00", "10:00", 90), Decimal::ZERO);
/// ```
pub fn net_hours(start_time: &str, end_time: &str, break_minutes: i64) -> Decimal {
    calculate_net_hours(start_time, end_time, break_minutes).net_hours
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_day_shift_with_break() {
        let result = calculate_net_hours("09:00", "17:00", 30);

        assert_eq!(result.gross_hours, dec("8"));
        assert_eq!(result.net_hours, dec("7.5"));
        assert_eq!(result.deducted_break_minutes, 30);
        assert!(!result.crosses_midnight);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_overnight_shift_wraps_around_midnight() {
        let result = calculate_net_hours("22:00", "06:00", 0);

        assert!(result.crosses_midnight);
        assert_eq!(result.elapsed_minutes, 480);
        assert_eq!(result.net_hours, dec("8.0"));
    }

    #[test]
    fn test_same_start_and_end_is_zero_hours() {
        let result = calculate_net_hours("09:00", "09:00", 0);

        assert_eq!(result.net_hours, Decimal::ZERO);
        assert!(!result.crosses_midnight);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_break_longer_than_shift_clamps_to_zero() {
        let result = calculate_net_hours("09:00", "10:00", 90);

        assert_eq!(result.net_hours, Decimal::ZERO);
        assert_eq!(result.deducted_break_minutes, 60);
        assert_eq!(result.warnings[0].code, "break_exceeds_shift");
        assert_eq!(result.warnings[0].severity, Severity::Low);
    }

    #[test]
    fn test_break_equal_to_shift_is_zero_hours() {
        assert_eq!(net_hours("09:00", "10:00", 60), Decimal::ZERO);
    }

    #[test]
    fn test_negative_break_is_ignored() {
        let result = calculate_net_hours("09:00", "17:00", -30);

        assert_eq!(result.net_hours, dec("8"));
        assert_eq!(result.warnings[0].code, "negative_break");
    }

    #[test]
    fn test_malformed_time_returns_zero_with_warning() {
        let result = calculate_net_hours("9am", "17:00", 0);

        assert_eq!(result.net_hours, Decimal::ZERO);
        assert_eq!(result.gross_hours, Decimal::ZERO);
        assert_eq!(result.start_minutes, None);
        assert_eq!(result.end_minutes, Some(1020));
        assert_eq!(result.warnings[0].code, "malformed_time");
        assert_eq!(result.warnings[0].severity, Severity::High);
    }

    #[test]
    fn test_non_numeric_parts_do_not_panic() {
        assert_eq!(net_hours("ab:cd", "ef:gh", 0), Decimal::ZERO);
        assert_eq!(net_hours("", "", 0), Decimal::ZERO);
        assert_eq!(net_hours("25:00", "26:00", 0), Decimal::ZERO);
    }

    #[test]
    fn test_database_time_format() {
        assert_eq!(net_hours("06:00:00", "14:30:00", 30), dec("8"));
    }

    #[test]
    fn test_end_of_day_24_00() {
        let result = calculate_net_hours("22:00", "24:00", 0);
        assert_eq!(result.net_hours, dec("2"));
        assert!(!result.crosses_midnight);

        assert_eq!(net_hours("00:00", "24:00", 0), dec("24"));
    }

    #[test]
    fn test_odd_minutes_divide_exactly_where_possible() {
        assert_eq!(net_hours("09:00", "09:45", 0), dec("0.75"));
        assert_eq!(net_hours("09:00", "10:06", 0), dec("1.1"));
    }

    proptest! {
        #[test]
        fn prop_net_hours_never_negative(
            start_h in 0u32..24,
            start_m in 0u32..60,
            end_h in 0u32..24,
            end_m in 0u32..60,
            break_minutes in -600i64..3000,
        ) {
            let start = format!("{:02}:{:02}", start_h, start_m);
            let end = format!("{:02}:{:02}", end_h, end_m);

            let result = calculate_net_hours(&start, &end, break_minutes);
            prop_assert!(result.net_hours >= Decimal::ZERO);
            prop_assert!(result.net_hours <= Decimal::from(24));
            prop_assert!(result.net_hours <= result.gross_hours);
        }

        #[test]
        fn prop_arbitrary_strings_never_panic(start in ".{0,8}", end in ".{0,8}") {
            let hours = net_hours(&start, &end, 0);
            prop_assert!(hours >= Decimal::ZERO);
        }
    }
}
