//! Time-band classification and splitting shifts at midnight.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Day, DayType, TimeBand};

use super::NetHoursResult;
use super::duration::{MINUTES_PER_DAY, minutes_to_hours};

/// Start of ordinary hours, in minutes since midnight (06:00).
pub const EARLY_MORNING_BEFORE: u32 = 6 * 60;

/// End of ordinary hours, in minutes since midnight (18:00).
pub const AFTERNOON_AFTER: u32 = 18 * 60;

/// Classifies a shift into a time band.
///
/// The first rule that matches wins:
/// 1. crosses midnight: night
/// 2. starts before 06:00: early morning
/// 3. finishes after 18:00: afternoon
/// 4. otherwise ordinary
///
/// A shift whose times did not parse is ordinary.
///
/// ```
/// use cleaning_cost_engine::calculation::{TimeBand, calculate_net_hours, classify_time_band};
///
/// assert_eq!(classify_time_band(&calculate_net_hours("22:00", "06:00", 0)), TimeBand::Night);
/// assert_eq!(classify_time_band(&calculate_net_hours("05:00", "09:00", 0)), TimeBand::EarlyMorning);
/// assert_eq!(classify_time_band(&calculate_net_hours("17:00", "21:00", 0)), TimeBand::Afternoon);
/// assert_eq!(classify_time_band(&calculate_net_hours("09:00", "17:00", 0)), TimeBand::Ordinary);
/// ```
pub fn classify_time_band(duration: &NetHoursResult) -> TimeBand {
    let (Some(start), Some(end)) = (duration.start_minutes, duration.end_minutes) else {
        return TimeBand::Ordinary;
    };

    if duration.crosses_midnight {
        TimeBand::Night
    } else if start < EARLY_MORNING_BEFORE {
        TimeBand::EarlyMorning
    } else if end > AFTERNOON_AFTER {
        TimeBand::Afternoon
    } else {
        TimeBand::Ordinary
    }
}

/// The part of a shift that falls on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSegment {
    /// The day these hours fall on.
    pub day: Day,
    /// Day type used for rate selection.
    pub day_type: DayType,
    /// Net hours in this segment.
    pub hours: Decimal,
}

/// Splits a shift's net hours between the days they fall on.
///
/// A shift that does not cross midnight gives one segment. One that does
/// gives two: hours before midnight on the starting day and hours after
/// midnight on the following day. The public holiday flag belongs to the
/// starting day only. The break is taken from the first segment, with any
/// remainder from the second, so segment hours always sum to the net hours.
///
/// # Example
///
/// ```
/// use cleaning_cost_engine::calculation::{DayType, calculate_net_hours, split_at_midnight};
/// use cleaning_cost_engine::models::Day;
/// use rust_decimal::Decimal;
///
/// let duration = calculate_net_hours("22:00", "06:00", 30);
/// let segments = split_at_midnight(Day::Friday, false, &duration);
///
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].day_type, DayType::Weekday);
/// assert_eq!(segments[0].hours, Decimal::new(15, 1));
/// assert_eq!(segments[1].day, Day::Saturday);
/// assert_eq!(segments[1].day_type, DayType::Saturday);
/// assert_eq!(segments[1].hours, Decimal::new(6, 0));
/// ```
pub fn split_at_midnight(day: Day, public_holiday: bool, duration: &NetHoursResult) -> Vec<ShiftSegment> {
    let first = ShiftSegment {
        day,
        day_type: DayType::for_day(day, public_holiday),
        hours: duration.net_hours,
    };

    let (Some(start), Some(end), true) = (
        duration.start_minutes,
        duration.end_minutes,
        duration.crosses_midnight,
    ) else {
        return vec![first];
    };

    let before_midnight = MINUTES_PER_DAY - start;
    let break_before = duration.deducted_break_minutes.min(before_midnight);
    let break_after = duration.deducted_break_minutes - break_before;
    let after_midnight = end.saturating_sub(break_after);

    let next_day = day.next();
    vec![
        ShiftSegment {
            hours: minutes_to_hours(before_midnight - break_before),
            ..first
        },
        ShiftSegment {
            day: next_day,
            day_type: DayType::for_day(next_day, false),
            hours: minutes_to_hours(after_midnight),
        },
    ]
}
