//! Day types and time-of-day bands.
//!
//! A shift's condition comes from two things: the kind of day it falls on
//! and, for weekdays, the time-of-day band its hours occupy. Weekend and
//! public holiday rates take precedence over the band.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Day;

/// Represents the type of day for penalty rate selection.
///
/// # Example
///
/// ```
/// use cleaning_cost_engine::models::{Day, DayType};
///
/// assert_eq!(DayType::for_day(Day::Saturday, false), DayType::Saturday);
/// assert_eq!(DayType::for_day(Day::Saturday, true), DayType::PublicHoliday);
/// assert_eq!(DayType::for_day(Day::Wednesday, false), DayType::Weekday);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday; the time band decides the rate.
    Weekday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
    /// A gazetted public holiday, whatever day of the week it is.
    PublicHoliday,
}

impl DayType {
    /// Classifies a day. A public holiday outranks the day of the week.
    pub fn for_day(day: Day, public_holiday: bool) -> Self {
        if public_holiday {
            return DayType::PublicHoliday;
        }
        match day {
            Day::Saturday => DayType::Saturday,
            Day::Sunday => DayType::Sunday,
            _ => DayType::Weekday,
        }
    }

    /// The condition key for this day type, or `None` for weekdays.
    pub fn condition_key(self) -> Option<&'static str> {
        match self {
            DayType::Weekday => None,
            DayType::Saturday => Some("saturday"),
            DayType::Sunday => Some("sunday"),
            DayType::PublicHoliday => Some("public_holiday"),
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Saturday => write!(f, "Saturday"),
            DayType::Sunday => write!(f, "Sunday"),
            DayType::PublicHoliday => write!(f, "Public holiday"),
        }
    }
}

/// Time-of-day band of a shift.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeBand {
    /// Within 06:00 to 18:00.
    Ordinary,
    /// Starts before 06:00.
    EarlyMorning,
    /// Finishes after 18:00.
    Afternoon,
    /// Runs past midnight.
    Night,
}

impl TimeBand {
    /// The condition key for this band.
    pub fn condition_key(self) -> &'static str {
        match self {
            TimeBand::Ordinary => "ordinary",
            TimeBand::EarlyMorning => "early_morning",
            TimeBand::Afternoon => "afternoon",
            TimeBand::Night => "night",
        }
    }
}

impl fmt::Display for TimeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.condition_key())
    }
}
