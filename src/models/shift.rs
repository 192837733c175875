//! Shift model and related types.
//!
//! A [`Shift`] is one scheduled block of cleaning work inside a quote. Times
//! are wall-clock `HH:MM` strings; an end time earlier than the start time
//! means the shift runs past midnight.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmploymentType;

/// Day of the week a shift is rostered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Day {
    /// Returns the day after this one, wrapping Sunday to Monday.
    ///
    /// ```
    /// use cleaning_cost_engine::models::Day;
    ///
    /// assert_eq!(Day::Sunday.next(), Day::Monday);
    /// assert_eq!(Day::Friday.next(), Day::Saturday);
    /// ```
    pub fn next(self) -> Day {
        Weekday::from(self).succ().into()
    }

    /// The lowercase name used as a key in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }
}

impl From<Day> for Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
            Day::Sunday => Weekday::Sun,
        }
    }
}

impl FromStr for Day {
    type Err = chrono::ParseWeekdayError;

    /// Accepts full names and three-letter abbreviations in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<Weekday>().map(Day::from)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an allowance amount accrues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceUnit {
    /// A fixed amount per cleaner per shift.
    PerShift,
    /// An amount per cleaner per net hour worked.
    PerHour,
}

/// An extra payment attached to a shift, such as a travel or equipment allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Name of the allowance.
    pub name: String,
    /// Amount per unit, per cleaner.
    pub amount: Decimal,
    /// What the amount is paid per.
    pub unit: AllowanceUnit,
}

/// A scheduled work block within a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Identifier, unique within a quote.
    pub id: String,
    /// The day the shift starts on.
    pub day: Day,
    /// Whether the starting day is a public holiday.
    #[serde(default)]
    pub public_holiday: bool,
    /// Start time, `HH:MM` 24-hour.
    pub start_time: String,
    /// End time, `HH:MM` 24-hour. Earlier than `start_time` when crossing midnight.
    pub end_time: String,
    /// Unpaid break in minutes.
    #[serde(default)]
    pub break_minutes: u32,
    /// Number of cleaners working the shift.
    pub cleaners: u32,
    /// Employment arrangement of the cleaners.
    pub employment_type: EmploymentType,
    /// Award employee level, normally 1 to 5.
    pub level: u8,
    /// Site or area the shift covers.
    #[serde(default)]
    pub location: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Allowances paid per cleaner.
    #[serde(default)]
    pub allowances: Vec<Allowance>,
    /// Cost estimate recorded from the last calculation.
    #[serde(default)]
    pub estimated_cost: Option<Decimal>,
}

impl Shift {
    /// Creates a shift with one full-time level 1 cleaner and no break.
    ///
    /// ```
    /// use cleaning_cost_engine::models::{Day, EmploymentType, Shift};
    ///
    /// let shift = Shift {
    ///     break_minutes: 30,
    ///     employment_type: EmploymentType::Casual,
    ///     ..Shift::new("shift_001", Day::Saturday, "09:00", "17:00")
    /// };
    /// assert_eq!(shift.cleaners, 1);
    /// assert_eq!(shift.level, 1);
    /// ```
    pub fn new(
        id: impl Into<String>,
        day: Day,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            day,
            public_holiday: false,
            start_time: start_time.into(),
            end_time: end_time.into(),
            break_minutes: 0,
            cleaners: 1,
            employment_type: EmploymentType::FullTime,
            level: 1,
            location: String::new(),
            notes: String::new(),
            allowances: Vec::new(),
            estimated_cost: None,
        }
    }
}
