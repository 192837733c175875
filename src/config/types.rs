//! Configuration types for the cost model.
//!
//! [`RateTable`] is the reference data (base rates and named condition
//! rates); [`AwardSettings`] is the user-editable layer consulted before it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Condition key for weekday day work.
pub const ORDINARY: &str = "ordinary";
/// Condition key for weekday shifts starting before 06:00.
pub const EARLY_MORNING: &str = "early_morning";
/// Condition key for weekday shifts finishing after 18:00.
pub const AFTERNOON: &str = "afternoon";
/// Condition key for weekday shifts crossing midnight.
pub const NIGHT: &str = "night";
/// Condition key for Saturday work.
pub const SATURDAY: &str = "saturday";
/// Condition key for Sunday work.
pub const SUNDAY: &str = "sunday";
/// Condition key for public holiday work.
pub const PUBLIC_HOLIDAY: &str = "public_holiday";
/// Condition key for hours beyond the standard hours per day.
pub const OVERTIME: &str = "overtime";
/// Condition key for casual loading.
pub const CASUAL: &str = "casual";
/// Condition key for part-time loading.
pub const PART_TIME: &str = "part_time";
/// Condition key for full-time loading.
pub const FULL_TIME: &str = "full_time";

/// Standard ordinary hours per day (38-hour week over five days).
pub const DEFAULT_STANDARD_HOURS_PER_DAY: Decimal = Decimal::from_parts(76, 0, 0, false, 1);

/// How a condition changes the hourly rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConditionRate {
    /// Multiply the base rate.
    Multiplier(Decimal),
    /// Replace the base rate with a flat hourly amount.
    FlatHourly(Decimal),
}

impl ConditionRate {
    /// A multiplier of one.
    pub const NEUTRAL: ConditionRate = ConditionRate::Multiplier(Decimal::ONE);

    /// The hourly rate this condition yields from a base rate, or `None`
    /// when it is too large for a decimal.
    ///
    /// ```
    /// use cleaning_cost_engine::config::ConditionRate;
    /// use rust_decimal::Decimal;
    ///
    /// let base = Decimal::new(25, 0);
    /// let saturday = ConditionRate::Multiplier(Decimal::new(15, 1));
    /// assert_eq!(saturday.checked_hourly(base), Some(Decimal::new(375, 1)));
    /// assert_eq!(ConditionRate::FlatHourly(Decimal::new(60, 0)).checked_hourly(base), Some(Decimal::new(60, 0)));
    /// assert_eq!(saturday.checked_hourly(Decimal::MAX), None);
    /// ```
    pub fn checked_hourly(self, base_rate: Decimal) -> Option<Decimal> {
        match self {
            ConditionRate::Multiplier(multiplier) => base_rate.checked_mul(multiplier),
            ConditionRate::FlatHourly(rate) => Some(rate),
        }
    }

    fn value(self) -> Decimal {
        match self {
            ConditionRate::Multiplier(v) | ConditionRate::FlatHourly(v) => v,
        }
    }
}

/// A named condition with its rate and a human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateDefinition {
    /// How the condition changes the hourly rate.
    pub rate: ConditionRate,
    /// What the condition covers.
    pub description: String,
}

impl RateDefinition {
    fn multiplier(value: Decimal, description: &str) -> Self {
        Self {
            rate: ConditionRate::Multiplier(value),
            description: description.to_string(),
        }
    }
}

/// Reference rates for an award: base rate per level and condition rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    /// Name of the award or rate schedule.
    pub name: String,
    /// Base hourly rate by employee level.
    pub base_rates: BTreeMap<u8, Decimal>,
    /// Condition rates by key.
    pub conditions: BTreeMap<String, RateDefinition>,
}

impl RateTable {
    /// Returns the definition for a condition key, if the table has one.
    pub fn condition(&self, key: &str) -> Option<&RateDefinition> {
        self.conditions.get(key)
    }

    /// Returns the base rate for a level, if the table has one.
    pub fn base_rate(&self, level: u8) -> Option<Decimal> {
        self.base_rates.get(&level).copied()
    }

    /// Checks that no rate in the table is negative.
    pub fn validate(&self) -> EngineResult<()> {
        for (level, rate) in &self.base_rates {
            if *rate < Decimal::ZERO {
                return Err(EngineError::InvalidSettings {
                    field: format!("base_rates.{}", level),
                    message: format!("rate {} must not be negative", rate),
                });
            }
        }
        for (key, definition) in &self.conditions {
            if definition.rate.value() < Decimal::ZERO {
                return Err(EngineError::InvalidSettings {
                    field: format!("conditions.{}", key),
                    message: format!("rate {} must not be negative", definition.rate.value()),
                });
            }
        }
        Ok(())
    }
}

impl Default for RateTable {
    /// The built-in cleaning services rate schedule.
    fn default() -> Self {
        let base_rates = BTreeMap::from([
            (1, Decimal::new(2493, 2)),
            (2, Decimal::new(2579, 2)),
            (3, Decimal::new(2680, 2)),
            (4, Decimal::new(2764, 2)),
            (5, Decimal::new(2851, 2)),
        ]);

        let conditions = [
            (ORDINARY, 100, "Weekday day work"),
            (EARLY_MORNING, 110, "Weekday shift starting before 06:00"),
            (AFTERNOON, 115, "Weekday shift finishing after 18:00"),
            (NIGHT, 115, "Weekday shift crossing midnight"),
            (SATURDAY, 150, "Saturday work"),
            (SUNDAY, 200, "Sunday work"),
            (PUBLIC_HOLIDAY, 250, "Public holiday work"),
            (OVERTIME, 150, "Hours beyond the standard hours per day"),
            (CASUAL, 125, "Casual loading"),
            (PART_TIME, 100, "Part-time loading"),
            (FULL_TIME, 100, "Full-time loading"),
        ]
        .into_iter()
        .map(|(key, percent, description)| {
            (
                key.to_string(),
                RateDefinition::multiplier(Decimal::new(percent, 2), description),
            )
        })
        .collect();

        Self {
            name: "Cleaning Services".to_string(),
            base_rates,
            conditions,
        }
    }
}

/// Which formula turns the margin percentage into a price.
///
/// Both conventions appear in quoting practice; the engine applies one
/// consistently to every calculation made with the same settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginConvention {
    /// Margin is a share of the price: `price = cost / (1 - margin/100)`.
    #[default]
    OnPrice,
    /// Margin is a markup on cost: `price = cost * (1 + margin/100)`.
    Markup,
}

/// The user-editable cost model.
///
/// Overrides here take precedence over the [`RateTable`]; anything not
/// overridden falls back to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardSettings {
    /// Whether day, time-band and overtime penalties apply at all.
    pub use_penalties: bool,
    /// Ordinary hours per shift before overtime starts.
    pub standard_hours_per_day: Decimal,
    /// Base hourly rate overrides by employee level.
    pub base_rates: BTreeMap<u8, Decimal>,
    /// Multiplier overrides by condition key.
    pub condition_rates: BTreeMap<String, Decimal>,
    /// How the margin percentage is applied.
    pub margin_convention: MarginConvention,
    /// Whether hours after midnight are priced as the following day.
    pub split_overnight_shifts: bool,
}

impl Default for AwardSettings {
    fn default() -> Self {
        Self {
            use_penalties: true,
            standard_hours_per_day: DEFAULT_STANDARD_HOURS_PER_DAY,
            base_rates: BTreeMap::new(),
            condition_rates: BTreeMap::new(),
            margin_convention: MarginConvention::default(),
            split_overnight_shifts: false,
        }
    }
}

impl AwardSettings {
    /// Checks the settings for values that would make a calculation meaningless.
    ///
    /// ```
    /// use cleaning_cost_engine::config::AwardSettings;
    /// use rust_decimal::Decimal;
    ///
    /// let mut settings = AwardSettings::default();
    /// assert!(settings.validate().is_ok());
    ///
    /// settings.standard_hours_per_day = Decimal::ZERO;
    /// assert!(settings.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.standard_hours_per_day <= Decimal::ZERO {
            return Err(EngineError::InvalidSettings {
                field: "standard_hours_per_day".to_string(),
                message: format!(
                    "must be greater than zero, got {}",
                    self.standard_hours_per_day
                ),
            });
        }

        for (level, rate) in &self.base_rates {
            if *rate < Decimal::ZERO {
                return Err(EngineError::InvalidSettings {
                    field: format!("base_rates.{}", level),
                    message: format!("rate {} must not be negative", rate),
                });
            }
        }

        for (key, multiplier) in &self.condition_rates {
            if *multiplier < Decimal::ZERO {
                return Err(EngineError::InvalidSettings {
                    field: format!("condition_rates.{}", key),
                    message: format!("multiplier {} must not be negative", multiplier),
                });
            }
        }

        Ok(())
    }
}
