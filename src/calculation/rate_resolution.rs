//! Rate resolution.
//!
//! Every rate the engine uses is looked up here: first in the user's
//! [`AwardSettings`] overrides, then in the [`RateTable`]. A missing base
//! rate is an error because no price can be produced without one; a
//! missing condition is neutral.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AwardSettings, ConditionRate, ORDINARY, OVERTIME, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::EmploymentType;

use super::{DayType, TimeBand, overflow};

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// A user override in the award settings.
    Settings,
    /// The reference rate table.
    Table,
    /// Neither defines it; a multiplier of one was used.
    Neutral,
}

/// A condition key together with the rate that applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCondition {
    /// The condition key that was applied.
    pub key: &'static str,
    /// The rate for that key.
    pub rate: ConditionRate,
}

/// Looks up rates from award settings, falling back to a rate table.
///
/// # Example
///
/// ```
/// use cleaning_cost_engine::calculation::RateResolver;
/// use cleaning_cost_engine::config::{AwardSettings, RateTable};
/// use rust_decimal::Decimal;
///
/// let table = RateTable::default();
/// let mut settings = AwardSettings::default();
/// settings.base_rates.insert(1, Decimal::new(25, 0));
///
/// let resolver = RateResolver::new(&settings, &table);
/// assert_eq!(resolver.base_rate(1).unwrap(), Decimal::new(25, 0));
/// assert_eq!(resolver.base_rate(2).unwrap(), Decimal::new(2579, 2));
/// assert!(resolver.base_rate(9).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RateResolver<'a> {
    settings: &'a AwardSettings,
    table: &'a RateTable,
}

impl<'a> RateResolver<'a> {
    /// Creates a resolver over the given settings and table.
    pub fn new(settings: &'a AwardSettings, table: &'a RateTable) -> Self {
        Self { settings, table }
    }

    /// The settings this resolver reads.
    pub fn settings(&self) -> &'a AwardSettings {
        self.settings
    }

    /// The rate table this resolver falls back to.
    pub fn table(&self) -> &'a RateTable {
        self.table
    }

    /// Base hourly rate for an employee level.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownLevel`] when neither the settings nor the table
    /// define the level.
    pub fn base_rate(&self, level: u8) -> EngineResult<Decimal> {
        self.base_rate_with_source(level).map(|(rate, _)| rate)
    }

    /// Base hourly rate and where it came from.
    pub fn base_rate_with_source(&self, level: u8) -> EngineResult<(Decimal, RateSource)> {
        if let Some(rate) = self.settings.base_rates.get(&level) {
            return Ok((*rate, RateSource::Settings));
        }
        self.table
            .base_rate(level)
            .map(|rate| (rate, RateSource::Table))
            .ok_or(EngineError::UnknownLevel { level })
    }

    /// Rate for a condition key. Unknown keys are neutral.
    ///
    /// A settings override is always a multiplier, even when the table
    /// defines the condition as a flat hourly rate.
    pub fn condition(&self, key: &str) -> ConditionRate {
        self.condition_with_source(key).0
    }

    /// Rate for a condition key and where it came from.
    pub fn condition_with_source(&self, key: &str) -> (ConditionRate, RateSource) {
        if let Some(multiplier) = self.settings.condition_rates.get(key) {
            return (ConditionRate::Multiplier(*multiplier), RateSource::Settings);
        }
        match self.table.condition(key) {
            Some(definition) => (definition.rate, RateSource::Table),
            None => {
                debug!(condition = key, "Condition not defined, using neutral multiplier");
                (ConditionRate::NEUTRAL, RateSource::Neutral)
            }
        }
    }

    /// Loading multiplier for an employment type.
    ///
    /// ```
    /// use cleaning_cost_engine::calculation::RateResolver;
    /// use cleaning_cost_engine::config::{AwardSettings, RateTable};
    /// use cleaning_cost_engine::models::EmploymentType;
    /// use rust_decimal::Decimal;
    ///
    /// let table = RateTable::default();
    /// let settings = AwardSettings::default();
    /// let resolver = RateResolver::new(&settings, &table);
    ///
    /// assert_eq!(resolver.employment_multiplier(EmploymentType::Casual), Decimal::new(125, 2));
    /// assert_eq!(resolver.employment_multiplier(EmploymentType::FullTime), Decimal::ONE);
    /// ```
    pub fn employment_multiplier(&self, employment_type: EmploymentType) -> Decimal {
        let key = employment_type.condition_key();
        match self.condition(key) {
            ConditionRate::Multiplier(multiplier) => multiplier,
            ConditionRate::FlatHourly(_) => {
                debug!(condition = key, "Employment loading is a flat rate, ignoring it");
                Decimal::ONE
            }
        }
    }

    /// The condition applying to ordinary hours on a day type within a band.
    ///
    /// Weekend and public holiday keys outrank the time band. When penalties
    /// are turned off every hour is ordinary at a multiplier of one.
    pub fn condition_for(&self, day_type: DayType, band: TimeBand) -> ResolvedCondition {
        if !self.settings.use_penalties {
            return ResolvedCondition {
                key: ORDINARY,
                rate: ConditionRate::NEUTRAL,
            };
        }

        let key = day_type
            .condition_key()
            .unwrap_or_else(|| band.condition_key());
        ResolvedCondition {
            key,
            rate: self.condition(key),
        }
    }

    /// The condition applying to overtime hours.
    ///
    /// Overtime is paid at whichever is higher: the overtime rate or the
    /// condition that would otherwise apply. With penalties off there is no
    /// overtime uplift.
    ///
    /// # Errors
    ///
    /// [`EngineError::CalculationOverflow`] when either hourly rate is too
    /// large for a decimal.
    pub fn overtime_condition(
        &self,
        ordinary: ResolvedCondition,
        base_rate: Decimal,
    ) -> EngineResult<ResolvedCondition> {
        if !self.settings.use_penalties {
            return Ok(ordinary);
        }

        let overtime = self.condition(OVERTIME);
        let hourly = |rate: ConditionRate| {
            rate.checked_hourly(base_rate).ok_or_else(|| overflow("overtime rate"))
        };
        if hourly(overtime)? > hourly(ordinary.rate)? {
            Ok(ResolvedCondition {
                key: OVERTIME,
                rate: overtime,
            })
        } else {
            Ok(ordinary)
        }
    }
}
