//! Award settings record.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{AwardSettings, MarginConvention, RateTable};
use crate::models::Severity;

use super::number::{RawNumber, Sanitizer};
use super::{Sanitized, normalize_key};

/// A base-rate map key: `1`, `"1"`, `"level_1"` or `"Level 1"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelKey {
    /// A numeric key, as written by YAML.
    Number(u64),
    /// A textual key.
    Text(String),
}

impl LevelKey {
    fn level(&self) -> Option<u8> {
        match self {
            LevelKey::Number(n) => u8::try_from(*n).ok(),
            LevelKey::Text(text) => {
                let digits: String = text.chars().filter(char::is_ascii_digit).collect();
                digits.parse().ok()
            }
        }
    }
}

/// Award settings as persisted or edited, in either field-name style.
///
/// Every field is optional; anything missing takes the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwardSettingsRecord {
    /// Whether penalties apply.
    #[serde(default, alias = "usePenalties", alias = "usePenaltyRates")]
    pub use_penalties: Option<bool>,
    /// Ordinary hours per shift.
    #[serde(default, alias = "standardHoursPerDay")]
    pub standard_hours_per_day: Option<RawNumber>,
    /// Base rates keyed by level.
    #[serde(default, alias = "baseRates")]
    pub base_rates: BTreeMap<LevelKey, RawNumber>,
    /// Multipliers keyed by condition, in any key spelling.
    #[serde(
        default,
        alias = "conditionRates",
        alias = "penaltyRates",
        alias = "penalty_rates"
    )]
    pub condition_rates: BTreeMap<String, RawNumber>,
    /// `"on_price"` or `"markup"`, in any spelling.
    #[serde(default, alias = "marginConvention")]
    pub margin_convention: Option<String>,
    /// Whether overnight shifts are split at midnight.
    #[serde(default, alias = "splitOvernightShifts")]
    pub split_overnight_shifts: Option<bool>,
}

impl AwardSettingsRecord {
    /// Converts to canonical [`AwardSettings`].
    ///
    /// Overrides that are not numbers or are negative are dropped, so the
    /// rate table default applies to them. Condition keys the table does
    /// not know are kept but reported at low severity, since they will
    /// never be looked up.
    ///
    /// ```
    /// use cleaning_cost_engine::config::RateTable;
    /// use cleaning_cost_engine::records::AwardSettingsRecord;
    /// use rust_decimal::Decimal;
    ///
    /// let record: AwardSettingsRecord = serde_json::from_str(r#"{
    ///     "usePenalties": true,
    ///     "baseRates": { "level_1": 25 },
    ///     "conditionRates": { "publicHoliday": "2.75" }
    /// }"#).unwrap();
    ///
    /// let settings = record.into_settings(&RateTable::default()).value;
    /// assert_eq!(settings.base_rates[&1], Decimal::new(25, 0));
    /// assert_eq!(settings.condition_rates["public_holiday"], Decimal::new(275, 2));
    /// ```
    pub fn into_settings(self, table: &RateTable) -> Sanitized<AwardSettings> {
        let mut sanitizer = Sanitizer::new("award settings");
        let defaults = AwardSettings::default();

        let standard_hours_per_day = match self.standard_hours_per_day.as_ref() {
            None => defaults.standard_hours_per_day,
            Some(raw) => match sanitizer.decimal("standard hours per day", raw) {
                Some(hours) if hours > Decimal::ZERO => hours,
                Some(hours) => {
                    sanitizer.report(
                        "invalid_setting",
                        format!(
                            "standard hours per day {} must be positive, using {}",
                            hours, defaults.standard_hours_per_day
                        ),
                        Severity::Medium,
                    );
                    defaults.standard_hours_per_day
                }
                None => defaults.standard_hours_per_day,
            },
        };

        let mut base_rates = BTreeMap::new();
        for (key, raw) in &self.base_rates {
            let Some(level) = key.level() else {
                sanitizer.report(
                    "invalid_setting",
                    format!("base rate key {:?} does not name a level, ignored", key),
                    Severity::Medium,
                );
                continue;
            };
            let field = format!("base rate for level {}", level);
            match sanitizer.decimal(&field, raw) {
                Some(rate) if rate >= Decimal::ZERO => {
                    base_rates.insert(level, rate);
                }
                Some(rate) => sanitizer.report(
                    "negative_value",
                    format!("{} {} is negative, ignored", field, rate),
                    Severity::Medium,
                ),
                None => {}
            }
        }

        let mut condition_rates = BTreeMap::new();
        for (key, raw) in &self.condition_rates {
            let key = normalize_key(key);
            if table.condition(&key).is_none() {
                sanitizer.report(
                    "unknown_condition",
                    format!("condition '{}' is not in the rate table", key),
                    Severity::Low,
                );
            }
            let field = format!("multiplier for '{}'", key);
            match sanitizer.decimal(&field, raw) {
                Some(multiplier) if multiplier >= Decimal::ZERO => {
                    condition_rates.insert(key, multiplier);
                }
                Some(multiplier) => sanitizer.report(
                    "negative_value",
                    format!("{} {} is negative, ignored", field, multiplier),
                    Severity::Medium,
                ),
                None => {}
            }
        }

        let margin_convention = match self.margin_convention.as_deref().map(normalize_key) {
            None => defaults.margin_convention,
            Some(value) => match value.as_str() {
                "on_price" | "margin" | "margin_on_price" => MarginConvention::OnPrice,
                "markup" | "mark_up" | "cost_plus" => MarginConvention::Markup,
                _ => {
                    sanitizer.report(
                        "invalid_setting",
                        format!("margin convention '{}' is not recognised, using on_price", value),
                        Severity::Medium,
                    );
                    MarginConvention::OnPrice
                }
            },
        };

        let settings = AwardSettings {
            use_penalties: self.use_penalties.unwrap_or(defaults.use_penalties),
            standard_hours_per_day,
            base_rates,
            condition_rates,
            margin_convention,
            split_overnight_shifts: self
                .split_overnight_shifts
                .unwrap_or(defaults.split_overnight_shifts),
        };

        Sanitized {
            value: settings,
            warnings: sanitizer.finish(),
        }
    }
}
