//! Loosely-typed numbers as they arrive from forms and storage.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::calculation::warning;
use crate::models::{CalculationWarning, Severity};

/// A number that may arrive as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// A native number. May be NaN or infinite when built in code.
    Number(f64),
    /// A numeric string such as `"25.50"`.
    Text(String),
}

impl RawNumber {
    /// Converts to a decimal, or `None` when the value is not a finite number.
    ///
    /// ```
    /// use cleaning_cost_engine::records::RawNumber;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(RawNumber::Text(" 25.50 ".into()).to_decimal(), Some(Decimal::new(2550, 2)));
    /// assert_eq!(RawNumber::Number(1.5).to_decimal(), Some(Decimal::new(15, 1)));
    /// assert_eq!(RawNumber::Number(f64::NAN).to_decimal(), None);
    /// assert_eq!(RawNumber::Text("abc".into()).to_decimal(), None);
    /// ```
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawNumber::Number(value) if value.is_finite() => {
                // f64 Display is the shortest string that round-trips
                Decimal::from_str(&value.to_string()).ok()
            }
            RawNumber::Number(_) => None,
            RawNumber::Text(text) => Decimal::from_str(text.trim()).ok(),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// Collects warnings while a record is converted.
#[derive(Debug, Default)]
pub(crate) struct Sanitizer {
    context: String,
    warnings: Vec<CalculationWarning>,
}

impl Sanitizer {
    pub(crate) fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, code: &str, message: String, severity: Severity) {
        let message = format!("{}: {}", self.context, message);
        self.warnings.push(warning(code, message, severity));
    }

    /// A decimal that must be a finite number. Reports and returns `None` otherwise.
    pub(crate) fn decimal(&mut self, field: &str, raw: &RawNumber) -> Option<Decimal> {
        let value = raw.to_decimal();
        if value.is_none() {
            self.report(
                "invalid_number",
                format!("{} {:?} is not a number", field, raw),
                Severity::Medium,
            );
        }
        value
    }

    /// A non-negative decimal. Missing values take `default`; values that
    /// are not numbers or are negative become zero.
    pub(crate) fn non_negative(
        &mut self,
        field: &str,
        raw: Option<&RawNumber>,
        default: Decimal,
    ) -> Decimal {
        let Some(raw) = raw else {
            return default;
        };
        let Some(value) = self.decimal(field, raw) else {
            return Decimal::ZERO;
        };
        if value < Decimal::ZERO {
            self.report(
                "negative_value",
                format!("{} {} is negative, using 0", field, value),
                Severity::Medium,
            );
            return Decimal::ZERO;
        }
        value
    }

    /// A non-negative whole number, sanitized like [`Self::non_negative`].
    /// Fractions are truncated; values beyond `u32` take `default`.
    pub(crate) fn count(&mut self, field: &str, raw: Option<&RawNumber>, default: u32) -> u32 {
        let value = self.non_negative(field, raw, Decimal::from(default));
        let whole = value.trunc();
        if whole != value {
            self.report(
                "fractional_value",
                format!("{} {} is not a whole number, using {}", field, value, whole),
                Severity::Low,
            );
        }
        match whole.to_u32() {
            Some(count) => count,
            None => {
                self.report(
                    "out_of_range",
                    format!("{} {} is too large, using {}", field, whole, default),
                    Severity::Medium,
                );
                default
            }
        }
    }

    pub(crate) fn finish(self) -> Vec<CalculationWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_number_deserializes_both_forms() {
        let values: Vec<RawNumber> = serde_json::from_str(r#"[8, "8.5", 0.25]"#).unwrap();
        assert_eq!(values[0].to_decimal(), Some(Decimal::new(8, 0)));
        assert_eq!(values[1].to_decimal(), Some(Decimal::new(85, 1)));
        assert_eq!(values[2].to_decimal(), Some(Decimal::new(25, 2)));
    }

    #[test]
    fn test_float_conversion_keeps_written_digits() {
        assert_eq!(
            RawNumber::Number(25.555).to_decimal(),
            Some(Decimal::new(25555, 3))
        );
    }

    #[test]
    fn test_infinite_is_not_a_number() {
        assert_eq!(RawNumber::Number(f64::INFINITY).to_decimal(), None);
    }

    #[test]
    fn test_sanitizer_replaces_nan_and_reports() {
        let mut sanitizer = Sanitizer::new("shift 1");
        let raw = RawNumber::Number(f64::NAN);

        let value = sanitizer.non_negative("cleaners", Some(&raw), Decimal::ZERO);
        let warnings = sanitizer.finish();

        assert_eq!(value, Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "invalid_number");
        assert!(warnings[0].message.starts_with("shift 1: cleaners"));
    }

    #[test]
    fn test_count_clamps_negative_and_truncates() {
        let mut sanitizer = Sanitizer::new("shift 1");

        assert_eq!(sanitizer.count("cleaners", Some(&RawNumber::Number(-2.0)), 1), 0);
        assert_eq!(sanitizer.count("cleaners", Some(&"3.7".into()), 1), 3);
        assert_eq!(sanitizer.count("cleaners", None, 1), 1);

        let codes: Vec<String> = sanitizer.finish().into_iter().map(|w| w.code).collect();
        assert_eq!(codes, vec!["negative_value", "fractional_value"]);
    }

    #[test]
    fn test_count_rejects_values_beyond_u32() {
        let mut sanitizer = Sanitizer::new("shift 1");
        assert_eq!(
            sanitizer.count("cleaners", Some(&"99999999999".into()), 1),
            1
        );
        assert_eq!(sanitizer.finish()[0].code, "out_of_range");
    }
}
