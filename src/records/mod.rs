//! Record adapters between stored or submitted data and the canonical models.
//!
//! Records coming out of the database use snake_case field names while form
//! state uses camelCase, and numbers show up both as JSON numbers and as
//! strings. The types here accept every variant, and their `into_*` methods
//! produce the canonical [`crate::models`] and [`crate::config`] types that
//! the calculation functions consume. Values that cannot be used are
//! replaced with safe defaults and reported as warnings.

mod number;
mod quote;
mod settings;
mod shift;

pub use number::RawNumber;
pub use quote::QuoteRecord;
pub use settings::{AwardSettingsRecord, LevelKey};
pub use shift::{AllowanceRecord, ShiftRecord, SubcontractorRecord};

use crate::models::CalculationWarning;

/// A converted value together with the anomalies found while converting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized<T> {
    /// The canonical value.
    pub value: T,
    /// Fields that had to be replaced.
    pub warnings: Vec<CalculationWarning>,
}

/// Lowercase snake_case form of a key written in camelCase, kebab-case or
/// with spaces.
///
/// ```
/// use cleaning_cost_engine::records::normalize_key;
///
/// assert_eq!(normalize_key("publicHoliday"), "public_holiday");
/// assert_eq!(normalize_key("Part-Time"), "part_time");
/// assert_eq!(normalize_key("EARLY_MORNING"), "early_morning");
/// assert_eq!(normalize_key(" early morning "), "early_morning");
/// ```
pub fn normalize_key(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len() + 4);
    let mut previous: Option<char> = None;

    for c in key.trim().chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !normalized.ends_with('_') {
                normalized.push('_');
            }
        } else if c.is_uppercase() {
            if previous.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                normalized.push('_');
            }
            normalized.extend(c.to_lowercase());
        } else {
            normalized.push(c);
        }
        previous = Some(c);
    }

    normalized
}
