//! Quote record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Quote;

use super::number::{RawNumber, Sanitizer};
use super::{Sanitized, ShiftRecord, SubcontractorRecord};

/// A quote as stored or submitted, in either field-name style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Quote identifier. A new one is generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Shift records.
    #[serde(default)]
    pub shifts: Vec<ShiftRecord>,
    /// Subcontractor records.
    #[serde(default, alias = "subcontractorCosts", alias = "subcontractor_costs")]
    pub subcontractors: Vec<SubcontractorRecord>,
    /// Overhead percentage.
    #[serde(default, alias = "overheadPercentage")]
    pub overhead_percentage: Option<RawNumber>,
    /// Margin percentage.
    #[serde(default, alias = "marginPercentage")]
    pub margin_percentage: Option<RawNumber>,
}

impl QuoteRecord {
    /// Converts to a canonical [`Quote`], collecting warnings from every line.
    ///
    /// Percentages that are not numbers become zero. Negative percentages
    /// are kept as written: they are configuration errors, and pricing
    /// rejects them rather than silently repairing them.
    pub fn into_quote(self) -> Sanitized<Quote> {
        let mut sanitizer = Sanitizer::new("quote");
        let overhead_percentage = self
            .overhead_percentage
            .as_ref()
            .and_then(|raw| sanitizer.decimal("overhead percentage", raw))
            .unwrap_or(Decimal::ZERO);
        let margin_percentage = self
            .margin_percentage
            .as_ref()
            .and_then(|raw| sanitizer.decimal("margin percentage", raw))
            .unwrap_or(Decimal::ZERO);
        let mut warnings = sanitizer.finish();

        let mut quote = Quote::new(overhead_percentage, margin_percentage);
        if let Some(id) = self.id {
            quote.id = id;
        }

        for (position, record) in self.shifts.into_iter().enumerate() {
            let converted = record.into_shift(position);
            warnings.extend(converted.warnings);
            quote.add_shift(converted.value);
        }

        for record in self.subcontractors {
            let converted = record.into_subcontractor();
            warnings.extend(converted.warnings);
            quote.add_subcontractor(converted.value);
        }

        Sanitized {
            value: quote,
            warnings,
        }
    }
}
