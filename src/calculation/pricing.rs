//! Overhead and margin.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::MarginConvention;
use crate::error::{EngineError, EngineResult};

use super::{checked_product, checked_sum, overflow, round_currency};

const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Costs and percentages to price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingInput {
    /// Labor cost.
    pub labor_cost: Decimal,
    /// Subcontractor cost. Overhead is not charged on it.
    pub subcontractor_cost: Decimal,
    /// Overhead as a percentage of labor cost.
    pub overhead_percentage: Decimal,
    /// Margin percentage.
    pub margin_percentage: Decimal,
    /// How the margin percentage is applied.
    pub convention: MarginConvention,
}

/// The priced totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Overhead on labor, rounded to cents.
    pub overhead_cost: Decimal,
    /// Labor plus subcontractors plus overhead.
    pub total_cost_before_margin: Decimal,
    /// Final price minus total cost before margin.
    pub margin_amount: Decimal,
    /// The quoted price, rounded to cents.
    pub final_price: Decimal,
}

/// Checks that overhead and margin percentages can produce a price.
///
/// # Errors
///
/// - [`EngineError::InvalidOverhead`] for a negative overhead.
/// - [`EngineError::InvalidMargin`] for a negative margin, or a margin of
///   100 or more under [`MarginConvention::OnPrice`], where the price would
///   be infinite or negative.
pub fn validate_pricing(
    overhead_percentage: Decimal,
    margin_percentage: Decimal,
    convention: MarginConvention,
) -> EngineResult<()> {
    if overhead_percentage < Decimal::ZERO {
        return Err(EngineError::InvalidOverhead {
            percentage: overhead_percentage,
        });
    }
    let margin_too_high = convention == MarginConvention::OnPrice && margin_percentage >= HUNDRED;
    if margin_percentage < Decimal::ZERO || margin_too_high {
        return Err(EngineError::InvalidMargin {
            percentage: margin_percentage,
        });
    }
    Ok(())
}

/// Applies overhead and margin to labor and subcontractor costs.
///
/// - `overhead = round(labor * overhead% / 100)`
/// - `total = labor + subcontractors + overhead`
/// - on price: `price = round(total / (1 - margin% / 100))`
/// - markup: `price = round(total * (1 + margin% / 100))`
///
/// Negative costs are treated as zero.
///
/// # Errors
///
/// - [`EngineError::InvalidOverhead`] or [`EngineError::InvalidMargin`] as
///   for [`validate_pricing`].
/// - [`EngineError::CalculationOverflow`] when an amount is too large for a
///   decimal, including an on-price margin so close to 100 that the price
///   cannot be represented.
///
/// # Examples
///
/// ```
/// use cleaning_cost_engine::calculation::{PricingInput, apply_pricing};
/// use cleaning_cost_engine::config::MarginConvention;
/// use rust_decimal::Decimal;
///
/// let result = apply_pricing(&PricingInput {
///     labor_cost: Decimal::new(1000, 0),
///     subcontractor_cost: Decimal::ZERO,
///     overhead_percentage: Decimal::ZERO,
///     margin_percentage: Decimal::new(20, 0),
///     convention: MarginConvention::OnPrice,
/// }).unwrap();
///
/// assert_eq!(result.final_price, Decimal::new(1250, 0));
/// assert_eq!(result.margin_amount, Decimal::new(250, 0));
/// ```
pub fn apply_pricing(input: &PricingInput) -> EngineResult<PricingResult> {
    validate_pricing(
        input.overhead_percentage,
        input.margin_percentage,
        input.convention,
    )?;

    let labor_cost = non_negative("labor cost", input.labor_cost);
    let subcontractor_cost = non_negative("subcontractor cost", input.subcontractor_cost);

    let overhead_rate = input.overhead_percentage / HUNDRED;
    let overhead_cost = round_currency(checked_product("overhead", &[labor_cost, overhead_rate])?);
    let total_cost_before_margin = checked_sum(
        "total cost before margin",
        [labor_cost, subcontractor_cost, overhead_cost],
    )?;

    let margin = input.margin_percentage / HUNDRED;
    let price = match input.convention {
        MarginConvention::OnPrice => total_cost_before_margin.checked_div(Decimal::ONE - margin),
        MarginConvention::Markup => (Decimal::ONE + margin)
            .checked_mul(total_cost_before_margin),
    };
    let final_price = round_currency(price.ok_or_else(|| overflow("final price"))?);

    Ok(PricingResult {
        overhead_cost,
        total_cost_before_margin,
        margin_amount: final_price - total_cost_before_margin,
        final_price,
    })
}

fn non_negative(name: &str, value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        warn!(value = %value, "Negative {} priced as 0", name);
        Decimal::ZERO
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn input(labor: &str, sub: &str, overhead: &str, margin: &str) -> PricingInput {
        PricingInput {
            labor_cost: dec(labor),
            subcontractor_cost: dec(sub),
            overhead_percentage: dec(overhead),
            margin_percentage: dec(margin),
            convention: MarginConvention::OnPrice,
        }
    }

    #[test]
    fn test_margin_on_price() {
        let result = apply_pricing(&input("1000", "0", "0", "20")).unwrap();

        assert_eq!(result.final_price, dec("1250.00"));
        assert_eq!(result.margin_amount, dec("250.00"));
        assert_eq!(result.total_cost_before_margin, dec("1000"));
    }

    #[test]
    fn test_markup() {
        let result = apply_pricing(&PricingInput {
            convention: MarginConvention::Markup,
            ..input("1000", "0", "0", "20")
        })
        .unwrap();

        assert_eq!(result.final_price, dec("1200.00"));
        assert_eq!(result.margin_amount, dec("200.00"));
    }

    #[test]
    fn test_overhead_applies_to_labor_only() {
        let result = apply_pricing(&input("1000", "500", "10", "0")).unwrap();

        assert_eq!(result.overhead_cost, dec("100.00"));
        assert_eq!(result.total_cost_before_margin, dec("1600.00"));
        assert_eq!(result.final_price, dec("1600.00"));
        assert_eq!(result.margin_amount, Decimal::ZERO);
    }

    #[test]
    fn test_overhead_is_rounded_to_cents() {
        let result = apply_pricing(&input("333.33", "0", "15", "0")).unwrap();
        // 49.9995 rounds to 50.00
        assert_eq!(result.overhead_cost, dec("50.00"));
    }

    #[test]
    fn test_on_price_margin_of_one_hundred_is_rejected() {
        let result = apply_pricing(&input("1000", "0", "0", "100"));
        assert!(matches!(result, Err(EngineError::InvalidMargin { .. })));

        let result = apply_pricing(&input("1000", "0", "0", "150"));
        assert!(matches!(result, Err(EngineError::InvalidMargin { .. })));
    }

    #[test]
    fn test_margin_just_under_one_hundred_overflows_cleanly() {
        let result = apply_pricing(&input("1000", "0", "0", "99.999999999999999999999999"));
        assert!(matches!(
            result,
            Err(EngineError::CalculationOverflow { stage }) if stage == "final price"
        ));
    }

    #[test]
    fn test_high_margin_within_range_still_prices() {
        // 100 / (1 - 0.999) = 100000
        let result = apply_pricing(&input("100", "0", "0", "99.9")).unwrap();
        assert_eq!(result.final_price, dec("100000.00"));
        assert_eq!(result.margin_amount, dec("99900.00"));
    }

    #[test]
    fn test_oversized_costs_are_an_error() {
        let result = apply_pricing(&PricingInput {
            subcontractor_cost: Decimal::MAX,
            ..input("1000", "0", "0", "0")
        });
        assert!(matches!(
            result,
            Err(EngineError::CalculationOverflow { stage }) if stage == "total cost before margin"
        ));

        let result = apply_pricing(&PricingInput {
            subcontractor_cost: Decimal::MAX,
            convention: MarginConvention::Markup,
            ..input("0", "0", "0", "50")
        });
        assert!(matches!(
            result,
            Err(EngineError::CalculationOverflow { stage }) if stage == "final price"
        ));
    }

    #[test]
    fn test_markup_above_one_hundred_is_allowed() {
        let result = apply_pricing(&PricingInput {
            convention: MarginConvention::Markup,
            ..input("100", "0", "0", "150")
        })
        .unwrap();
        assert_eq!(result.final_price, dec("250.00"));
    }

    #[test]
    fn test_negative_percentages_are_rejected() {
        assert!(matches!(
            apply_pricing(&input("1000", "0", "-1", "0")),
            Err(EngineError::InvalidOverhead { .. })
        ));
        assert!(matches!(
            apply_pricing(&input("1000", "0", "0", "-1")),
            Err(EngineError::InvalidMargin { .. })
        ));
    }

    #[test]
    fn test_zero_cost_prices_at_zero() {
        let result = apply_pricing(&input("0", "0", "15", "20")).unwrap();
        assert_eq!(result.final_price, Decimal::ZERO);
        assert_eq!(result.margin_amount, Decimal::ZERO);
    }

    #[test]
    fn test_negative_costs_are_clamped() {
        let result = apply_pricing(&input("-50", "-10", "10", "0")).unwrap();
        assert_eq!(result.total_cost_before_margin, Decimal::ZERO);
    }
}
