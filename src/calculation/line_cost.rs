//! Line cost: hours times rate times multipliers times headcount.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::EngineResult;
use crate::models::{CalculationWarning, Severity};

use super::{checked_product, warning};

/// Rounds a currency amount to cents, halves away from zero.
///
/// The result always carries two decimal places.
///
/// ```
/// use cleaning_cost_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(76665, 3)), Decimal::new(7667, 2));
/// assert_eq!(round_currency(Decimal::new(-76665, 3)), Decimal::new(-7667, 2));
/// assert_eq!(round_currency(Decimal::new(100, 0)).to_string(), "100.00");
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Inputs to a single line cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCostInput {
    /// Net hours per cleaner.
    pub hours: Decimal,
    /// Hourly rate before multipliers.
    pub base_rate: Decimal,
    /// Day or time-band multiplier.
    pub condition_multiplier: Decimal,
    /// Employment loading.
    pub employment_multiplier: Decimal,
    /// Number of cleaners.
    pub headcount: Decimal,
}

/// A line cost and any inputs that had to be clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCostResult {
    /// The cost, rounded to cents. Never negative.
    pub amount: Decimal,
    /// Negative inputs that were treated as zero.
    pub warnings: Vec<CalculationWarning>,
}

/// Computes `round(hours * base_rate * condition * employment * headcount)`.
///
/// Rounding happens once, on the product, so the result is independent of
/// the order of the factors. Negative inputs are treated as zero.
///
/// # Errors
///
/// [`crate::error::EngineError::CalculationOverflow`] when the product is
/// too large for a decimal.
///
/// # Examples
///
/// ```
/// use cleaning_cost_engine::calculation::{LineCostInput, calculate_line_cost};
/// use rust_decimal::Decimal;
///
/// let result = calculate_line_cost(&LineCostInput {
///     hours: Decimal::ONE,
///     base_rate: Decimal::new(25555, 3),
///     condition_multiplier: Decimal::ONE,
///     employment_multiplier: Decimal::ONE,
///     headcount: Decimal::new(3, 0),
/// })?;
/// assert_eq!(result.amount, Decimal::new(7667, 2));
/// # Ok::<(), cleaning_cost_engine::error::EngineError>(())
/// ```
pub fn calculate_line_cost(input: &LineCostInput) -> EngineResult<LineCostResult> {
    let mut warnings = Vec::new();
    let mut clamp = |name: &str, value: Decimal| {
        if value < Decimal::ZERO {
            warnings.push(warning(
                "negative_input",
                format!("Line cost {} {} is negative, using 0", name, value),
                Severity::Medium,
            ));
            Decimal::ZERO
        } else {
            value
        }
    };

    let hours = clamp("hours", input.hours);
    let base_rate = clamp("base rate", input.base_rate);
    let condition_multiplier = clamp("condition multiplier", input.condition_multiplier);
    let employment_multiplier = clamp("employment multiplier", input.employment_multiplier);
    let headcount = clamp("headcount", input.headcount);

    let amount = round_currency(checked_product(
        "line cost",
        &[hours, base_rate, condition_multiplier, employment_multiplier, headcount],
    )?);

    Ok(LineCostResult { amount, warnings })
}
