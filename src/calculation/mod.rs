//! Calculation logic for the cost engine.
//!
//! This module contains every step of turning a roster into a price: shift
//! duration, day and time-band classification, splitting at midnight,
//! daily overtime detection, rate resolution, line and shift costs, and
//! overhead and margin. [`calculate_quote_cost`] runs them all.
//!
//! Input anomalies never fail a calculation. They are logged (`warn!`, or
//! `debug!` for low severity) and returned as [`CalculationWarning`]s.

mod daily_overtime;
mod day_detection;
mod duration;
mod line_cost;
mod pricing;
mod quote_cost;
mod rate_resolution;
mod shift_cost;

pub use daily_overtime::{DailyOvertimeDetection, detect_daily_overtime};
pub use day_detection::{
    AFTERNOON_AFTER, EARLY_MORNING_BEFORE, ShiftSegment, classify_time_band, split_at_midnight,
};
pub use duration::{
    MINUTES_PER_DAY, NetHoursResult, calculate_net_hours, net_hours, parse_time_minutes,
};
pub use line_cost::{LineCostInput, LineCostResult, calculate_line_cost, round_currency};
pub use pricing::{PricingInput, PricingResult, apply_pricing, validate_pricing};
pub use quote_cost::{JobCostInput, calculate_job_cost, calculate_quote_cost};
pub use rate_resolution::{RateResolver, RateSource, ResolvedCondition};
pub use shift_cost::{ShiftCostResult, calculate_shift_cost};

pub use crate::models::{DayType, TimeBand};

use rust_decimal::Decimal;
use tracing::{Level, debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationWarning, Severity};

/// Log level for a warning: low severity anomalies only reach `debug`.
fn log_level(severity: Severity) -> Level {
    match severity {
        Severity::Low => Level::DEBUG,
        Severity::Medium | Severity::High => Level::WARN,
    }
}

/// Logs a warning and returns it for the result.
pub(crate) fn warning(code: &str, message: String, severity: Severity) -> CalculationWarning {
    if log_level(severity) == Level::WARN {
        warn!(code, severity = ?severity, "{}", message);
    } else {
        debug!(code, severity = ?severity, "{}", message);
    }
    CalculationWarning::new(code, message, severity)
}

/// Multiplies `factors` in order, failing instead of overflowing.
pub(crate) fn checked_product(stage: &str, factors: &[Decimal]) -> EngineResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |product, factor| product.checked_mul(*factor))
        .ok_or_else(|| overflow(stage))
}

/// Sums `values`, failing instead of overflowing.
pub(crate) fn checked_sum<I>(stage: &str, values: I) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(value))
        .ok_or_else(|| overflow(stage))
}

pub(crate) fn overflow(stage: &str) -> EngineError {
    warn!(stage, "Calculation overflowed");
    EngineError::CalculationOverflow {
        stage: stage.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_product_and_sum() {
        let product = checked_product("test", &[Decimal::new(15, 1), Decimal::new(4, 0)]);
        assert_eq!(product.unwrap(), Decimal::new(6, 0));

        let sum = checked_sum("test", [Decimal::ONE, Decimal::new(25, 1)]);
        assert_eq!(sum.unwrap(), Decimal::new(35, 1));
        assert_eq!(checked_sum("test", Vec::new()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_is_an_error_not_a_panic() {
        let product = checked_product("line cost", &[Decimal::MAX, Decimal::new(2, 0)]);
        assert!(matches!(
            product,
            Err(EngineError::CalculationOverflow { stage }) if stage == "line cost"
        ));

        let sum = checked_sum("labor cost", [Decimal::MAX, Decimal::ONE]);
        assert!(matches!(sum, Err(EngineError::CalculationOverflow { .. })));
    }

    #[test]
    fn test_low_severity_logs_at_debug() {
        assert_eq!(log_level(Severity::Low), Level::DEBUG);
        assert_eq!(log_level(Severity::Medium), Level::WARN);
        assert_eq!(log_level(Severity::High), Level::WARN);
    }

    #[test]
    fn test_warning_keeps_code_and_severity() {
        let warning = warning("unknown_condition", "Ignored 'foo'".to_string(), Severity::Low);

        assert_eq!(warning.code, "unknown_condition");
        assert_eq!(warning.severity, Severity::Low);
        assert_eq!(warning.message, "Ignored 'foo'");
    }
}
