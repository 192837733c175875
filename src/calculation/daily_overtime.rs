//! Daily overtime detection.
//!
//! Splits a shift's net hours into ordinary hours, up to the standard hours
//! per day, and overtime hours beyond it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::AuditStep;

/// The result of detecting daily overtime for a shift.
///
/// # Example
///
/// ```
/// use cleaning_cost_engine::calculation::detect_daily_overtime;
/// use cleaning_cost_engine::config::DEFAULT_STANDARD_HOURS_PER_DAY;
/// use rust_decimal::Decimal;
///
/// let detection = detect_daily_overtime(Decimal::new(10, 0), DEFAULT_STANDARD_HOURS_PER_DAY, true, 1);
/// assert_eq!(detection.ordinary_hours, Decimal::new(76, 1));
/// assert_eq!(detection.overtime_hours, Decimal::new(24, 1));
/// assert_eq!(detection.audit_step.rule_id, "daily_overtime_detection");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOvertimeDetection {
    /// Hours up to the threshold.
    pub ordinary_hours: Decimal,
    /// Hours beyond the threshold. Zero when the shift is within it.
    pub overtime_hours: Decimal,
    /// The audit step recording this detection.
    pub audit_step: AuditStep,
}

/// Detects whether hours worked exceed the daily threshold.
///
/// When `overtime_applies` is false (penalty rates are off) every hour is
/// ordinary. `ordinary_hours + overtime_hours` always equals `worked_hours`.
pub fn detect_daily_overtime(
    worked_hours: Decimal,
    threshold: Decimal,
    overtime_applies: bool,
    step_number: u32,
) -> DailyOvertimeDetection {
    let (ordinary_hours, overtime_hours) = if overtime_applies {
        (
            worked_hours.min(threshold),
            (worked_hours - threshold).max(Decimal::ZERO),
        )
    } else {
        (worked_hours, Decimal::ZERO)
    };

    let reasoning = if !overtime_applies {
        format!(
            "{} hours worked, penalty rates are off so overtime beyond {} hours is not applied",
            worked_hours.normalize(),
            threshold.normalize()
        )
    } else if overtime_hours > Decimal::ZERO {
        format!(
            "{} hours worked exceeds {} hour threshold by {} hours, triggering overtime",
            worked_hours.normalize(),
            threshold.normalize(),
            overtime_hours.normalize()
        )
    } else if worked_hours == threshold {
        format!(
            "{} hours worked equals {} hour threshold, no overtime triggered",
            worked_hours.normalize(),
            threshold.normalize()
        )
    } else {
        format!(
            "{} hours worked is under {} hour threshold, no overtime triggered",
            worked_hours.normalize(),
            threshold.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "daily_overtime_detection".to_string(),
        rule_name: "Daily Overtime Detection".to_string(),
        input: serde_json::json!({
            "worked_hours": worked_hours.normalize().to_string(),
            "threshold": threshold.normalize().to_string(),
            "overtime_applies": overtime_applies
        }),
        output: serde_json::json!({
            "ordinary_hours": ordinary_hours.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string()
        }),
        reasoning,
    };

    DailyOvertimeDetection {
        ordinary_hours,
        overtime_hours,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_exactly_at_threshold_no_overtime() {
        let result = detect_daily_overtime(dec("7.6"), dec("7.6"), true, 1);

        assert_eq!(result.ordinary_hours, dec("7.6"));
        assert_eq!(result.overtime_hours, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("equals"));
    }

    #[test]
    fn test_over_threshold_splits_hours() {
        let result = detect_daily_overtime(dec("10"), dec("8"), true, 3);

        assert_eq!(result.ordinary_hours, dec("8"));
        assert_eq!(result.overtime_hours, dec("2"));
        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.output["overtime_hours"], "2");
        assert!(result.audit_step.reasoning.contains("triggering overtime"));
    }

    #[test]
    fn test_under_threshold_no_overtime() {
        let result = detect_daily_overtime(dec("4"), dec("7.6"), true, 1);

        assert_eq!(result.ordinary_hours, dec("4"));
        assert_eq!(result.overtime_hours, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("under"));
    }

    #[test]
    fn test_zero_hours() {
        let result = detect_daily_overtime(Decimal::ZERO, dec("7.6"), true, 1);

        assert_eq!(result.ordinary_hours, Decimal::ZERO);
        assert_eq!(result.overtime_hours, Decimal::ZERO);
    }

    #[test]
    fn test_penalties_off_reports_no_overtime() {
        let result = detect_daily_overtime(dec("10"), dec("7.6"), false, 1);

        assert_eq!(result.ordinary_hours, dec("10"));
        assert_eq!(result.overtime_hours, Decimal::ZERO);
        assert_eq!(result.audit_step.input["overtime_applies"], false);
        assert!(result.audit_step.reasoning.contains("not applied"));
        assert!(!result.audit_step.reasoning.contains("triggering overtime"));
    }

    #[test]
    fn test_parts_sum_to_worked_hours() {
        for worked in ["0.5", "7.59", "7.61", "12", "24"] {
            for applies in [true, false] {
                let result = detect_daily_overtime(dec(worked), dec("7.6"), applies, 1);
                assert_eq!(result.ordinary_hours + result.overtime_hours, dec(worked));
            }
        }
    }
}
