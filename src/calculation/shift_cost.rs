//! Shift costing.
//!
//! Brings duration, day and band classification, overtime detection and
//! rate resolution together to price one shift for all of its cleaners.

use rust_decimal::Decimal;
use tracing::debug_span;

use crate::config::ConditionRate;
use crate::error::EngineResult;
use crate::models::{
    AllowanceUnit, AuditStep, CalculationWarning, ComponentKind, CostComponent, Severity, Shift,
    ShiftCost,
};

use super::{
    DayType, LineCostInput, RateResolver, ShiftSegment, calculate_line_cost, calculate_net_hours,
    checked_product, checked_sum, classify_time_band, detect_daily_overtime, round_currency,
    split_at_midnight, warning,
};

/// The result of costing one shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftCostResult {
    /// The costed shift.
    pub cost: ShiftCost,
    /// Anomalies found while costing it.
    pub warnings: Vec<CalculationWarning>,
    /// Audit steps, numbered from the step number passed in.
    pub audit_steps: Vec<AuditStep>,
}

/// Costs a shift.
///
/// The steps are:
/// 1. Resolve the base rate for the shift's level and the employment loading.
/// 2. Compute net hours and the time band.
/// 3. Split at midnight when `split_overnight_shifts` is on.
/// 4. Split net hours into ordinary and overtime against the standard hours
///    per day. Ordinary hours are used up in time order.
/// 5. Price each segment and kind with [`calculate_line_cost`].
/// 6. Add allowances.
///
/// # Errors
///
/// - [`crate::error::EngineError::UnknownLevel`] when no base rate exists for
///   the shift's level.
/// - [`crate::error::EngineError::CalculationOverflow`] when a rate or
///   allowance is too large to price.
///
/// Everything else degrades to warnings.
///
/// # Example
///
/// ```
/// use cleaning_cost_engine::calculation::{RateResolver, calculate_shift_cost};
/// use cleaning_cost_engine::config::{AwardSettings, RateTable};
/// use cleaning_cost_engine::models::{Day, EmploymentType, Shift};
/// use rust_decimal::Decimal;
///
/// let table = RateTable::default();
/// let mut settings = AwardSettings::default();
/// settings.base_rates.insert(1, Decimal::new(25, 0));
/// settings.condition_rates.insert("saturday".into(), Decimal::new(15, 1));
/// let resolver = RateResolver::new(&settings, &table);
///
/// let mut shift = Shift::new("sat", Day::Saturday, "09:00", "17:00");
/// shift.break_minutes = 30;
/// shift.employment_type = EmploymentType::Casual;
///
/// let result = calculate_shift_cost(&shift, &resolver, 1).unwrap();
/// assert_eq!(result.cost.total_cost, Decimal::new(35156, 2));
/// ```
pub fn calculate_shift_cost(
    shift: &Shift,
    resolver: &RateResolver<'_>,
    step_number: u32,
) -> EngineResult<ShiftCostResult> {
    let _span = debug_span!("shift_cost", shift_id = %shift.id).entered();
    let settings = resolver.settings();

    let (base_rate, base_rate_source) = resolver.base_rate_with_source(shift.level)?;
    let employment_multiplier = resolver.employment_multiplier(shift.employment_type);

    let duration = calculate_net_hours(
        &shift.start_time,
        &shift.end_time,
        i64::from(shift.break_minutes),
    );
    let band = classify_time_band(&duration);
    let mut warnings = duration.warnings.clone();

    if shift.cleaners == 0 {
        warnings.push(warning(
            "no_cleaners",
            "Shift has no cleaners assigned, costing 0".to_string(),
            Severity::Low,
        ));
    }

    let segments = if settings.split_overnight_shifts {
        split_at_midnight(shift.day, shift.public_holiday, &duration)
    } else {
        vec![ShiftSegment {
            day: shift.day,
            day_type: DayType::for_day(shift.day, shift.public_holiday),
            hours: duration.net_hours,
        }]
    };

    let overtime = detect_daily_overtime(
        duration.net_hours,
        settings.standard_hours_per_day,
        settings.use_penalties,
        step_number,
    );
    let mut ordinary_remaining = overtime.ordinary_hours;

    let headcount = Decimal::from(shift.cleaners);
    let mut components = Vec::new();

    for segment in &segments {
        let ordinary_hours = segment.hours.min(ordinary_remaining);
        ordinary_remaining -= ordinary_hours;
        let overtime_hours = segment.hours - ordinary_hours;

        let ordinary = resolver.condition_for(segment.day_type, band);
        let parts = [
            (ComponentKind::Ordinary, ordinary_hours, ordinary),
            (
                ComponentKind::Overtime,
                overtime_hours,
                resolver.overtime_condition(ordinary, base_rate)?,
            ),
        ];

        for (kind, hours, condition) in parts {
            if hours <= Decimal::ZERO {
                continue;
            }

            let (line_rate, condition_multiplier) = match condition.rate {
                ConditionRate::Multiplier(multiplier) => (base_rate, multiplier),
                ConditionRate::FlatHourly(rate) => (rate, Decimal::ONE),
            };
            let line = calculate_line_cost(&LineCostInput {
                hours,
                base_rate: line_rate,
                condition_multiplier,
                employment_multiplier,
                headcount,
            })?;
            warnings.extend(line.warnings);

            components.push(CostComponent {
                day: segment.day,
                kind,
                condition: condition.key.to_string(),
                hours,
                hourly_rate: checked_product(
                    "hourly rate",
                    &[line_rate, condition_multiplier, employment_multiplier],
                )?,
                amount: line.amount,
            });
        }
    }

    let mut allowances_cost = Decimal::ZERO;
    for allowance in &shift.allowances {
        if allowance.amount < Decimal::ZERO {
            warnings.push(warning(
                "negative_allowance",
                format!(
                    "Allowance '{}' of {} is negative, ignored",
                    allowance.name, allowance.amount
                ),
                Severity::Medium,
            ));
            continue;
        }
        let units = match allowance.unit {
            AllowanceUnit::PerShift => Decimal::ONE,
            AllowanceUnit::PerHour => duration.net_hours,
        };
        let amount = round_currency(checked_product(
            "allowances",
            &[allowance.amount, units, headcount],
        )?);
        allowances_cost = checked_sum("allowances", [allowances_cost, amount])?;
    }

    let wages = checked_sum("shift cost", components.iter().map(|c| c.amount))?;
    let total_cost = checked_sum("shift cost", [wages, allowances_cost])?;

    let cost = ShiftCost {
        shift_id: shift.id.clone(),
        day: shift.day,
        band,
        employment_type: shift.employment_type,
        level: shift.level,
        base_rate,
        employment_multiplier,
        gross_hours: duration.gross_hours,
        net_hours: duration.net_hours,
        cleaners: shift.cleaners,
        components,
        allowances_cost,
        total_cost,
    };

    let components_json: Vec<serde_json::Value> = cost
        .components
        .iter()
        .map(|c| {
            serde_json::json!({
                "day": c.day.as_str(),
                "condition": c.condition,
                "hours": c.hours.normalize().to_string(),
                "amount": c.amount.to_string(),
            })
        })
        .collect();

    let costing_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "shift_cost".to_string(),
        rule_name: "Shift Cost".to_string(),
        input: serde_json::json!({
            "shift_id": shift.id,
            "day": shift.day.as_str(),
            "public_holiday": shift.public_holiday,
            "start_time": shift.start_time,
            "end_time": shift.end_time,
            "break_minutes": shift.break_minutes,
            "cleaners": shift.cleaners,
            "employment_type": shift.employment_type.condition_key(),
            "level": shift.level,
        }),
        output: serde_json::json!({
            "base_rate": base_rate.normalize().to_string(),
            "base_rate_source": base_rate_source,
            "employment_multiplier": employment_multiplier.normalize().to_string(),
            "band": band.condition_key(),
            "net_hours": duration.net_hours.normalize().to_string(),
            "components": components_json,
            "allowances_cost": allowances_cost.to_string(),
            "total_cost": total_cost.to_string(),
        }),
        reasoning: format!(
            "{} hours x {} cleaner(s) on {} ({}) at base ${}/hr with {} loading = ${}",
            duration.net_hours.normalize(),
            shift.cleaners,
            shift.day,
            band,
            base_rate.normalize(),
            employment_multiplier.normalize(),
            total_cost
        ),
    };

    let warnings = warnings
        .into_iter()
        .map(|w| CalculationWarning {
            message: format!("Shift {}: {}", shift.id, w.message),
            ..w
        })
        .collect();

    Ok(ShiftCostResult {
        cost,
        warnings,
        audit_steps: vec![overtime.audit_step, costing_step],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::TimeBand;
    use crate::config::{AwardSettings, RateTable};
    use crate::error::EngineError;
    use crate::models::{Allowance, Day, EmploymentType};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn flat_settings() -> AwardSettings {
        let mut settings = AwardSettings::default();
        settings.base_rates.insert(1, dec("25"));
        settings
    }

    fn cost(shift: &Shift, settings: &AwardSettings) -> ShiftCostResult {
        let table = RateTable::default();
        let resolver = RateResolver::new(settings, &table);
        calculate_shift_cost(shift, &resolver, 1).unwrap()
    }

    #[test]
    fn test_ordinary_weekday_shift() {
        let shift = Shift::new("s1", Day::Monday, "09:00", "16:00");
        let result = cost(&shift, &flat_settings());

        assert_eq!(result.cost.band, TimeBand::Ordinary);
        assert_eq!(result.cost.components.len(), 1);
        assert_eq!(result.cost.components[0].condition, "ordinary");
        assert_eq!(result.cost.total_cost, dec("175.00"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_headcount_multiplies_cost() {
        let mut shift = Shift::new("s1", Day::Monday, "09:00", "16:00");
        shift.cleaners = 3;
        let result = cost(&shift, &flat_settings());

        assert_eq!(result.cost.total_cost, dec("525.00"));
        // hours per cleaner are unchanged
        assert_eq!(result.cost.net_hours, dec("7"));
    }

    #[test]
    fn test_overtime_beyond_standard_hours() {
        // 10 hours: 7.6 at ordinary 25, 2.4 at 1.5 x 25 = 37.5
        let shift = Shift::new("s1", Day::Tuesday, "07:00", "17:00");
        let result = cost(&shift, &flat_settings());

        let components = &result.cost.components;
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].kind, ComponentKind::Ordinary);
        assert_eq!(components[0].amount, dec("190.00"));
        assert_eq!(components[1].kind, ComponentKind::Overtime);
        assert_eq!(components[1].condition, "overtime");
        assert_eq!(components[1].amount, dec("90.00"));
        assert_eq!(result.cost.total_cost, dec("280.00"));
    }

    #[test]
    fn test_penalties_off_prices_everything_at_base() {
        let settings = AwardSettings {
            use_penalties: false,
            ..flat_settings()
        };
        let shift = Shift::new("s1", Day::Sunday, "07:00", "17:00");
        let result = cost(&shift, &settings);

        assert_eq!(result.cost.components.len(), 1);
        assert_eq!(result.cost.total_cost, dec("250.00"));
        let detection = &result.audit_steps[0];
        assert_eq!(detection.output["overtime_hours"], "0");
        assert!(detection.reasoning.contains("penalty rates are off"));
    }

    #[test]
    fn test_weekday_night_shift_uses_night_rate() {
        let shift = Shift::new("s1", Day::Wednesday, "22:00", "04:00");
        let result = cost(&shift, &flat_settings());

        assert_eq!(result.cost.band, TimeBand::Night);
        // 6h x 25 x 1.15
        assert_eq!(result.cost.total_cost, dec("172.50"));
    }

    #[test]
    fn test_friday_night_split_prices_saturday_hours() {
        let settings = AwardSettings {
            split_overnight_shifts: true,
            ..flat_settings()
        };
        let shift = Shift::new("s1", Day::Friday, "22:00", "04:00");
        let result = cost(&shift, &settings);

        let components = &result.cost.components;
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].day, Day::Friday);
        assert_eq!(components[0].condition, "night");
        // 2h x 25 x 1.15
        assert_eq!(components[0].amount, dec("57.50"));
        assert_eq!(components[1].day, Day::Saturday);
        assert_eq!(components[1].condition, "saturday");
        // 4h x 25 x 1.5
        assert_eq!(components[1].amount, dec("150.00"));
    }

    #[test]
    fn test_public_holiday_rate() {
        let mut shift = Shift::new("s1", Day::Monday, "09:00", "13:00");
        shift.public_holiday = true;
        let result = cost(&shift, &flat_settings());

        assert_eq!(result.cost.components[0].condition, "public_holiday");
        assert_eq!(result.cost.total_cost, dec("250.00"));
    }

    #[test]
    fn test_allowances_per_shift_and_per_hour() {
        let mut shift = Shift::new("s1", Day::Monday, "09:00", "13:00");
        shift.cleaners = 2;
        shift.allowances = vec![
            Allowance {
                name: "Travel".to_string(),
                amount: dec("10"),
                unit: AllowanceUnit::PerShift,
            },
            Allowance {
                name: "Toilet cleaning".to_string(),
                amount: dec("0.5"),
                unit: AllowanceUnit::PerHour,
            },
        ];
        let result = cost(&shift, &flat_settings());

        // 10 x 2 + 0.5 x 4 x 2
        assert_eq!(result.cost.allowances_cost, dec("24.00"));
        assert_eq!(result.cost.total_cost, dec("224.00"));
    }

    #[test]
    fn test_negative_allowance_is_ignored_with_warning() {
        let mut shift = Shift::new("s1", Day::Monday, "09:00", "13:00");
        shift.allowances = vec![Allowance {
            name: "Refund".to_string(),
            amount: dec("-10"),
            unit: AllowanceUnit::PerShift,
        }];
        let result = cost(&shift, &flat_settings());

        assert_eq!(result.cost.allowances_cost, Decimal::ZERO);
        assert_eq!(result.warnings[0].code, "negative_allowance");
        assert!(result.warnings[0].message.starts_with("Shift s1:"));
    }

    #[test]
    fn test_oversized_allowance_is_an_error() {
        let mut shift = Shift::new("s1", Day::Monday, "09:00", "13:00");
        shift.cleaners = 2;
        shift.allowances = vec![Allowance {
            name: "Equipment".to_string(),
            amount: Decimal::MAX,
            unit: AllowanceUnit::PerShift,
        }];
        let table = RateTable::default();
        let settings = flat_settings();
        let resolver = RateResolver::new(&settings, &table);

        let result = calculate_shift_cost(&shift, &resolver, 1);
        assert!(matches!(
            result,
            Err(EngineError::CalculationOverflow { stage }) if stage == "allowances"
        ));
    }

    #[test]
    fn test_oversized_base_rate_override_is_an_error() {
        let mut settings = flat_settings();
        settings.base_rates.insert(1, Decimal::MAX);
        let table = RateTable::default();
        let resolver = RateResolver::new(&settings, &table);

        let shift = Shift::new("s1", Day::Saturday, "09:00", "17:00");
        let result = calculate_shift_cost(&shift, &resolver, 1);
        assert!(matches!(result, Err(EngineError::CalculationOverflow { .. })));
    }

    #[test]
    fn test_zero_cleaners_costs_nothing_with_warning() {
        let mut shift = Shift::new("s1", Day::Monday, "09:00", "17:00");
        shift.cleaners = 0;
        let result = cost(&shift, &flat_settings());

        assert_eq!(result.cost.total_cost, Decimal::ZERO);
        assert_eq!(result.warnings[0].code, "no_cleaners");
    }

    #[test]
    fn test_malformed_times_cost_nothing() {
        let shift = Shift::new("s1", Day::Monday, "nine", "five");
        let result = cost(&shift, &flat_settings());

        assert_eq!(result.cost.total_cost, Decimal::ZERO);
        assert!(result.cost.components.is_empty());
        assert_eq!(result.warnings[0].code, "malformed_time");
    }

    #[test]
    fn test_unknown_level_fails() {
        let mut shift = Shift::new("s1", Day::Monday, "09:00", "17:00");
        shift.level = 12;
        let table = RateTable::default();
        let settings = AwardSettings::default();
        let resolver = RateResolver::new(&settings, &table);

        let result = calculate_shift_cost(&shift, &resolver, 1);
        assert!(matches!(result, Err(EngineError::UnknownLevel { level: 12 })));
    }

    #[test]
    fn test_casual_loading_applies() {
        let mut shift = Shift::new("s1", Day::Monday, "09:00", "13:00");
        shift.employment_type = EmploymentType::Casual;
        let result = cost(&shift, &flat_settings());

        assert_eq!(result.cost.employment_multiplier, dec("1.25"));
        assert_eq!(result.cost.total_cost, dec("125.00"));
    }

    #[test]
    fn test_audit_steps_are_numbered_from_step_number() {
        let shift = Shift::new("s1", Day::Monday, "09:00", "13:00");
        let table = RateTable::default();
        let settings = flat_settings();
        let resolver = RateResolver::new(&settings, &table);

        let result = calculate_shift_cost(&shift, &resolver, 5).unwrap();
        assert_eq!(result.audit_steps.len(), 2);
        assert_eq!(result.audit_steps[0].step_number, 5);
        assert_eq!(result.audit_steps[0].rule_id, "daily_overtime_detection");
        assert_eq!(result.audit_steps[1].step_number, 6);
        assert_eq!(result.audit_steps[1].rule_id, "shift_cost");
        assert_eq!(result.audit_steps[1].output["base_rate_source"], "settings");
        assert_eq!(result.audit_steps[1].output["total_cost"], "100.00");
    }

    #[test]
    fn test_audit_records_table_base_rate_source() {
        let shift = Shift::new("s1", Day::Monday, "09:00", "13:00");
        let table = RateTable::default();
        let settings = AwardSettings::default();
        let resolver = RateResolver::new(&settings, &table);

        let result = calculate_shift_cost(&shift, &resolver, 1).unwrap();
        assert_eq!(result.audit_steps[1].output["base_rate_source"], "table");
    }
}
