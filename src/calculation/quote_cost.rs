//! Quote costing: every shift, subcontractors, overhead and margin.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::{AwardSettings, RateTable};
use crate::error::EngineResult;
use crate::models::{
    AuditStep, CalculationWarning, CostBreakdown, CostCalculationResult, Quote, Severity, Shift,
    SubcontractorCost,
};

use super::{
    PricingInput, RateResolver, apply_pricing, calculate_shift_cost, checked_product, checked_sum,
    round_currency, validate_pricing, warning,
};

/// A job to cost: shifts, subcontractors and pricing percentages.
#[derive(Debug, Clone, Copy)]
pub struct JobCostInput<'a> {
    /// Shifts in roster order.
    pub shifts: &'a [Shift],
    /// Subcontracted work.
    pub subcontractors: &'a [SubcontractorCost],
    /// Overhead as a percentage of labor cost.
    pub overhead_percentage: Decimal,
    /// Margin percentage.
    pub margin_percentage: Decimal,
}

impl<'a> From<&'a Quote> for JobCostInput<'a> {
    fn from(quote: &'a Quote) -> Self {
        Self {
            shifts: &quote.shifts,
            subcontractors: &quote.subcontractors,
            overhead_percentage: quote.overhead_percentage,
            margin_percentage: quote.margin_percentage,
        }
    }
}

/// Costs a quote. See [`calculate_job_cost`].
///
/// # Example
///
/// ```
/// use cleaning_cost_engine::calculation::calculate_quote_cost;
/// use cleaning_cost_engine::config::{AwardSettings, RateTable};
/// use cleaning_cost_engine::models::{Day, Quote, Shift};
/// use rust_decimal::Decimal;
///
/// let mut quote = Quote::new(Decimal::ZERO, Decimal::new(20, 0));
/// quote.add_shift(Shift::new("mon", Day::Monday, "09:00", "13:00"));
///
/// let result = calculate_quote_cost(&quote, &AwardSettings::default(), &RateTable::default()).unwrap();
/// // 4h x 24.93
/// assert_eq!(result.labor_cost, Decimal::new(9972, 2));
/// assert_eq!(result.final_price, Decimal::new(12465, 2));
/// ```
pub fn calculate_quote_cost(
    quote: &Quote,
    settings: &AwardSettings,
    table: &RateTable,
) -> EngineResult<CostCalculationResult> {
    debug!(quote_id = %quote.id, shifts = quote.shifts.len(), "Costing quote");
    calculate_job_cost(&JobCostInput::from(quote), settings, table)
}

/// Costs a job.
///
/// Shift costs are computed with [`calculate_shift_cost`] and summed into
/// labor cost, then [`apply_pricing`] adds overhead and margin. Input
/// anomalies are sanitized and reported in `warnings`; the result is a pure
/// function of the inputs.
///
/// # Errors
///
/// - [`crate::error::EngineError::InvalidSettings`] when the settings or
///   table fail validation.
/// - [`crate::error::EngineError::InvalidMargin`] or
///   [`crate::error::EngineError::InvalidOverhead`] for percentages that
///   cannot produce a price.
/// - [`crate::error::EngineError::UnknownLevel`] when a shift's level has no
///   base rate.
/// - [`crate::error::EngineError::CalculationOverflow`] when an amount is too
///   large for a decimal.
pub fn calculate_job_cost(
    job: &JobCostInput<'_>,
    settings: &AwardSettings,
    table: &RateTable,
) -> EngineResult<CostCalculationResult> {
    settings.validate()?;
    table.validate()?;
    validate_pricing(
        job.overhead_percentage,
        job.margin_percentage,
        settings.margin_convention,
    )?;

    let resolver = RateResolver::new(settings, table);
    let mut warnings: Vec<CalculationWarning> = Vec::new();
    let mut audit_trace: Vec<AuditStep> = Vec::new();

    let mut shifts = Vec::with_capacity(job.shifts.len());
    for shift in job.shifts {
        let step_number = next_step(&audit_trace);
        let result = calculate_shift_cost(shift, &resolver, step_number)?;
        warnings.extend(result.warnings);
        audit_trace.extend(result.audit_steps);
        shifts.push(result.cost);
    }

    let mut subcontractor_cost = Decimal::ZERO;
    for subcontractor in job.subcontractors {
        if subcontractor.cost < Decimal::ZERO {
            warnings.push(warning(
                "negative_subcontractor_cost",
                format!(
                    "Subcontractor '{}' cost {} is negative, using 0",
                    subcontractor.name, subcontractor.cost
                ),
                Severity::Medium,
            ));
            continue;
        }
        subcontractor_cost =
            checked_sum("subcontractor cost", [subcontractor_cost, subcontractor.cost])?;
    }

    let mut labor_cost = Decimal::ZERO;
    let mut total_hours = Decimal::ZERO;
    let mut net_hours = Decimal::ZERO;
    let mut weighted_rate = Decimal::ZERO;
    let mut by_day: BTreeMap<_, CostBreakdown> = BTreeMap::new();
    let mut by_band: BTreeMap<_, CostBreakdown> = BTreeMap::new();

    for shift in &shifts {
        let cleaners = Decimal::from(shift.cleaners);
        let labor_hours = shift.net_hours * cleaners;

        labor_cost = checked_sum("labor cost", [labor_cost, shift.total_cost])?;
        total_hours += shift.gross_hours * cleaners;
        net_hours += labor_hours;
        weighted_rate = checked_sum(
            "base rate",
            [weighted_rate, checked_product("base rate", &[shift.base_rate, labor_hours])?],
        )?;

        for component in &shift.components {
            let entry = by_day.entry(component.day).or_default();
            entry.hours += component.hours * cleaners;
            entry.cost += component.amount;
        }
        if shift.allowances_cost > Decimal::ZERO {
            by_day.entry(shift.day).or_default().cost += shift.allowances_cost;
        }

        let entry = by_band.entry(shift.band).or_default();
        entry.hours += labor_hours;
        entry.cost += shift.total_cost;
    }

    let base_rate = if net_hours > Decimal::ZERO {
        round_currency(weighted_rate / net_hours)
    } else {
        shifts
            .first()
            .map(|shift| round_currency(shift.base_rate))
            .unwrap_or(Decimal::ZERO)
    };

    let pricing = apply_pricing(&PricingInput {
        labor_cost,
        subcontractor_cost,
        overhead_percentage: job.overhead_percentage,
        margin_percentage: job.margin_percentage,
        convention: settings.margin_convention,
    })?;

    audit_trace.push(AuditStep {
        step_number: next_step(&audit_trace),
        rule_id: "pricing".to_string(),
        rule_name: "Overhead and Margin".to_string(),
        input: serde_json::json!({
            "labor_cost": labor_cost.to_string(),
            "subcontractor_cost": subcontractor_cost.to_string(),
            "overhead_percentage": job.overhead_percentage.normalize().to_string(),
            "margin_percentage": job.margin_percentage.normalize().to_string(),
            "margin_convention": settings.margin_convention,
        }),
        output: serde_json::json!({
            "overhead_cost": pricing.overhead_cost.to_string(),
            "total_cost_before_margin": pricing.total_cost_before_margin.to_string(),
            "margin_amount": pricing.margin_amount.to_string(),
            "final_price": pricing.final_price.to_string(),
        }),
        reasoning: format!(
            "${} labor + ${} subcontractors + ${} overhead = ${}, priced at ${} with {}% margin",
            labor_cost,
            subcontractor_cost,
            pricing.overhead_cost,
            pricing.total_cost_before_margin,
            pricing.final_price,
            job.margin_percentage.normalize()
        ),
    });

    info!(
        shifts = shifts.len(),
        net_hours = %net_hours.normalize(),
        labor_cost = %labor_cost,
        final_price = %pricing.final_price,
        warnings = warnings.len(),
        "Calculation completed"
    );

    Ok(CostCalculationResult {
        base_rate,
        total_hours,
        net_hours,
        labor_cost,
        subcontractor_cost,
        overhead_cost: pricing.overhead_cost,
        total_cost_before_margin: pricing.total_cost_before_margin,
        margin_amount: pricing.margin_amount,
        final_price: pricing.final_price,
        shifts,
        by_day,
        by_band,
        warnings,
        audit_trace,
    })
}

fn next_step(audit_trace: &[AuditStep]) -> u32 {
    audit_trace.last().map_or(1, |step| step.step_number + 1)
}
