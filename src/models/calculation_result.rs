//! Calculation result models.
//!
//! This module contains the [`CostCalculationResult`] type and the structures
//! that capture per-shift costs, breakdowns, warnings and the audit trace.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Day, EmploymentType, TimeBand};

/// Whether a cost component covers ordinary or overtime hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Hours up to the standard hours per day.
    Ordinary,
    /// Hours beyond the standard hours per day.
    Overtime,
}

/// A priced block of hours within a shift.
///
/// A shift produces one component per day segment and hour kind, so an
/// overnight shift split at midnight with overtime can have up to four.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostComponent {
    /// The day these hours fall on.
    pub day: Day,
    /// Ordinary or overtime hours.
    pub kind: ComponentKind,
    /// The condition key whose rate was applied (e.g. "saturday", "night").
    pub condition: String,
    /// Net hours per cleaner.
    pub hours: Decimal,
    /// Hourly rate per cleaner after condition and employment multipliers.
    pub hourly_rate: Decimal,
    /// Cost for all cleaners, rounded to cents.
    pub amount: Decimal,
}

/// The costed form of one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCost {
    /// The id of the shift this cost belongs to.
    pub shift_id: String,
    /// The day the shift starts on.
    pub day: Day,
    /// Time-of-day band the shift was classified into.
    pub band: TimeBand,
    /// Employment type of the cleaners.
    pub employment_type: EmploymentType,
    /// Employee level used for the base rate.
    pub level: u8,
    /// Base hourly rate for the level.
    pub base_rate: Decimal,
    /// Loading multiplier for the employment type.
    pub employment_multiplier: Decimal,
    /// Elapsed hours per cleaner, before the break.
    pub gross_hours: Decimal,
    /// Payable hours per cleaner, after the break.
    pub net_hours: Decimal,
    /// Number of cleaners.
    pub cleaners: u32,
    /// Wage components making up the labor cost.
    pub components: Vec<CostComponent>,
    /// Allowances for all cleaners.
    pub allowances_cost: Decimal,
    /// Wages plus allowances.
    pub total_cost: Decimal,
}

/// Hours and cost accumulated under one breakdown key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Net labor hours (summed over cleaners).
    pub hours: Decimal,
    /// Labor cost including allowances.
    pub cost: Decimal,
}

/// How much attention a warning needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; the input was unusual but the result is sound.
    Low,
    /// Part of the input was replaced with a safe default.
    Medium,
    /// A line was priced at zero because its input was unusable.
    High,
}

/// An input anomaly found while calculating.
///
/// Warnings never stop a calculation; the offending value has already been
/// replaced with a safe default by the time the warning is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: Severity,
}

impl CalculationWarning {
    /// Creates a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete result of costing a quote.
///
/// Each calculation builds a new value; two calculations over the same
/// inputs compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCalculationResult {
    /// Base hourly rate, averaged over shifts weighted by net labor hours.
    pub base_rate: Decimal,
    /// Elapsed labor hours (per-shift elapsed hours times cleaners).
    pub total_hours: Decimal,
    /// Payable labor hours (per-shift net hours times cleaners).
    pub net_hours: Decimal,
    /// Sum of all shift costs.
    pub labor_cost: Decimal,
    /// Sum of all subcontractor costs.
    pub subcontractor_cost: Decimal,
    /// Overhead on labor cost.
    pub overhead_cost: Decimal,
    /// Labor, subcontractors and overhead.
    pub total_cost_before_margin: Decimal,
    /// Difference between the final price and the total before margin.
    pub margin_amount: Decimal,
    /// The quoted price.
    pub final_price: Decimal,
    /// Per-shift costs, in roster order.
    pub shifts: Vec<ShiftCost>,
    /// Labor hours and cost per day.
    pub by_day: BTreeMap<Day, CostBreakdown>,
    /// Labor hours and cost per time-of-day band.
    pub by_band: BTreeMap<TimeBand, CostBreakdown>,
    /// Input anomalies that were sanitized.
    pub warnings: Vec<CalculationWarning>,
    /// Record of the decisions taken.
    pub audit_trace: Vec<AuditStep>,
}
