//! Core data models for the cost engine.
//!
//! These are the canonical shapes the calculation functions consume. Records
//! arriving from storage or forms go through [`crate::records`] first.

mod calculation_result;
mod condition;
mod employment;
mod quote;
mod shift;

pub use calculation_result::{
    AuditStep, CalculationWarning, ComponentKind, CostBreakdown, CostCalculationResult,
    CostComponent, Severity, ShiftCost,
};
pub use condition::{DayType, TimeBand};
pub use employment::EmploymentType;
pub use quote::{Quote, SubcontractorCost};
pub use shift::{Allowance, AllowanceUnit, Day, Shift};
