//! Quote model: the aggregate a cost calculation feeds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CostCalculationResult, Shift};

/// A cost line for work performed by a subcontractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcontractorCost {
    /// Name of the subcontractor.
    pub name: String,
    /// What the subcontractor is supplying.
    #[serde(default)]
    pub description: String,
    /// Cost charged by the subcontractor.
    pub cost: Decimal,
}

/// A quote being composed: shifts, subcontractor lines and pricing knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier for the quote.
    pub id: Uuid,
    /// Rostered shifts.
    #[serde(default)]
    pub shifts: Vec<Shift>,
    /// Subcontractor cost lines.
    #[serde(default)]
    pub subcontractors: Vec<SubcontractorCost>,
    /// Overhead applied to labor cost, as a percentage.
    pub overhead_percentage: Decimal,
    /// Profit margin applied to reach the price, as a percentage.
    pub margin_percentage: Decimal,
}

impl Quote {
    /// Creates an empty quote with a fresh identifier.
    pub fn new(overhead_percentage: Decimal, margin_percentage: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            shifts: Vec::new(),
            subcontractors: Vec::new(),
            overhead_percentage,
            margin_percentage,
        }
    }

    /// Adds a shift to the roster.
    pub fn add_shift(&mut self, shift: Shift) {
        self.shifts.push(shift);
    }

    /// Returns a mutable reference to the shift with the given id.
    pub fn shift_mut(&mut self, shift_id: &str) -> Option<&mut Shift> {
        self.shifts.iter_mut().find(|s| s.id == shift_id)
    }

    /// Applies an edit to one shift. Returns false if no shift has that id.
    ///
    /// The shift's recorded estimate is cleared, since it no longer matches.
    ///
    /// ```
    /// use cleaning_cost_engine::models::{Day, Quote, Shift};
    /// use rust_decimal::Decimal;
    ///
    /// let mut quote = Quote::new(Decimal::ZERO, Decimal::ZERO);
    /// quote.add_shift(Shift::new("a", Day::Monday, "09:00", "17:00"));
    ///
    /// assert!(quote.update_shift("a", |s| s.cleaners = 3));
    /// assert_eq!(quote.shifts[0].cleaners, 3);
    /// assert!(!quote.update_shift("missing", |s| s.cleaners = 1));
    /// ```
    pub fn update_shift<F>(&mut self, shift_id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Shift),
    {
        match self.shift_mut(shift_id) {
            Some(shift) => {
                edit(shift);
                shift.estimated_cost = None;
                true
            }
            None => false,
        }
    }

    /// Removes the shift with the given id, returning it.
    pub fn remove_shift(&mut self, shift_id: &str) -> Option<Shift> {
        let index = self.shifts.iter().position(|s| s.id == shift_id)?;
        Some(self.shifts.remove(index))
    }

    /// Adds a subcontractor cost line.
    pub fn add_subcontractor(&mut self, subcontractor: SubcontractorCost) {
        self.subcontractors.push(subcontractor);
    }

    /// Copies each shift's computed cost from a calculation result onto the roster.
    pub fn record_estimates(&mut self, result: &CostCalculationResult) {
        for shift_cost in &result.shifts {
            if let Some(shift) = self.shift_mut(&shift_cost.shift_id) {
                shift.estimated_cost = Some(shift_cost.total_cost);
            }
        }
    }
}
