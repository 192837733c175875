//! Labor cost and quote pricing engine for commercial cleaning.
//!
//! This crate turns a weekly roster of cleaning shifts into a quote: it
//! computes payable hours, applies award-style day, time-of-day, overtime
//! and employment multipliers to base rates, then adds subcontractor work,
//! overhead and margin. Every calculation is a pure function of its inputs
//! and comes with a breakdown, warnings for sanitized input and an audit
//! trace.
//!
//! # Example
//!
//! ```
//! use cleaning_cost_engine::calculation::calculate_quote_cost;
//! use cleaning_cost_engine::config::{AwardSettings, RateTable};
//! use cleaning_cost_engine::models::{Day, Quote, Shift};
//! use rust_decimal::Decimal;
//!
//! let mut quote = Quote::new(Decimal::new(10, 0), Decimal::new(20, 0));
//! quote.add_shift(Shift::new("mon-am", Day::Monday, "06:00", "10:00"));
//!
//! let result = calculate_quote_cost(&quote, &AwardSettings::default(), &RateTable::default())?;
//! assert!(result.final_price > result.labor_cost);
//! # Ok::<(), cleaning_cost_engine::error::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod records;
