//! Rates and settings for the cost engine.
//!
//! A [`RateTable`] holds the reference rates for an award: a base hourly
//! rate per employee level and a rate per condition key. [`AwardSettings`]
//! are the user's overrides on top of it, kept in a [`SettingsRepository`].
//!
//! # Example
//!
//! ```no_run
//! use cleaning_cost_engine::config::{RateTable, SettingsRepository, YamlSettingsRepository};
//!
//! let table = RateTable::load("./config/rates/cleaning_services.yaml").unwrap();
//! let settings = YamlSettingsRepository::new("./settings.yaml").load().unwrap();
//! println!("Loaded {} with {} overrides", table.name, settings.condition_rates.len());
//! ```

mod loader;
mod repository;
mod types;

pub use repository::{InMemorySettingsRepository, SettingsRepository, YamlSettingsRepository};
pub use types::{
    AFTERNOON, AwardSettings, CASUAL, ConditionRate, DEFAULT_STANDARD_HOURS_PER_DAY,
    EARLY_MORNING, FULL_TIME, MarginConvention, NIGHT, ORDINARY, OVERTIME, PART_TIME,
    PUBLIC_HOLIDAY, RateDefinition, RateTable, SATURDAY, SUNDAY,
};
