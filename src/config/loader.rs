//! Rate table loading.
//!
//! Rate tables can be kept as YAML files alongside the crate (see
//! `config/rates/`) so that a different award schedule can be dropped in
//! without recompiling.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::RateTable;

impl RateTable {
    /// Loads a rate table from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns the table on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file is not valid YAML for a rate table (`ConfigParseError`)
    /// - The table contains a negative rate (`InvalidSettings`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cleaning_cost_engine::config::RateTable;
    ///
    /// let table = RateTable::load("./config/rates/cleaning_services.yaml")?;
    /// println!("Loaded rate table: {}", table.name);
    /// # Ok::<(), cleaning_cost_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let table: RateTable = load_yaml(path)?;
        table.validate()?;

        debug!(
            path = %path.display(),
            name = %table.name,
            levels = table.base_rates.len(),
            conditions = table.conditions.len(),
            "Loaded rate table"
        );
        Ok(table)
    }
}

/// Loads and parses a YAML file.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}
