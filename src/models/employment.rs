//! Employment type of the cleaners on a shift.

use serde::{Deserialize, Serialize};

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Casual employment (no guaranteed hours, attracts casual loading).
    Casual,
    /// Part-time employment with a regular pattern.
    PartTime,
    /// Full-time employment.
    FullTime,
}

impl EmploymentType {
    /// The condition key whose multiplier is the loading for this employment type.
    pub fn condition_key(self) -> &'static str {
        match self {
            EmploymentType::Casual => "casual",
            EmploymentType::PartTime => "part_time",
            EmploymentType::FullTime => "full_time",
        }
    }
}
