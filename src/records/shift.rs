//! Shift and subcontractor records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Allowance, AllowanceUnit, Day, EmploymentType, Severity, Shift, SubcontractorCost,
};

use super::number::{RawNumber, Sanitizer};
use super::{Sanitized, normalize_key};

/// A shift as stored or submitted by a form, in either field-name style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Shift identifier. Generated from the roster position when absent.
    #[serde(default)]
    pub id: Option<String>,
    /// Day name, e.g. `"Saturday"` or `"sat"`.
    #[serde(default, alias = "dayOfWeek", alias = "day_of_week")]
    pub day: Option<String>,
    /// Whether the day is a public holiday.
    #[serde(
        default,
        alias = "publicHoliday",
        alias = "isPublicHoliday",
        alias = "is_public_holiday"
    )]
    pub public_holiday: Option<bool>,
    /// Start time, `HH:MM`.
    #[serde(default, alias = "startTime")]
    pub start_time: Option<String>,
    /// End time, `HH:MM`.
    #[serde(default, alias = "endTime")]
    pub end_time: Option<String>,
    /// Break in minutes.
    #[serde(
        default,
        alias = "breakDuration",
        alias = "break_duration",
        alias = "breakMinutes"
    )]
    pub break_minutes: Option<RawNumber>,
    /// Number of cleaners.
    #[serde(
        default,
        alias = "numberOfCleaners",
        alias = "number_of_cleaners",
        alias = "headcount"
    )]
    pub cleaners: Option<RawNumber>,
    /// Employment type, e.g. `"casual"`, `"part-time"`, `"fullTime"`.
    #[serde(default, alias = "employmentType")]
    pub employment_type: Option<String>,
    /// Employee level.
    #[serde(default, alias = "employeeLevel", alias = "employee_level")]
    pub level: Option<RawNumber>,
    /// Site or area.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Allowances paid per cleaner.
    #[serde(default)]
    pub allowances: Vec<AllowanceRecord>,
    /// Previously computed estimate.
    #[serde(default, alias = "estimatedCost")]
    pub estimated_cost: Option<RawNumber>,
}

/// An allowance line on a shift record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowanceRecord {
    /// Name of the allowance.
    #[serde(default)]
    pub name: String,
    /// Amount per unit.
    #[serde(default, alias = "rate")]
    pub amount: Option<RawNumber>,
    /// `"per_shift"` (default) or `"per_hour"`, in any spelling.
    #[serde(default, alias = "per")]
    pub unit: Option<String>,
}

/// A subcontractor line as stored or submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubcontractorRecord {
    /// Name of the subcontractor.
    #[serde(default, alias = "subcontractorName", alias = "subcontractor_name")]
    pub name: String,
    /// What the subcontractor supplies.
    #[serde(default)]
    pub description: Option<String>,
    /// Cost of the line.
    #[serde(default, alias = "amount")]
    pub cost: Option<RawNumber>,
}

fn parse_employment_type(value: &str) -> Option<EmploymentType> {
    match normalize_key(value).replace('_', "").as_str() {
        "casual" => Some(EmploymentType::Casual),
        "parttime" => Some(EmploymentType::PartTime),
        "fulltime" | "permanent" => Some(EmploymentType::FullTime),
        _ => None,
    }
}

fn parse_allowance_unit(value: &str) -> Option<AllowanceUnit> {
    match normalize_key(value).as_str() {
        "per_shift" | "shift" => Some(AllowanceUnit::PerShift),
        "per_hour" | "hour" | "hourly" => Some(AllowanceUnit::PerHour),
        _ => None,
    }
}

impl ShiftRecord {
    /// Converts to a canonical [`Shift`], sanitizing every field.
    ///
    /// `position` is the shift's index in the roster and supplies the id
    /// when the record has none. Missing fields take the defaults of
    /// [`Shift::new`]; unusable values are replaced and reported.
    ///
    /// ```
    /// use cleaning_cost_engine::models::{Day, EmploymentType};
    /// use cleaning_cost_engine::records::ShiftRecord;
    ///
    /// let record: ShiftRecord = serde_json::from_str(r#"{
    ///     "day": "Saturday",
    ///     "startTime": "09:00",
    ///     "endTime": "17:00",
    ///     "breakDuration": 30,
    ///     "numberOfCleaners": "2",
    ///     "employmentType": "casual",
    ///     "level": 1
    /// }"#).unwrap();
    ///
    /// let converted = record.into_shift(0);
    /// assert!(converted.warnings.is_empty());
    /// assert_eq!(converted.value.id, "shift_1");
    /// assert_eq!(converted.value.day, Day::Saturday);
    /// assert_eq!(converted.value.cleaners, 2);
    /// assert_eq!(converted.value.employment_type, EmploymentType::Casual);
    /// ```
    pub fn into_shift(self, position: usize) -> Sanitized<Shift> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("shift_{}", position + 1));
        let mut sanitizer = Sanitizer::new(format!("shift '{}'", id));

        let day = match self.day.as_deref().map(str::parse::<Day>) {
            Some(Ok(day)) => day,
            Some(Err(_)) | None => {
                sanitizer.report(
                    "invalid_day",
                    format!("day {:?} is not a day of the week, using monday", self.day),
                    Severity::High,
                );
                Day::Monday
            }
        };

        let employment_type = match self.employment_type.as_deref() {
            None => EmploymentType::FullTime,
            Some(value) => parse_employment_type(value).unwrap_or_else(|| {
                // casual carries the highest loading, so an unknown type is never underpriced
                sanitizer.report(
                    "invalid_employment_type",
                    format!("employment type '{}' is not recognised, using casual", value),
                    Severity::Medium,
                );
                EmploymentType::Casual
            }),
        };

        let break_minutes = sanitizer.count("break duration", self.break_minutes.as_ref(), 0);
        let cleaners = sanitizer.count("number of cleaners", self.cleaners.as_ref(), 1);

        let level = sanitizer.count("level", self.level.as_ref(), 1);
        let level = u8::try_from(level).unwrap_or_else(|_| {
            sanitizer.report(
                "out_of_range",
                format!("level {} is out of range, using 1", level),
                Severity::Medium,
            );
            1
        });

        let allowances = self
            .allowances
            .into_iter()
            .map(|record| {
                let unit = match record.unit.as_deref() {
                    None => AllowanceUnit::PerShift,
                    Some(value) => parse_allowance_unit(value).unwrap_or_else(|| {
                        sanitizer.report(
                            "invalid_allowance_unit",
                            format!(
                                "allowance '{}' unit '{}' is not recognised, using per shift",
                                record.name, value
                            ),
                            Severity::Low,
                        );
                        AllowanceUnit::PerShift
                    }),
                };
                let field = format!("allowance '{}' amount", record.name);
                let amount = sanitizer.non_negative(&field, record.amount.as_ref(), Decimal::ZERO);
                Allowance {
                    name: record.name,
                    amount,
                    unit,
                }
            })
            .collect();

        let estimated_cost = self
            .estimated_cost
            .as_ref()
            .and_then(RawNumber::to_decimal);

        let shift = Shift {
            id,
            day,
            public_holiday: self.public_holiday.unwrap_or(false),
            start_time: self.start_time.unwrap_or_default(),
            end_time: self.end_time.unwrap_or_default(),
            break_minutes,
            cleaners,
            employment_type,
            level,
            location: self.location.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            allowances,
            estimated_cost,
        };

        Sanitized {
            value: shift,
            warnings: sanitizer.finish(),
        }
    }
}

impl SubcontractorRecord {
    /// Converts to a canonical [`SubcontractorCost`]. Unusable costs become zero.
    pub fn into_subcontractor(self) -> Sanitized<SubcontractorCost> {
        let mut sanitizer = Sanitizer::new(format!("subcontractor '{}'", self.name));
        let cost = sanitizer.non_negative("cost", self.cost.as_ref(), Decimal::ZERO);

        Sanitized {
            value: SubcontractorCost {
                name: self.name,
                description: self.description.unwrap_or_default(),
                cost,
            },
            warnings: sanitizer.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_record_converts() {
        let json = r#"{
            "id": "s1",
            "day_of_week": "sun",
            "start_time": "22:00",
            "end_time": "06:00",
            "break_duration": "30",
            "number_of_cleaners": 3,
            "employment_type": "part_time",
            "employee_level": 2,
            "is_public_holiday": true
        }"#;
        let record: ShiftRecord = serde_json::from_str(json).unwrap();

        let converted = record.into_shift(4);
        let shift = converted.value;
        assert!(converted.warnings.is_empty());
        assert_eq!(shift.id, "s1");
        assert_eq!(shift.day, Day::Sunday);
        assert!(shift.public_holiday);
        assert_eq!(shift.break_minutes, 30);
        assert_eq!(shift.cleaners, 3);
        assert_eq!(shift.employment_type, EmploymentType::PartTime);
        assert_eq!(shift.level, 2);
    }

    #[test]
    fn test_employment_type_spellings() {
        assert_eq!(parse_employment_type("Part-Time"), Some(EmploymentType::PartTime));
        assert_eq!(parse_employment_type("partTime"), Some(EmploymentType::PartTime));
        assert_eq!(parse_employment_type("full time"), Some(EmploymentType::FullTime));
        assert_eq!(parse_employment_type("CASUAL"), Some(EmploymentType::Casual));
        assert_eq!(parse_employment_type("contractor"), None);
    }

    #[test]
    fn test_unknown_employment_type_prices_as_casual() {
        let record = ShiftRecord {
            day: Some("monday".to_string()),
            employment_type: Some("contractor".to_string()),
            ..ShiftRecord::default()
        };

        let converted = record.into_shift(0);
        assert_eq!(converted.value.employment_type, EmploymentType::Casual);
        assert_eq!(converted.warnings[0].code, "invalid_employment_type");
    }

    #[test]
    fn test_nan_and_negative_fields_are_zeroed() {
        let record = ShiftRecord {
            day: Some("tue".to_string()),
            start_time: Some("09:00".to_string()),
            end_time: Some("17:00".to_string()),
            break_minutes: Some(RawNumber::Number(-15.0)),
            cleaners: Some(RawNumber::Number(f64::NAN)),
            ..ShiftRecord::default()
        };

        let converted = record.into_shift(0);
        assert_eq!(converted.value.break_minutes, 0);
        assert_eq!(converted.value.cleaners, 0);

        let codes: Vec<&str> = converted.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec!["negative_value", "invalid_number"]);
    }

    #[test]
    fn test_missing_day_is_reported() {
        let converted = ShiftRecord::default().into_shift(2);

        assert_eq!(converted.value.id, "shift_3");
        assert_eq!(converted.value.day, Day::Monday);
        assert_eq!(converted.warnings[0].code, "invalid_day");
        assert_eq!(converted.warnings[0].severity, Severity::High);
    }

    #[test]
    fn test_level_beyond_u8_falls_back() {
        let record = ShiftRecord {
            day: Some("mon".to_string()),
            level: Some(RawNumber::Number(300.0)),
            ..ShiftRecord::default()
        };

        let converted = record.into_shift(0);
        assert_eq!(converted.value.level, 1);
        assert_eq!(converted.warnings[0].code, "out_of_range");
    }

    #[test]
    fn test_level_outside_award_is_kept() {
        let record = ShiftRecord {
            day: Some("mon".to_string()),
            level: Some(RawNumber::Number(7.0)),
            ..ShiftRecord::default()
        };

        // the cost engine, not the adapter, decides whether a level is priced
        assert_eq!(record.into_shift(0).value.level, 7);
    }

    #[test]
    fn test_allowance_records() {
        let json = r#"{
            "day": "wed",
            "allowances": [
                { "name": "travel", "amount": 12.5 },
                { "name": "equipment", "rate": "1.20", "per": "hourly" },
                { "name": "broken", "amount": -4 }
            ]
        }"#;
        let record: ShiftRecord = serde_json::from_str(json).unwrap();

        let converted = record.into_shift(0);
        let allowances = &converted.value.allowances;
        assert_eq!(allowances[0].amount, Decimal::new(125, 1));
        assert_eq!(allowances[0].unit, AllowanceUnit::PerShift);
        assert_eq!(allowances[1].amount, Decimal::new(120, 2));
        assert_eq!(allowances[1].unit, AllowanceUnit::PerHour);
        assert_eq!(allowances[2].amount, Decimal::ZERO);
        assert_eq!(converted.warnings.len(), 1);
    }

    #[test]
    fn test_subcontractor_record_aliases() {
        let json = r#"{ "subcontractorName": "Window Co", "amount": "450.00" }"#;
        let record: SubcontractorRecord = serde_json::from_str(json).unwrap();

        let converted = record.into_subcontractor();
        assert!(converted.warnings.is_empty());
        assert_eq!(converted.value.name, "Window Co");
        assert_eq!(converted.value.cost, Decimal::new(450, 0));
    }

    #[test]
    fn test_negative_subcontractor_cost_is_zeroed() {
        let record = SubcontractorRecord {
            name: "Refund".to_string(),
            cost: Some(RawNumber::Number(-100.0)),
            ..SubcontractorRecord::default()
        };

        let converted = record.into_subcontractor();
        assert_eq!(converted.value.cost, Decimal::ZERO);
        assert_eq!(converted.warnings.len(), 1);
    }
}
