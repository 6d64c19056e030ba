//! Vacation request model.
//!
//! This module defines the [`VacationRequest`] submitted by the request form
//! and the CLT limits it must respect.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Minimum vacation block length in days.
pub const MIN_VACATION_DAYS: u32 = 5;

/// Maximum vacation block length in days.
pub const MAX_VACATION_DAYS: u32 = 30;

/// Maximum number of days that can be sold (abono pecuniário).
pub const MAX_SOLD_DAYS: u32 = 10;

/// A requested vacation period.
///
/// # Example
///
/// ```
/// use ferias_engine::models::VacationRequest;
/// use chrono::NaiveDate;
///
/// let request = VacationRequest {
///     start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
///     vacation_days: 20,
///     sold_days: 5,
///     advance_13th: false,
/// };
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRequest {
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Number of days on leave.
    pub vacation_days: u32,
    /// Number of days sold back to the employer.
    #[serde(default)]
    pub sold_days: u32,
    /// Whether half of the 13th salary is advanced with the vacation pay.
    #[serde(default)]
    pub advance_13th: bool,
}

impl VacationRequest {
    /// Checks the request against the CLT limits.
    ///
    /// Vacation days must be within 5..=30. Sold days may not exceed 10 nor
    /// one third of the vacation days.
    pub fn validate(&self) -> EngineResult<()> {
        if !(MIN_VACATION_DAYS..=MAX_VACATION_DAYS).contains(&self.vacation_days) {
            return Err(EngineError::InvalidRequest {
                field: "vacation_days".to_string(),
                message: format!(
                    "must be between {} and {}, got {}",
                    MIN_VACATION_DAYS, MAX_VACATION_DAYS, self.vacation_days
                ),
            });
        }

        let sold_limit = MAX_SOLD_DAYS.min(self.vacation_days / 3);
        if self.sold_days > sold_limit {
            return Err(EngineError::InvalidRequest {
                field: "sold_days".to_string(),
                message: format!(
                    "at most {} days can be sold with {} vacation days, got {}",
                    sold_limit, self.vacation_days, self.sold_days
                ),
            });
        }

        Ok(())
    }
}
