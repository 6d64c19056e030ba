//! Request types for the vacation pay API.
//!
//! This module defines the JSON request body shared by `/calculate` and
//! `/simulations`.

use serde::{Deserialize, Serialize};

use crate::models::{EmploymentProfile, VacationRequest};

/// Request body for the calculation endpoints.
///
/// The profile fields are all optional; the vacation fields `start_date`
/// and `vacation_days` are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee's employment profile.
    #[serde(default)]
    pub profile: EmploymentProfile,
    /// The requested vacation.
    pub vacation: VacationRequest,
}
