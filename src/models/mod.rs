//! Core data models for the vacation pay engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod profile;
mod vacation_request;
mod vacation_result;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use profile::{
    ContractType, Deduction, EmploymentProfile, PaymentFrequency, PaymentPeriod, ProfileUpdate,
};
pub use vacation_request::{MAX_SOLD_DAYS, MAX_VACATION_DAYS, MIN_VACATION_DAYS, VacationRequest};
pub use vacation_result::{EventKind, LineItem, LineKind, PayEvent, VacationResult};
