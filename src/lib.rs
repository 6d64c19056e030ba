//! Vacation Pay Engine for Brazilian CLT Payroll
//!
//! This crate calculates the vacation pay an employee receives under the
//! CLT: leave pay with the constitutional one-third bonus, sold vacation
//! days, the 13th salary advance, INSS and IRRF withholding, and the
//! payroll timeline around the leave.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod models;
