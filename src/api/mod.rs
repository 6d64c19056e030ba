//! HTTP API module for the vacation pay engine.
//!
//! This module provides the REST API endpoints for calculating vacation
//! pay and keeping a history of simulations.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{EARLIEST_TABLES_WARNING, create_router};
pub use request::CalculationRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
