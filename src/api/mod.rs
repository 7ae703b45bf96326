//! HTTP API module for the site payroll service.
//!
//! This module provides the REST endpoints for managing labor records and
//! for computing, persisting, paying out and reporting payroll batches.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchPaymentsRequest, DuplicateCheckRequest, MeasurementsQuery, PaymentsQuery};
pub use response::{
    ApiError, ApiErrorResponse, BatchPaymentsResponse, DuplicateCheckResponse, HealthResponse,
};
pub use state::AppState;
