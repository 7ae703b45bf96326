//! Error types for the site payroll service.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure that escapes a store, configuration, or validation call.
//! A worker whose pay cannot be determined is not an error here: the payroll
//! aggregator reports that case as data (see [`crate::models::PayoutOutcome`]).

use thiserror::Error;

/// The main error type for the site payroll service.
///
/// # Example
///
/// ```
/// use site_payroll::error::PayrollError;
///
/// let error = PayrollError::RecordNotFound {
///     entity: "worker".to_string(),
///     id: "w-404".to_string(),
/// };
/// assert_eq!(error.to_string(), "worker not found: w-404");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The backing record store could not be reached or failed mid-request.
    #[error("Record store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the transport or storage failure.
        message: String,
    },

    /// A record addressed by id does not exist.
    #[error("{entity} not found: {id}")]
    RecordNotFound {
        /// The kind of record (e.g. "site", "payment").
        entity: String,
        /// The id that was looked up.
        id: String,
    },

    /// A payment field failed validation.
    #[error("Invalid payment field '{field}': {message}")]
    InvalidPayment {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A worker field failed validation.
    #[error("Invalid worker field '{field}': {message}")]
    InvalidWorker {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A payroll total does not fit in a decimal amount.
    #[error("Amount out of range: {message}")]
    AmountOutOfRange {
        /// Which sum overflowed.
        message: String,
    },

    /// Any other record (site, attendance, measurement, role) failed validation.
    #[error("Invalid {entity}: {message}")]
    InvalidRecord {
        /// The kind of record.
        entity: String,
        /// What was wrong with it.
        message: String,
    },
}

impl PayrollError {
    /// Shorthand for [`PayrollError::RecordNotFound`].
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::RecordNotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Shorthand for [`PayrollError::InvalidRecord`].
    pub fn invalid(entity: &str, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            entity: entity.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
