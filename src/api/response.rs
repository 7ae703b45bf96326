//! Response types for the site payroll API.
//!
//! This module defines the error response structures, the mapping from
//! [`PayrollError`] to HTTP status codes, and the bodies of the payroll
//! endpoints that do not return a model directly.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::models::Payment;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let message = error.to_string();
        match error {
            PayrollError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            PayrollError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            PayrollError::StoreUnavailable { message } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "STORE_UNAVAILABLE",
                    "Record store unavailable",
                    message,
                ),
            },
            PayrollError::RecordNotFound { entity, id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "NOT_FOUND",
                    message,
                    format!("No {} exists with id '{}'", entity, id),
                ),
            },
            PayrollError::InvalidPayment { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_PAYMENT",
                    format!("Invalid payment field '{}'", field),
                    message,
                ),
            },
            PayrollError::InvalidWorker { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_WORKER",
                    format!("Invalid worker field '{}'", field),
                    message,
                ),
            },
            PayrollError::AmountOutOfRange { message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "AMOUNT_OUT_OF_RANGE",
                    "Payroll total out of range",
                    message,
                ),
            },
            PayrollError::InvalidRecord { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(message),
            },
        }
    }
}

/// Answer of the duplicate-check gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheckResponse {
    /// Whether any payment to the worker is dated inside the period.
    pub exists: bool,
    /// The matching payments.
    pub matches: Vec<Payment>,
}

/// Result of creating payments from a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPaymentsResponse {
    /// Number of payments created.
    pub created: usize,
    /// Number of line items skipped because a payment already existed.
    pub skipped: usize,
    /// The created payments.
    pub payments: Vec<Payment>,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let api_error: ApiErrorResponse = PayrollError::not_found("worker", "w-9").into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "NOT_FOUND");
        assert_eq!(api_error.error.message, "worker not found: w-9");
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        let payment: ApiErrorResponse = PayrollError::InvalidPayment {
            field: "amount".to_string(),
            message: "must be greater than 0".to_string(),
        }
        .into();
        assert_eq!(payment.status, StatusCode::BAD_REQUEST);
        assert_eq!(payment.error.details.as_deref(), Some("must be greater than 0"));

        let record: ApiErrorResponse = PayrollError::invalid("site", "name must not be empty").into();
        assert_eq!(record.status, StatusCode::BAD_REQUEST);
        assert_eq!(record.error.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_store_unavailable_maps_to_503() {
        let api_error: ApiErrorResponse = PayrollError::StoreUnavailable {
            message: "timeout".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_amount_out_of_range_maps_to_422() {
        let api_error: ApiErrorResponse = PayrollError::AmountOutOfRange {
            message: "grand total overflowed".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api_error.error.code, "AMOUNT_OUT_OF_RANGE");
    }

    #[test]
    fn test_config_errors_map_to_500() {
        let api_error: ApiErrorResponse = PayrollError::ConfigNotFound {
            path: "payroll.yaml".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
