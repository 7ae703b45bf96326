//! Request types for the site payroll API.
//!
//! Record bodies reuse the `New*`/`*Update` models directly; this module holds
//! the bodies and query strings specific to the payroll endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PayPeriod;

/// Body of `POST /payments/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheckRequest {
    /// The worker to check.
    pub worker_id: String,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
}

impl DuplicateCheckRequest {
    /// The period being checked.
    pub fn period(&self) -> PayPeriod {
        PayPeriod::new(self.period_start, self.period_end)
    }
}

/// Body of `POST /payroll/batch/payments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPaymentsRequest {
    /// Site the created payments are booked against.
    pub site_id: String,
}

/// Query string of `GET /payments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentsQuery {
    /// Only payments on this site.
    #[serde(default)]
    pub site_id: Option<String>,
}

/// Query string of `GET /measurements`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementsQuery {
    /// Only measurements for this worker.
    #[serde(default)]
    pub worker_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_check_request_deserializes_dates() {
        let request: DuplicateCheckRequest = serde_json::from_str(
            r#"{"worker_id":"w-1","period_start":"2026-10-08","period_end":"2026-10-15"}"#,
        )
        .unwrap();

        assert_eq!(request.period().label(), "2026-10-08 a 2026-10-15");
    }

    #[test]
    fn test_duplicate_check_request_rejects_bad_date() {
        let result: Result<DuplicateCheckRequest, _> = serde_json::from_str(
            r#"{"worker_id":"w-1","period_start":"08/10/2026","period_end":"2026-10-15"}"#,
        );
        assert!(result.is_err());
    }
}
