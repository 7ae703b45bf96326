//! Measurement records for area-rate workers.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::PayPeriod;
use super::limits::{MAX_AMOUNT, MAX_QUANTITY, MAX_RATE, check_bounds};

/// Quantity measured for one area-rate worker over one fixed period.
///
/// The stored period bounds must equal the computed fixed period exactly for
/// the record to be picked up by payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Unique identifier for the record.
    pub id: String,
    /// The worker this measurement belongs to.
    pub worker_id: String,
    /// First day of the measured period.
    pub period_start: NaiveDate,
    /// Last day of the measured period.
    pub period_end: NaiveDate,
    /// Measured quantity (e.g. square metres).
    #[serde(default)]
    pub quantity: Decimal,
    /// Unit rate agreed for this measurement. Falls back to the worker default.
    #[serde(default)]
    pub unit_rate: Option<Decimal>,
    /// Precomputed total; when present it wins over quantity × rate.
    #[serde(default)]
    pub total: Option<Decimal>,
    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl MeasurementRecord {
    /// True when the stored bounds equal `period` exactly.
    pub fn matches_period(&self, period: &PayPeriod) -> bool {
        self.period_start == period.start_date && self.period_end == period.end_date
    }

    /// The stored bounds as a period.
    pub fn period(&self) -> PayPeriod {
        PayPeriod::new(self.period_start, self.period_end)
    }

    /// Checks the worker reference, period ordering, and numeric bounds.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_measurement(
            &self.worker_id,
            self.period(),
            self.quantity,
            self.unit_rate,
            self.total,
        )
    }
}

/// Fields for recording a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeasurement {
    /// The worker.
    pub worker_id: String,
    /// First day of the measured period.
    pub period_start: NaiveDate,
    /// Last day of the measured period.
    pub period_end: NaiveDate,
    /// Measured quantity.
    #[serde(default)]
    pub quantity: Decimal,
    /// Unit rate.
    #[serde(default)]
    pub unit_rate: Option<Decimal>,
    /// Precomputed total.
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl NewMeasurement {
    /// Checks the worker reference, period ordering, and numeric bounds.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_measurement(
            &self.worker_id,
            PayPeriod::new(self.period_start, self.period_end),
            self.quantity,
            self.unit_rate,
            self.total,
        )
    }

    /// Builds the stored record.
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> MeasurementRecord {
        MeasurementRecord {
            id,
            worker_id: self.worker_id,
            period_start: self.period_start,
            period_end: self.period_end,
            quantity: self.quantity,
            unit_rate: self.unit_rate,
            total: self.total,
            created_at: Some(created_at),
        }
    }
}

fn validate_measurement(
    worker_id: &str,
    period: PayPeriod,
    quantity: Decimal,
    unit_rate: Option<Decimal>,
    total: Option<Decimal>,
) -> PayrollResult<()> {
    if worker_id.trim().is_empty() {
        return Err(PayrollError::invalid("measurement", "worker_id is required"));
    }
    if period.start_date > period.end_date {
        return Err(PayrollError::invalid(
            "measurement",
            "period_start must not be after period_end",
        ));
    }
    let checks = [
        ("quantity", Some(quantity), MAX_QUANTITY),
        ("unit_rate", unit_rate, MAX_RATE),
        ("total", total, MAX_AMOUNT),
    ];
    for (field, value, max) in checks {
        if let Some(value) = value {
            check_bounds(value, max).map_err(|reason| {
                PayrollError::invalid("measurement", format!("{} {}", field, reason))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn new_measurement(start: &str, end: &str, quantity: i64) -> NewMeasurement {
        NewMeasurement {
            worker_id: "w-2".to_string(),
            period_start: make_date(start),
            period_end: make_date(end),
            quantity: Decimal::new(quantity, 0),
            unit_rate: None,
            total: None,
        }
    }

    #[test]
    fn test_matches_period_requires_exact_bounds() {
        let record = new_measurement("2026-10-16", "2026-10-31", 10)
            .into_record("m-1".to_string(), Utc::now());

        assert!(record.matches_period(&PayPeriod::new(
            make_date("2026-10-16"),
            make_date("2026-10-31")
        )));
        assert!(!record.matches_period(&PayPeriod::new(
            make_date("2026-10-16"),
            make_date("2026-10-30")
        )));
    }

    #[test]
    fn test_validate_rejects_inverted_period() {
        let measurement = new_measurement("2026-10-31", "2026-10-16", 10);
        assert!(measurement.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_quantity() {
        let measurement = new_measurement("2026-10-16", "2026-10-31", -1);
        assert!(measurement.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_total_and_unit_rate() {
        let mut measurement = new_measurement("2026-10-16", "2026-10-31", 0);
        measurement.total = Some(Decimal::new(-500, 0));
        let error = measurement.validate().unwrap_err();
        assert!(error.to_string().contains("total must not be negative"));

        measurement.total = None;
        measurement.unit_rate = Some(Decimal::new(-25, 0));
        let error = measurement.validate().unwrap_err();
        assert!(error.to_string().contains("unit_rate must not be negative"));
    }

    #[test]
    fn test_validate_rejects_oversized_quantity() {
        let measurement = new_measurement("2026-10-16", "2026-10-31", 1_000_001);
        assert!(measurement.validate().is_err());

        let record = new_measurement("2026-10-16", "2026-10-31", 40)
            .into_record("m-1".to_string(), Utc::now());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_quantity_defaults_to_zero() {
        let json = r#"{
            "id": "m-1",
            "worker_id": "w-2",
            "period_start": "2026-10-01",
            "period_end": "2026-10-15"
        }"#;
        let record: MeasurementRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quantity, Decimal::ZERO);
    }
}
