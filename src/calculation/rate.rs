//! Unit rate resolution.
//!
//! This module decides which per-unit rate applies to a record. A rate carried
//! on the record itself wins; otherwise the worker's configured default
//! applies; otherwise the rate is zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, MeasurementRecord, Worker};

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The record carried its own rate (a linked role, or the measurement's unit rate).
    RecordOverride,
    /// The worker's configured default.
    WorkerDefault,
    /// Nothing configured; the rate is zero.
    Unset,
}

/// The outcome of a rate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateResolution {
    /// The rate to apply.
    pub rate: Decimal,
    /// Where it came from.
    pub source: RateSource,
}

impl RateResolution {
    fn pick(record_rate: Option<Decimal>, worker_default: Option<Decimal>) -> Self {
        match (record_rate, worker_default) {
            (Some(rate), _) => Self {
                rate,
                source: RateSource::RecordOverride,
            },
            (None, Some(rate)) => Self {
                rate,
                source: RateSource::WorkerDefault,
            },
            (None, None) => Self {
                rate: Decimal::ZERO,
                source: RateSource::Unset,
            },
        }
    }
}

/// Resolves the base daily rate for one attendance record.
///
/// Only the first joined role is consulted. When its rate is missing or did
/// not parse, the worker's default daily rate applies.
///
/// # Example
///
/// ```
/// use site_payroll::calculation::{RateSource, resolve_daily_rate};
/// use site_payroll::models::{AttendanceRecord, CompensationType, RoleLink, Worker};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let worker = Worker {
///     id: "w-1".to_string(),
///     name: "Ana".to_string(),
///     compensation_type: CompensationType::Hourly,
///     cut_weekday: None,
///     default_daily_rate: Some(Decimal::new(90, 0)),
///     default_area_rate: None,
///     payout_destination: None,
///     tax_id: None,
///     email: None,
///     phone: None,
///     created_at: None,
/// };
/// let mut record = AttendanceRecord {
///     id: "a-1".to_string(),
///     site_id: "s-1".to_string(),
///     worker_id: "w-1".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(),
///     worked_hours: None,
///     role_id: Some("r-1".to_string()),
///     roles: vec![RoleLink { role_id: "r-1".to_string(), daily_rate: Some(Decimal::new(120, 0)) }],
///     amount: None,
///     description: None,
///     created_at: None,
/// };
///
/// let resolved = resolve_daily_rate(&record, &worker);
/// assert_eq!(resolved.rate, Decimal::new(120, 0));
/// assert_eq!(resolved.source, RateSource::RecordOverride);
///
/// record.roles[0].daily_rate = None;
/// assert_eq!(resolve_daily_rate(&record, &worker).source, RateSource::WorkerDefault);
/// ```
pub fn resolve_daily_rate(record: &AttendanceRecord, worker: &Worker) -> RateResolution {
    let role_rate = record.roles.first().and_then(|role| role.daily_rate);
    RateResolution::pick(role_rate, worker.default_daily_rate)
}

/// Resolves the unit rate for a measurement: its own rate, else the worker's area rate.
pub fn resolve_unit_rate(measurement: &MeasurementRecord, worker: &Worker) -> RateResolution {
    RateResolution::pick(measurement.unit_rate, worker.default_area_rate)
}
