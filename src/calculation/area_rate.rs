//! Pay calculation for area-rate workers.
//!
//! Area-rate workers are paid from a measurement taken over the current fixed
//! semi-monthly period. A missing measurement is reported back to the operator
//! rather than treated as zero pay.

use chrono::NaiveDate;

use crate::models::{
    CompensationType, MeasurementRecord, PayPeriod, PayoutFailure, PayoutLineItem, PayoutOutcome,
    Worker,
};

use super::period::fixed_biweekly_period;
use super::rate::resolve_unit_rate;

/// The message reported for a worker with no measurement in `period`.
///
/// # Example
///
/// ```
/// use site_payroll::calculation::missing_measurement_message;
/// use site_payroll::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
/// );
/// assert_eq!(
///     missing_measurement_message(&period),
///     "NO MEASUREMENT FOR PERIOD 2026-10-16 to 2026-10-31"
/// );
/// ```
pub fn missing_measurement_message(period: &PayPeriod) -> String {
    format!(
        "NO MEASUREMENT FOR PERIOD {} to {}",
        period.start_date.format("%Y-%m-%d"),
        period.end_date.format("%Y-%m-%d")
    )
}

/// Calculates an area-rate worker's pay for the fixed period containing `today`.
///
/// The first measurement whose bounds equal the period exactly is used. Its
/// precomputed total wins when present; otherwise the amount is quantity ×
/// unit rate, the unit rate falling back to the worker's default. A product
/// that does not fit in a decimal amount is reported as a failure.
pub fn calculate_area_rate_pay(
    worker: &Worker,
    measurements: &[MeasurementRecord],
    today: NaiveDate,
) -> PayoutOutcome {
    let period = fixed_biweekly_period(today);

    let Some(measurement) = measurements.iter().find(|m| m.matches_period(&period)) else {
        return PayoutOutcome::Failed(PayoutFailure {
            worker_id: worker.id.clone(),
            worker_name: worker.name.clone(),
            compensation_type: CompensationType::AreaRate,
            period,
            error: missing_measurement_message(&period),
        });
    };

    let unit_rate = resolve_unit_rate(measurement, worker).rate;
    let Some(amount) = measurement
        .total
        .or_else(|| measurement.quantity.checked_mul(unit_rate))
    else {
        return PayoutOutcome::Failed(PayoutFailure::amount_out_of_range(
            worker,
            CompensationType::AreaRate,
            period,
        ));
    };

    PayoutOutcome::Computed(PayoutLineItem {
        worker_id: worker.id.clone(),
        worker_name: worker.name.clone(),
        compensation_type: CompensationType::AreaRate,
        period,
        period_label: period.label(),
        amount,
        hours_total: None,
        quantity: Some(measurement.quantity),
        unit_rate: Some(unit_rate),
        payout_destination: worker.payout_destination.clone(),
    })
}
