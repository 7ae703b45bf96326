//! Pay calculation for hourly workers.
//!
//! An hourly worker is paid per logged day over their weekly settlement window.
//! Each day is valued from a base daily rate scaled by the hours worked against
//! the standard hours of that weekday.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::models::{
    AttendanceRecord, CompensationType, CutWeekday, PayoutFailure, PayoutLineItem, Worker,
};

use super::period::weekly_window;
use super::rate::{RateResolution, resolve_daily_rate};

/// Standard hours for Monday through Thursday.
pub const WEEKDAY_STANDARD_HOURS: Decimal = Decimal::from_parts(9, 0, 0, false, 0);

/// Standard hours for Friday.
pub const FRIDAY_STANDARD_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Returns the standard hours of a working day on `weekday`; zero at weekends.
pub fn standard_hours(weekday: Weekday) -> Decimal {
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => WEEKDAY_STANDARD_HOURS,
        Weekday::Fri => FRIDAY_STANDARD_HOURS,
        Weekday::Sat | Weekday::Sun => Decimal::ZERO,
    }
}

/// How one attendance record was valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyDayLine {
    /// The date worked.
    pub date: NaiveDate,
    /// Standard hours for that weekday.
    pub standard_hours: Decimal,
    /// Hours counted: the logged value, or the standard hours when none was logged.
    pub worked_hours: Decimal,
    /// The base daily rate and where it came from.
    pub daily_rate: RateResolution,
    /// Value of the day.
    pub amount: Decimal,
}

/// The result of settling one hourly worker.
#[derive(Debug, Clone)]
pub struct HourlyPayResult {
    /// The line item for the batch. An amount of zero means nothing is payable.
    pub line_item: PayoutLineItem,
    /// Per-day breakdown in record order.
    pub days: Vec<HourlyDayLine>,
}

/// Values a single attendance record.
///
/// With standard hours for the weekday, the day is paid pro rata:
/// `daily_rate * worked_hours / standard_hours`. At weekends there are no
/// standard hours and the day is paid as `daily_rate * worked_hours`, counting
/// a day logged without hours as one unit of the daily rate.
///
/// Returns `None` when the amount does not fit in a [`Decimal`].
pub fn value_day(record: &AttendanceRecord, worker: &Worker) -> Option<HourlyDayLine> {
    let daily_rate = resolve_daily_rate(record, worker);
    let standard = standard_hours(record.date.weekday());
    let worked = record.worked_hours.unwrap_or(standard);

    let amount = if standard > Decimal::ZERO {
        // Multiply first so a full standard day comes back as exactly the daily rate.
        daily_rate.rate.checked_mul(worked)?.checked_div(standard)?
    } else {
        // TODO: confirm with payroll owners whether weekend days should be prorated instead.
        let units = if worked.is_zero() { Decimal::ONE } else { worked };
        daily_rate.rate.checked_mul(units)?
    };

    Some(HourlyDayLine {
        date: record.date,
        standard_hours: standard,
        worked_hours: worked,
        daily_rate,
        amount,
    })
}

fn checked_sum(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.fold(Some(Decimal::ZERO), |total, value| total?.checked_add(value))
}

/// Calculates an hourly worker's pay for the window ending on their last cut date.
///
/// Records dated outside the window are ignored. `default_cut_weekday` applies
/// when the worker has none configured.
///
/// # Errors
///
/// Returns a [`PayoutFailure`] for the window when any day, or the sum of the
/// days, does not fit in a [`Decimal`].
///
/// # Example
///
/// ```
/// use site_payroll::calculation::calculate_hourly_pay;
/// use site_payroll::models::{AttendanceRecord, CompensationType, CutWeekday, Worker};
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
/// // A Tuesday inside the window 2026-10-08 a 2026-10-15.
/// let record = AttendanceRecord {
///     id: "a-1".to_string(),
///     site_id: "s-1".to_string(),
///     worker_id: "w-1".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(),
///     worked_hours: None,
///     role_id: None,
///     roles: vec![],
///     amount: None,
///     description: None,
///     created_at: None,
/// };
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
/// let result = calculate_hourly_pay(&worker, &[record], today, CutWeekday::THURSDAY).unwrap();
/// assert_eq!(result.line_item.amount, Decimal::new(90, 0));
/// assert_eq!(result.line_item.hours_total, Some(Decimal::new(9, 0)));
/// assert_eq!(result.line_item.period_label, "2026-10-08 a 2026-10-15");
/// ```
pub fn calculate_hourly_pay(
    worker: &Worker,
    records: &[AttendanceRecord],
    today: NaiveDate,
    default_cut_weekday: CutWeekday,
) -> Result<HourlyPayResult, PayoutFailure> {
    let period = weekly_window(today, worker.cut_weekday_or(default_cut_weekday).weekday());
    let out_of_range =
        || PayoutFailure::amount_out_of_range(worker, CompensationType::Hourly, period);

    let days: Vec<HourlyDayLine> = records
        .iter()
        .filter(|record| period.contains_date(record.date))
        .map(|record| value_day(record, worker))
        .collect::<Option<_>>()
        .ok_or_else(out_of_range)?;

    let amount = checked_sum(days.iter().map(|day| day.amount)).ok_or_else(out_of_range)?;
    let hours_total =
        checked_sum(days.iter().map(|day| day.worked_hours)).ok_or_else(out_of_range)?;

    Ok(HourlyPayResult {
        line_item: PayoutLineItem {
            worker_id: worker.id.clone(),
            worker_name: worker.name.clone(),
            compensation_type: CompensationType::Hourly,
            period,
            period_label: period.label(),
            amount,
            hours_total: Some(hours_total),
            quantity: None,
            unit_rate: None,
            payout_destination: worker.payout_destination.clone(),
        },
        days,
    })
}
