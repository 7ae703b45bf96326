//! Calculation logic for the payroll engine.
//!
//! This module contains the settlement-period arithmetic, rate resolution,
//! the hourly and area-rate pay calculators, and the aggregator that settles
//! the whole roster into a [`PayrollBatch`](crate::models::PayrollBatch).

mod aggregator;
mod area_rate;
mod hourly;
mod period;
mod rate;

pub use aggregator::{compute_batch, compute_worker, is_included};
pub use area_rate::{calculate_area_rate_pay, missing_measurement_message};
pub use hourly::{
    FRIDAY_STANDARD_HOURS, HourlyDayLine, HourlyPayResult, WEEKDAY_STANDARD_HOURS,
    calculate_hourly_pay, standard_hours, value_day,
};
pub use period::{
    FIRST_HALF_LAST_DAY, fixed_biweekly_period, last_cut_date, last_day_of_month,
    previous_cut_date, weekly_window,
};
pub use rate::{RateResolution, RateSource, resolve_daily_rate, resolve_unit_rate};
