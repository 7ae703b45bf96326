//! Settlement period model.
//!
//! This module contains the [`PayPeriod`] type: an inclusive calendar date range
//! used both for an hourly worker's weekly window and for the fixed semi-monthly
//! window of area-rate workers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The separator between the two dates of a period label.
pub const PERIOD_LABEL_SEPARATOR: &str = " a ";

/// An inclusive date range over which a worker is settled.
///
/// # Example
///
/// ```
/// use site_payroll::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 10, 8).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 10, 8).unwrap())); // start date
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())); // end date
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())); // after
/// assert_eq!(period.label(), "2026-10-08 a 2026-10-15");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a period from its bounds.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Checks if a given date falls within this period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// The label shown on batches and reports: `"<start> a <end>"`, dates as `YYYY-MM-DD`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.start_date.format("%Y-%m-%d"),
            PERIOD_LABEL_SEPARATOR,
            self.end_date.format("%Y-%m-%d")
        )
    }
}
