//! Settlement period boundaries.
//!
//! Hourly workers are settled over a rolling weekly window that closes on their
//! cut weekday. Area-rate workers are settled over fixed semi-monthly windows:
//! the 1st to the 15th, and the 16th to the last day of the month. Every
//! function here takes `today` explicitly.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::PayPeriod;

/// The last day of the first semi-monthly window.
pub const FIRST_HALF_LAST_DAY: u32 = 15;

/// Returns the most recent date on or before `today` that falls on `cut_weekday`.
///
/// # Example
///
/// ```
/// use site_payroll::calculation::last_cut_date;
/// use chrono::{NaiveDate, Weekday};
///
/// // 2026-10-17 is a Saturday; the last Thursday is the 15th.
/// let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
/// assert_eq!(
///     last_cut_date(today, Weekday::Thu),
///     NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
/// );
/// // On the cut weekday itself, today is the cut date.
/// assert_eq!(last_cut_date(today, Weekday::Sat), today);
/// ```
pub fn last_cut_date(today: NaiveDate, cut_weekday: Weekday) -> NaiveDate {
    let today_index = today.weekday().num_days_from_sunday();
    let cut_index = cut_weekday.num_days_from_sunday();
    let days_back = (today_index + 7 - cut_index) % 7;
    today - Duration::days(i64::from(days_back))
}

/// Returns the cut date one week before [`last_cut_date`].
pub fn previous_cut_date(today: NaiveDate, cut_weekday: Weekday) -> NaiveDate {
    last_cut_date(today, cut_weekday) - Duration::days(7)
}

/// The weekly settlement window: previous cut date through last cut date.
///
/// Both ends are inclusive, so the window covers 8 calendar days and shares
/// its first day with the end of the window before it.
pub fn weekly_window(today: NaiveDate, cut_weekday: Weekday) -> PayPeriod {
    PayPeriod::new(
        previous_cut_date(today, cut_weekday),
        last_cut_date(today, cut_weekday),
    )
}

/// Returns the fixed semi-monthly period containing `today`.
///
/// # Example
///
/// ```
/// use site_payroll::calculation::fixed_biweekly_period;
/// use chrono::NaiveDate;
///
/// let period = fixed_biweekly_period(NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
/// assert_eq!(period.label(), "2026-02-16 a 2026-02-28");
/// ```
pub fn fixed_biweekly_period(today: NaiveDate) -> PayPeriod {
    let first_of_month = today - Duration::days(i64::from(today.day() - 1));
    let first_half_end = first_of_month + Duration::days(i64::from(FIRST_HALF_LAST_DAY - 1));

    if today.day() <= FIRST_HALF_LAST_DAY {
        PayPeriod::new(first_of_month, first_half_end)
    } else {
        PayPeriod::new(first_half_end + Duration::days(1), last_day_of_month(today))
    }
}

/// Returns the last calendar day of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .expect("first day of the following month is a valid date")
}
