//! Plain-text rendering of a payroll batch.
//!
//! This is the projection a document renderer consumes: one line per worker
//! with name, compensation type, amount and payout destination, then the
//! grand total. Amounts are rounded to two fraction digits here and nowhere
//! earlier.

use rust_decimal::Decimal;

use crate::config::PayrollSettings;
use crate::models::{PayoutOutcome, PayrollBatch};

/// Report title line.
pub const REPORT_TITLE: &str = "PAYROLL REPORT";

fn money(currency_symbol: &str, amount: Decimal) -> String {
    format!("{} {:.2}", currency_symbol, amount.round_dp(2))
}

/// Renders one batch item as a report line.
pub fn render_line(outcome: &PayoutOutcome, currency_symbol: &str) -> String {
    match outcome {
        PayoutOutcome::Computed(item) => format!(
            "{} | {} | {} | PIX: {}",
            item.worker_name,
            item.compensation_type,
            money(currency_symbol, item.amount),
            item.payout_destination.as_deref().unwrap_or("-")
        ),
        PayoutOutcome::Failed(failure) => format!(
            "{} | {} | {} | PIX: -",
            failure.worker_name, failure.compensation_type, failure.error
        ),
    }
}

/// Renders the full report for `batch`.
///
/// # Example
///
/// ```
/// use site_payroll::config::PayrollSettings;
/// use site_payroll::models::PayrollBatch;
/// use site_payroll::report::render_report;
/// use chrono::NaiveDate;
///
/// let batch = PayrollBatch::new(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
/// let report = render_report(&batch, &PayrollSettings::default());
/// assert!(report.ends_with("TOTAL: R$ 0.00\n"));
/// ```
pub fn render_report(batch: &PayrollBatch, settings: &PayrollSettings) -> String {
    let period = batch
        .header_period()
        .map(|period| period.label())
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        settings.company_name.clone(),
        REPORT_TITLE.to_string(),
        format!("Period: {}", period),
        format!("Computed on: {}", batch.computed_on.format("%Y-%m-%d")),
        String::new(),
    ];
    lines.extend(
        batch
            .items
            .iter()
            .map(|outcome| render_line(outcome, &settings.currency_symbol)),
    );
    lines.push(String::new());
    lines.push(format!(
        "TOTAL: {}",
        money(&settings.currency_symbol, batch.grand_total)
    ));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompensationType, PayPeriod, PayoutFailure, PayoutLineItem};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn sample_batch() -> PayrollBatch {
        let weekly = PayPeriod::new(make_date("2026-10-08"), make_date("2026-10-15"));
        let fixed = PayPeriod::new(make_date("2026-10-16"), make_date("2026-10-31"));

        let mut batch = PayrollBatch::new(make_date("2026-10-17"));
        batch.push(PayoutOutcome::Computed(PayoutLineItem {
            worker_id: "w-1".to_string(),
            worker_name: "Ana Souza".to_string(),
            compensation_type: CompensationType::Hourly,
            period: weekly,
            period_label: weekly.label(),
            amount: Decimal::from_str("66.666666").unwrap(),
            hours_total: Some(Decimal::new(6, 0)),
            quantity: None,
            unit_rate: None,
            payout_destination: Some("ana@pix".to_string()),
        }))
        .unwrap();
        batch.push(PayoutOutcome::Failed(PayoutFailure {
            worker_id: "w-2".to_string(),
            worker_name: "Bruno Lima".to_string(),
            compensation_type: CompensationType::AreaRate,
            period: fixed,
            error: "NO MEASUREMENT FOR PERIOD 2026-10-16 to 2026-10-31".to_string(),
        }))
        .unwrap();
        batch
    }

    #[test]
    fn test_report_lines() {
        let report = render_report(&sample_batch(), &PayrollSettings::default());
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "Site Payroll");
        assert_eq!(lines[1], REPORT_TITLE);
        assert_eq!(lines[2], "Period: 2026-10-08 a 2026-10-15");
        assert!(lines.contains(&"Ana Souza | hourly | R$ 66.67 | PIX: ana@pix"));
        assert!(lines.contains(
            &"Bruno Lima | area_rate | NO MEASUREMENT FOR PERIOD 2026-10-16 to 2026-10-31 | PIX: -"
        ));
        assert_eq!(lines.last(), Some(&"TOTAL: R$ 66.67"));
    }

    #[test]
    fn test_missing_destination_renders_dash() {
        let mut batch = sample_batch();
        if let PayoutOutcome::Computed(item) = &mut batch.items[0] {
            item.payout_destination = None;
        }

        let line = render_line(&batch.items[0], "R$");
        assert!(line.ends_with("PIX: -"));
    }

    #[test]
    fn test_whole_amounts_render_two_digits() {
        let settings = PayrollSettings {
            currency_symbol: "$".to_string(),
            ..PayrollSettings::default()
        };
        let mut batch = PayrollBatch::new(make_date("2026-10-17"));
        batch.grand_total = Decimal::new(120, 0);

        let report = render_report(&batch, &settings);
        assert!(report.contains("TOTAL: $ 120.00"));
        assert!(report.contains("Period: -"));
    }
}
