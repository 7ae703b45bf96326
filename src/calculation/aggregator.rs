//! Batch computation across the whole roster.
//!
//! Workers are settled one at a time in roster order. Per-worker problems
//! (a missing measurement, an amount out of range) become [`PayoutOutcome::Failed`] entries; only a
//! failing read from the [`RosterSource`] aborts the batch.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::PayrollResult;
use crate::models::{CompensationType, CutWeekday, PayoutOutcome, PayrollBatch, Worker};
use crate::store::RosterSource;

use super::area_rate::calculate_area_rate_pay;
use super::hourly::calculate_hourly_pay;
use super::period::{fixed_biweekly_period, weekly_window};

/// Settles a single worker, dispatching on their compensation type.
pub async fn compute_worker<S>(
    source: &S,
    worker: &Worker,
    today: NaiveDate,
    default_cut_weekday: CutWeekday,
) -> PayrollResult<PayoutOutcome>
where
    S: RosterSource + ?Sized,
{
    match worker.compensation_type {
        CompensationType::Hourly => {
            let window = weekly_window(today, worker.cut_weekday_or(default_cut_weekday).weekday());
            let records = source
                .fetch_attendance(&worker.id, window.start_date, window.end_date)
                .await?;
            Ok(
                match calculate_hourly_pay(worker, &records, today, default_cut_weekday) {
                    Ok(result) => PayoutOutcome::Computed(result.line_item),
                    Err(failure) => PayoutOutcome::Failed(failure),
                },
            )
        }
        CompensationType::AreaRate => {
            let period = fixed_biweekly_period(today);
            let measurement = source.fetch_measurement(&worker.id, period).await?;
            let measurements: Vec<_> = measurement.into_iter().collect();
            Ok(calculate_area_rate_pay(worker, &measurements, today))
        }
    }
}

/// Whether an outcome belongs in the batch: failures always, computed pay only when non-zero.
pub fn is_included(outcome: &PayoutOutcome) -> bool {
    match outcome {
        PayoutOutcome::Computed(item) => item.amount != Decimal::ZERO,
        PayoutOutcome::Failed(_) => true,
    }
}

/// Computes the payroll batch for `today`.
///
/// # Errors
///
/// Returns the first error raised while reading the roster or any worker's
/// records, or [`crate::error::PayrollError::AmountOutOfRange`] when the grand
/// total overflows. Nothing is partially returned in that case.
pub async fn compute_batch<S>(
    source: &S,
    today: NaiveDate,
    default_cut_weekday: CutWeekday,
) -> PayrollResult<PayrollBatch>
where
    S: RosterSource + ?Sized,
{
    let start = Instant::now();
    let roster = source.fetch_roster().await?;

    let mut batch = PayrollBatch::new(today);
    for worker in &roster {
        let outcome = compute_worker(source, worker, today, default_cut_weekday).await?;

        if is_included(&outcome) {
            tracing::debug!(
                worker_id = %worker.id,
                failed = outcome.is_failed(),
                "Worker included in batch"
            );
            batch.push(outcome)?;
        } else {
            tracing::debug!(worker_id = %worker.id, "Worker omitted with zero amount");
        }
    }

    tracing::info!(
        computed_on = %today,
        roster_size = roster.len(),
        items = batch.items.len(),
        failures = batch.failures().count(),
        grand_total = %batch.grand_total,
        duration_us = start.elapsed().as_micros() as u64,
        "Payroll batch computed"
    );

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayrollError;
    use crate::models::{AttendanceRecord, MeasurementRecord, PayPeriod};
    use async_trait::async_trait;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    // Saturday; Thursday window 2026-10-08 a 2026-10-15, fixed period 2026-10-16 a 2026-10-31.
    fn today() -> NaiveDate {
        make_date("2026-10-17")
    }

    #[derive(Default)]
    struct FakeSource {
        workers: Vec<Worker>,
        attendance: Vec<AttendanceRecord>,
        measurements: Vec<MeasurementRecord>,
        roster_down: bool,
        records_down: bool,
    }

    #[async_trait]
    impl RosterSource for FakeSource {
        async fn fetch_roster(&self) -> PayrollResult<Vec<Worker>> {
            if self.roster_down {
                return Err(PayrollError::StoreUnavailable {
                    message: "connection refused".to_string(),
                });
            }
            Ok(self.workers.clone())
        }

        async fn fetch_attendance(
            &self,
            worker_id: &str,
            from: NaiveDate,
            to: NaiveDate,
        ) -> PayrollResult<Vec<AttendanceRecord>> {
            if self.records_down {
                return Err(PayrollError::StoreUnavailable {
                    message: "timeout".to_string(),
                });
            }
            Ok(self
                .attendance
                .iter()
                .filter(|a| a.worker_id == worker_id && a.date >= from && a.date <= to)
                .cloned()
                .collect())
        }

        async fn fetch_measurement(
            &self,
            worker_id: &str,
            period: PayPeriod,
        ) -> PayrollResult<Option<MeasurementRecord>> {
            Ok(self
                .measurements
                .iter()
                .find(|m| m.worker_id == worker_id && m.matches_period(&period))
                .cloned())
        }
    }

    fn worker(id: &str, name: &str, compensation_type: CompensationType) -> Worker {
        Worker {
            id: id.to_string(),
            name: name.to_string(),
            compensation_type,
            cut_weekday: None,
            default_daily_rate: Some(Decimal::new(90, 0)),
            default_area_rate: Some(Decimal::new(25, 0)),
            payout_destination: None,
            tax_id: None,
            email: None,
            phone: None,
            created_at: None,
        }
    }

    fn attendance(worker_id: &str, date: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: format!("{}-{}", worker_id, date),
            site_id: "s-1".to_string(),
            worker_id: worker_id.to_string(),
            date: make_date(date),
            worked_hours: None,
            role_id: None,
            roles: vec![],
            amount: None,
            description: None,
            created_at: None,
        }
    }

    fn three_worker_source() -> FakeSource {
        let mut long_day = attendance("w-3", "2026-10-13");
        long_day.worked_hours = Some(Decimal::new(12, 0));

        FakeSource {
            workers: vec![
                worker("w-1", "Ana", CompensationType::Hourly),
                worker("w-2", "Bruno", CompensationType::AreaRate),
                worker("w-3", "Carla", CompensationType::Hourly),
            ],
            // Carla: 12 hours on a Tuesday at 90 / 9 = 120. Ana's only record is outside the window.
            attendance: vec![attendance("w-1", "2026-10-01"), long_day],
            ..FakeSource::default()
        }
    }

    #[tokio::test]
    async fn test_three_worker_roster() {
        let source = three_worker_source();
        let batch = compute_batch(&source, today(), CutWeekday::THURSDAY).await.unwrap();

        assert_eq!(batch.items.len(), 2);
        assert_eq!(batch.grand_total, Decimal::new(120, 0));

        assert!(batch.items[0].is_failed());
        assert_eq!(batch.items[0].worker_name(), "Bruno");
        assert_eq!(batch.items[1].worker_name(), "Carla");
        assert_eq!(batch.items[1].amount(), Some(Decimal::new(120, 0)));
    }

    #[tokio::test]
    async fn test_failure_carries_period_bounds() {
        let source = three_worker_source();
        let batch = compute_batch(&source, today(), CutWeekday::THURSDAY).await.unwrap();

        let failure = batch.failures().next().unwrap();
        assert!(failure.error.contains("2026-10-16"));
        assert!(failure.error.contains("2026-10-31"));
    }

    #[tokio::test]
    async fn test_zero_area_rate_amount_is_omitted() {
        let mut source = FakeSource {
            workers: vec![worker("w-2", "Bruno", CompensationType::AreaRate)],
            ..FakeSource::default()
        };
        source.measurements.push(MeasurementRecord {
            id: "m-1".to_string(),
            worker_id: "w-2".to_string(),
            period_start: make_date("2026-10-16"),
            period_end: make_date("2026-10-31"),
            quantity: Decimal::ZERO,
            unit_rate: None,
            total: None,
            created_at: None,
        });

        let batch = compute_batch(&source, today(), CutWeekday::THURSDAY).await.unwrap();
        assert!(batch.items.is_empty());
        assert_eq!(batch.grand_total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_out_of_range_worker_is_reported_not_fatal() {
        let mut zeca = worker("w-9", "Zeca", CompensationType::Hourly);
        zeca.default_daily_rate = Some(Decimal::from_i128_with_scale(10_i128.pow(20), 0));
        let mut huge_day = attendance("w-9", "2026-10-13");
        huge_day.worked_hours = Some(Decimal::new(10_000_000_000, 0));

        let mut source = three_worker_source();
        source.workers.push(zeca);
        source.attendance.push(huge_day);

        let batch = compute_batch(&source, today(), CutWeekday::THURSDAY).await.unwrap();

        assert_eq!(batch.items.len(), 3);
        assert_eq!(batch.grand_total, Decimal::new(120, 0));
        let failure = batch.failures().find(|f| f.worker_id == "w-9").unwrap();
        assert!(failure.error.starts_with("AMOUNT OUT OF RANGE"));
    }

    #[tokio::test]
    async fn test_roster_failure_is_fatal() {
        let source = FakeSource {
            roster_down: true,
            ..three_worker_source()
        };

        let result = compute_batch(&source, today(), CutWeekday::THURSDAY).await;
        assert!(matches!(result, Err(PayrollError::StoreUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_record_fetch_failure_is_fatal() {
        let source = FakeSource {
            records_down: true,
            ..three_worker_source()
        };

        let result = compute_batch(&source, today(), CutWeekday::THURSDAY).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_batch_is_idempotent() {
        let source = three_worker_source();
        let first = compute_batch(&source, today(), CutWeekday::THURSDAY).await.unwrap();
        let second = compute_batch(&source, today(), CutWeekday::THURSDAY).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_worker_cut_weekday_overrides_default() {
        let mut ana = worker("w-1", "Ana", CompensationType::Hourly);
        // Friday cut: window 2026-10-09 a 2026-10-16.
        ana.cut_weekday = Some(CutWeekday::try_from(5u8).unwrap());
        let source = FakeSource {
            workers: vec![ana],
            attendance: vec![attendance("w-1", "2026-10-16")],
            ..FakeSource::default()
        };

        let batch = compute_batch(&source, today(), CutWeekday::THURSDAY).await.unwrap();
        assert_eq!(batch.items.len(), 1);
        // Friday with no hours: the full daily rate.
        assert_eq!(batch.grand_total, Decimal::new(90, 0));
    }

    #[test]
    fn test_is_included() {
        let failed = PayoutOutcome::Failed(crate::models::PayoutFailure {
            worker_id: "w".to_string(),
            worker_name: "W".to_string(),
            compensation_type: CompensationType::AreaRate,
            period: fixed_biweekly_period(today()),
            error: "missing".to_string(),
        });
        assert!(is_included(&failed));
    }
}
