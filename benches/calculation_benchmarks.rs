//! Performance benchmarks for the payroll engine.
//!
//! Measures per-worker calculation and whole-roster batch computation against
//! the in-memory store:
//! - Single hourly worker, one week of attendance
//! - Batches of 10, 100 and 1000 workers (half hourly, half area rate)
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use tokio::runtime::Runtime;

use site_payroll::calculation::{calculate_hourly_pay, compute_batch};
use site_payroll::config::SeedData;
use site_payroll::models::{
    AttendanceRecord, CompensationType, CutWeekday, MeasurementRecord, Worker,
};
use site_payroll::store::InMemoryStore;

/// Saturday; the Thursday window is 2026-10-08 a 2026-10-15.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn create_worker(index: usize) -> Worker {
    let compensation_type = if index % 2 == 0 {
        CompensationType::Hourly
    } else {
        CompensationType::AreaRate
    };
    Worker {
        id: format!("w-{:04}", index),
        name: format!("Worker {:04}", index),
        compensation_type,
        cut_weekday: None,
        default_daily_rate: Some(Decimal::new(90, 0)),
        default_area_rate: Some(Decimal::new(25, 0)),
        payout_destination: Some(format!("worker{}@pix", index)),
        tax_id: None,
        email: None,
        phone: None,
        created_at: None,
    }
}

/// One record per day across the window, Thursday to Thursday.
fn create_week(worker_id: &str) -> Vec<AttendanceRecord> {
    let start = NaiveDate::from_ymd_opt(2026, 10, 8).unwrap();
    (0..8)
        .map(|offset| AttendanceRecord {
            id: format!("{}-{}", worker_id, offset),
            site_id: "s-1".to_string(),
            worker_id: worker_id.to_string(),
            date: start + Duration::days(offset),
            worked_hours: None,
            role_id: None,
            roles: vec![],
            amount: None,
            description: None,
            created_at: None,
        })
        .collect()
}

fn create_measurement(worker_id: &str) -> MeasurementRecord {
    MeasurementRecord {
        id: format!("m-{}", worker_id),
        worker_id: worker_id.to_string(),
        period_start: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        period_end: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        quantity: Decimal::new(40, 0),
        unit_rate: None,
        total: None,
        created_at: None,
    }
}

/// Builds a store with `worker_count` workers and their records.
fn create_store(worker_count: usize) -> InMemoryStore {
    let mut seed = SeedData::default();
    for index in 0..worker_count {
        let worker = create_worker(index);
        match worker.compensation_type {
            CompensationType::Hourly => seed.attendance.extend(create_week(&worker.id)),
            CompensationType::AreaRate => seed.measurements.push(create_measurement(&worker.id)),
        }
        seed.workers.push(worker);
    }
    InMemoryStore::from_seed(seed)
}

fn bench_hourly_worker(c: &mut Criterion) {
    let worker = create_worker(0);
    let records = create_week(&worker.id);

    c.bench_function("hourly_worker_one_week", |b| {
        b.iter(|| {
            calculate_hourly_pay(
                black_box(&worker),
                black_box(&records),
                today(),
                CutWeekday::THURSDAY,
            )
        })
    });
}

fn bench_batches(c: &mut Criterion) {
    let runtime = Runtime::new().expect("Failed to create Tokio runtime");
    let mut group = c.benchmark_group("payroll_batch");

    for worker_count in [10usize, 100, 1000] {
        let store = create_store(worker_count);
        group.throughput(Throughput::Elements(worker_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(worker_count),
            &store,
            |b, store| {
                b.to_async(&runtime)
                    .iter(|| async { compute_batch(store, today(), CutWeekday::THURSDAY).await })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_hourly_worker, bench_batches);
criterion_main!(benches);
