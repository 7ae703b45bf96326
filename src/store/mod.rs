//! Access to the labor record store.
//!
//! The payroll engine only needs three reads, gathered in [`RosterSource`].
//! Everything else the service does with records (CRUD, the payment ledger,
//! persisted batches) goes through [`LaborStore`]. Both are async because the
//! production store is remote; [`InMemoryStore`] backs tests and local runs.

mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayrollResult;
use crate::models::{
    AttendanceRecord, AttendanceUpdate, BatchDraft, MeasurementRecord, NewAttendance,
    NewMeasurement, NewPayment, NewRole, NewSite, NewWorker, PayPeriod, Payment, PaymentUpdate,
    Role, SavedBatch, Site, SiteUpdate, Worker, WorkerUpdate,
};

pub use memory::InMemoryStore;

/// The reads the payroll engine performs.
///
/// Ordering is part of the contract: "first match" decisions downstream rely on it.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// All workers, ordered by name.
    async fn fetch_roster(&self) -> PayrollResult<Vec<Worker>>;

    /// A worker's attendance dated within `[from, to]`, ordered by date then
    /// insertion, each with its linked role joined into `roles`.
    async fn fetch_attendance(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PayrollResult<Vec<AttendanceRecord>>;

    /// The first measurement (in insertion order) whose bounds equal `period`.
    async fn fetch_measurement(
        &self,
        worker_id: &str,
        period: PayPeriod,
    ) -> PayrollResult<Option<MeasurementRecord>>;
}

/// Optional filters for listing attendance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceFilter {
    /// Only records on this site.
    #[serde(default)]
    pub site_id: Option<String>,
    /// Only records for this worker.
    #[serde(default)]
    pub worker_id: Option<String>,
}

/// Headline figures across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of sites.
    pub total_sites: usize,
    /// Number of workers.
    pub total_workers: usize,
    /// Sum of the values logged on attendance records.
    pub total_attendance_amount: Decimal,
    /// Sum of all payment amounts.
    pub total_payments_amount: Decimal,
}

/// Full record management on top of the engine reads.
#[async_trait]
pub trait LaborStore: RosterSource {
    /// All sites, newest first.
    async fn list_sites(&self) -> PayrollResult<Vec<Site>>;
    /// Creates a site.
    async fn create_site(&self, site: NewSite) -> PayrollResult<Site>;
    /// Updates a site.
    async fn update_site(&self, id: &str, update: SiteUpdate) -> PayrollResult<Site>;
    /// Deletes a site.
    async fn delete_site(&self, id: &str) -> PayrollResult<()>;

    /// Looks up one worker.
    async fn get_worker(&self, id: &str) -> PayrollResult<Worker>;
    /// Creates a worker.
    async fn create_worker(&self, worker: NewWorker) -> PayrollResult<Worker>;
    /// Updates a worker.
    async fn update_worker(&self, id: &str, update: WorkerUpdate) -> PayrollResult<Worker>;
    /// Deletes a worker.
    async fn delete_worker(&self, id: &str) -> PayrollResult<()>;

    /// All roles, ordered by name.
    async fn list_roles(&self) -> PayrollResult<Vec<Role>>;
    /// Creates a role.
    async fn create_role(&self, role: NewRole) -> PayrollResult<Role>;

    /// Attendance matching `filter`, newest date first.
    async fn list_attendance(&self, filter: AttendanceFilter) -> PayrollResult<Vec<AttendanceRecord>>;
    /// Logs a day of work.
    async fn create_attendance(&self, attendance: NewAttendance) -> PayrollResult<AttendanceRecord>;
    /// Updates an attendance record.
    async fn update_attendance(
        &self,
        id: &str,
        update: AttendanceUpdate,
    ) -> PayrollResult<AttendanceRecord>;
    /// Deletes an attendance record.
    async fn delete_attendance(&self, id: &str) -> PayrollResult<()>;

    /// Measurements, optionally for one worker, newest period first.
    async fn list_measurements(&self, worker_id: Option<&str>) -> PayrollResult<Vec<MeasurementRecord>>;
    /// Records a measurement.
    async fn create_measurement(&self, measurement: NewMeasurement) -> PayrollResult<MeasurementRecord>;

    /// Payments, optionally for one site, newest payment date first.
    async fn list_payments(&self, site_id: Option<&str>) -> PayrollResult<Vec<Payment>>;
    /// Records a payment.
    async fn create_payment(&self, payment: NewPayment) -> PayrollResult<Payment>;
    /// Updates a payment.
    async fn update_payment(&self, id: &str, update: PaymentUpdate) -> PayrollResult<Payment>;
    /// Deletes a payment.
    async fn delete_payment(&self, id: &str) -> PayrollResult<()>;
    /// Payments to `worker_id` dated within `period`, inclusive.
    async fn payments_in_period(&self, worker_id: &str, period: PayPeriod) -> PayrollResult<Vec<Payment>>;

    /// Writes a batch header and its child rows.
    async fn save_batch(&self, draft: BatchDraft) -> PayrollResult<SavedBatch>;
    /// Persisted batches, newest first.
    async fn list_batches(&self) -> PayrollResult<Vec<SavedBatch>>;

    /// Headline figures.
    async fn statistics(&self) -> PayrollResult<Statistics> {
        let sites = self.list_sites().await?;
        let workers = self.fetch_roster().await?;
        let attendance = self.list_attendance(AttendanceFilter::default()).await?;
        let payments = self.list_payments(None).await?;

        Ok(Statistics {
            total_sites: sites.len(),
            total_workers: workers.len(),
            total_attendance_amount: attendance.iter().filter_map(|a| a.amount).sum(),
            total_payments_amount: payments.iter().map(|p| p.amount).sum(),
        })
    }
}
