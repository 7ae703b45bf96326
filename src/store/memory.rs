//! In-process implementation of the record store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::config::SeedData;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AttendanceRecord, AttendanceUpdate, BatchDraft, MeasurementRecord, NewAttendance,
    NewMeasurement, NewPayment, NewRole, NewSite, NewWorker, PayPeriod, Payment, PaymentUpdate,
    Role, RoleLink, SavedBatch, Site, SiteUpdate, Worker, WorkerUpdate,
};

use super::{AttendanceFilter, LaborStore, RosterSource};

#[derive(Debug, Default)]
struct Tables {
    sites: Vec<Site>,
    workers: Vec<Worker>,
    roles: Vec<Role>,
    attendance: Vec<AttendanceRecord>,
    measurements: Vec<MeasurementRecord>,
    payments: Vec<Payment>,
    batches: Vec<SavedBatch>,
}

impl Tables {
    fn require_worker(&self, id: &str) -> PayrollResult<()> {
        if self.workers.iter().any(|w| w.id == id) {
            Ok(())
        } else {
            Err(PayrollError::not_found("worker", id))
        }
    }

    fn require_site(&self, id: &str) -> PayrollResult<()> {
        if self.sites.iter().any(|s| s.id == id) {
            Ok(())
        } else {
            Err(PayrollError::not_found("site", id))
        }
    }

    fn require_role(&self, id: Option<&str>) -> PayrollResult<()> {
        match id {
            Some(id) if !self.roles.iter().any(|r| r.id == id) => {
                Err(PayrollError::not_found("role", id))
            }
            _ => Ok(()),
        }
    }

    fn join_role(&self, record: &AttendanceRecord) -> AttendanceRecord {
        let mut joined = record.clone();
        joined.roles = record
            .role_id
            .as_deref()
            .and_then(|role_id| self.roles.iter().find(|r| r.id == role_id))
            .map(|role| vec![RoleLink::from(role)])
            .unwrap_or_default();
        joined
    }
}

/// Holds every table in memory behind a single lock.
///
/// # Example
///
/// ```
/// use site_payroll::store::{InMemoryStore, RosterSource};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let store = InMemoryStore::new();
/// let roster = runtime.block_on(store.fetch_roster()).unwrap();
/// assert!(roster.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `seed`.
    pub fn from_seed(seed: SeedData) -> Self {
        Self {
            tables: RwLock::new(Tables {
                sites: seed.sites,
                workers: seed.workers,
                roles: seed.roles,
                attendance: seed.attendance,
                measurements: seed.measurements,
                payments: seed.payments,
                batches: Vec::new(),
            }),
        }
    }

    fn read(&self) -> PayrollResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| PayrollError::StoreUnavailable {
            message: "store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> PayrollResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| PayrollError::StoreUnavailable {
            message: "store lock poisoned".to_string(),
        })
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn find_mut<'a, T>(
    rows: &'a mut [T],
    entity: &str,
    id: &str,
    key: impl Fn(&T) -> &str,
) -> PayrollResult<&'a mut T> {
    rows.iter_mut()
        .find(|row| key(&**row) == id)
        .ok_or_else(|| PayrollError::not_found(entity, id))
}

fn remove<T>(rows: &mut Vec<T>, entity: &str, id: &str, key: impl Fn(&T) -> &str) -> PayrollResult<()> {
    let before = rows.len();
    rows.retain(|row| key(row) != id);
    if rows.len() == before {
        return Err(PayrollError::not_found(entity, id));
    }
    Ok(())
}

#[async_trait]
impl RosterSource for InMemoryStore {
    async fn fetch_roster(&self) -> PayrollResult<Vec<Worker>> {
        let mut workers = self.read()?.workers.clone();
        workers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(workers)
    }

    async fn fetch_attendance(
        &self,
        worker_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> PayrollResult<Vec<AttendanceRecord>> {
        let tables = self.read()?;
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .iter()
            .filter(|a| a.worker_id == worker_id && a.date >= from && a.date <= to)
            .map(|a| tables.join_role(a))
            .collect();
        records.sort_by_key(|a| a.date);
        Ok(records)
    }

    async fn fetch_measurement(
        &self,
        worker_id: &str,
        period: PayPeriod,
    ) -> PayrollResult<Option<MeasurementRecord>> {
        Ok(self
            .read()?
            .measurements
            .iter()
            .find(|m| m.worker_id == worker_id && m.matches_period(&period))
            .cloned())
    }
}

#[async_trait]
impl LaborStore for InMemoryStore {
    async fn list_sites(&self) -> PayrollResult<Vec<Site>> {
        let mut sites = self.read()?.sites.clone();
        sites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sites)
    }

    async fn create_site(&self, site: NewSite) -> PayrollResult<Site> {
        site.validate()?;
        let site = site.into_site(new_id(), Utc::now());
        self.write()?.sites.push(site.clone());
        Ok(site)
    }

    async fn update_site(&self, id: &str, update: SiteUpdate) -> PayrollResult<Site> {
        let mut tables = self.write()?;
        let site = find_mut(&mut tables.sites, "site", id, |s| s.id.as_str())?;
        update.apply_to(site)?;
        Ok(site.clone())
    }

    async fn delete_site(&self, id: &str) -> PayrollResult<()> {
        remove(&mut self.write()?.sites, "site", id, |s| s.id.as_str())
    }

    async fn get_worker(&self, id: &str) -> PayrollResult<Worker> {
        self.read()?
            .workers
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("worker", id))
    }

    async fn create_worker(&self, worker: NewWorker) -> PayrollResult<Worker> {
        worker.validate()?;
        let worker = worker.into_worker(new_id(), Utc::now());
        self.write()?.workers.push(worker.clone());
        Ok(worker)
    }

    async fn update_worker(&self, id: &str, update: WorkerUpdate) -> PayrollResult<Worker> {
        let mut tables = self.write()?;
        let worker = find_mut(&mut tables.workers, "worker", id, |w| w.id.as_str())?;
        update.apply_to(worker)?;
        Ok(worker.clone())
    }

    async fn delete_worker(&self, id: &str) -> PayrollResult<()> {
        remove(&mut self.write()?.workers, "worker", id, |w| w.id.as_str())
    }

    async fn list_roles(&self) -> PayrollResult<Vec<Role>> {
        let mut roles = self.read()?.roles.clone();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create_role(&self, role: NewRole) -> PayrollResult<Role> {
        role.validate()?;
        let role = Role {
            id: new_id(),
            name: role.name,
            daily_rate: role.daily_rate,
        };
        self.write()?.roles.push(role.clone());
        Ok(role)
    }

    async fn list_attendance(&self, filter: AttendanceFilter) -> PayrollResult<Vec<AttendanceRecord>> {
        let tables = self.read()?;
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .iter()
            .filter(|a| filter.site_id.as_ref().is_none_or(|site_id| &a.site_id == site_id))
            .filter(|a| filter.worker_id.as_ref().is_none_or(|worker_id| &a.worker_id == worker_id))
            .map(|a| tables.join_role(a))
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn create_attendance(&self, attendance: NewAttendance) -> PayrollResult<AttendanceRecord> {
        attendance.validate()?;
        let mut tables = self.write()?;
        tables.require_worker(&attendance.worker_id)?;
        tables.require_site(&attendance.site_id)?;
        tables.require_role(attendance.role_id.as_deref())?;

        let record = attendance.into_record(new_id(), Utc::now());
        tables.attendance.push(record.clone());
        Ok(tables.join_role(&record))
    }

    async fn update_attendance(
        &self,
        id: &str,
        update: AttendanceUpdate,
    ) -> PayrollResult<AttendanceRecord> {
        let mut tables = self.write()?;
        if let Some(site_id) = &update.site_id {
            tables.require_site(site_id)?;
        }
        tables.require_role(update.role_id.as_deref())?;

        let record = find_mut(&mut tables.attendance, "attendance", id, |a| a.id.as_str())?;
        update.apply_to(record)?;
        let record = record.clone();
        Ok(tables.join_role(&record))
    }

    async fn delete_attendance(&self, id: &str) -> PayrollResult<()> {
        remove(&mut self.write()?.attendance, "attendance", id, |a| a.id.as_str())
    }

    async fn list_measurements(&self, worker_id: Option<&str>) -> PayrollResult<Vec<MeasurementRecord>> {
        let mut measurements: Vec<MeasurementRecord> = self
            .read()?
            .measurements
            .iter()
            .filter(|m| worker_id.is_none_or(|worker_id| m.worker_id == worker_id))
            .cloned()
            .collect();
        measurements.sort_by(|a, b| b.period_start.cmp(&a.period_start));
        Ok(measurements)
    }

    async fn create_measurement(&self, measurement: NewMeasurement) -> PayrollResult<MeasurementRecord> {
        measurement.validate()?;
        let mut tables = self.write()?;
        tables.require_worker(&measurement.worker_id)?;

        let record = measurement.into_record(new_id(), Utc::now());
        tables.measurements.push(record.clone());
        Ok(record)
    }

    async fn list_payments(&self, site_id: Option<&str>) -> PayrollResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .read()?
            .payments
            .iter()
            .filter(|p| site_id.is_none_or(|site_id| p.site_id == site_id))
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        Ok(payments)
    }

    async fn create_payment(&self, payment: NewPayment) -> PayrollResult<Payment> {
        payment.validate()?;
        let mut tables = self.write()?;
        tables.require_worker(&payment.worker_id)?;
        tables.require_site(&payment.site_id)?;

        let payment = payment.into_payment(new_id(), Utc::now());
        tables.payments.push(payment.clone());
        Ok(payment)
    }

    async fn update_payment(&self, id: &str, update: PaymentUpdate) -> PayrollResult<Payment> {
        let mut tables = self.write()?;
        if let Some(site_id) = &update.site_id {
            tables.require_site(site_id)?;
        }
        let payment = find_mut(&mut tables.payments, "payment", id, |p| p.id.as_str())?;
        update.apply_to(payment)?;
        Ok(payment.clone())
    }

    async fn delete_payment(&self, id: &str) -> PayrollResult<()> {
        remove(&mut self.write()?.payments, "payment", id, |p| p.id.as_str())
    }

    async fn payments_in_period(&self, worker_id: &str, period: PayPeriod) -> PayrollResult<Vec<Payment>> {
        Ok(self
            .read()?
            .payments
            .iter()
            .filter(|p| p.worker_id == worker_id && period.contains_date(p.payment_date))
            .cloned()
            .collect())
    }

    async fn save_batch(&self, draft: BatchDraft) -> PayrollResult<SavedBatch> {
        let batch = SavedBatch::from_draft(draft, new_id(), Utc::now());
        self.write()?.batches.push(batch.clone());
        Ok(batch)
    }

    async fn list_batches(&self) -> PayrollResult<Vec<SavedBatch>> {
        let mut batches = self.read()?.batches.clone();
        batches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(batches)
    }
}
