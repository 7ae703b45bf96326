//! Core data models for the site payroll service.
//!
//! This module contains the labor records (sites, workers, attendance,
//! measurements, payments) and the payroll engine's output types.

mod attendance;
mod limits;
mod measurement;
mod pay_period;
mod payment;
mod payout;
mod site;
mod worker;

pub use attendance::{AttendanceRecord, AttendanceUpdate, NewAttendance, NewRole, Role, RoleLink};
pub use limits::{MAX_AMOUNT, MAX_QUANTITY, MAX_RATE, MAX_WORKED_HOURS};
pub use measurement::{MeasurementRecord, NewMeasurement};
pub use pay_period::{PERIOD_LABEL_SEPARATOR, PayPeriod};
pub use payment::{NewPayment, Payment, PaymentMethod, PaymentStatus, PaymentUpdate};
pub use payout::{
    BatchDraft, BatchStatus, PayoutFailure, PayoutLineItem, PayoutOutcome, PayrollBatch,
    SavedBatch, SavedBatchItem,
};
pub use site::{NewSite, Site, SiteUpdate};
pub use worker::{CompensationType, CutWeekday, NewWorker, Worker, WorkerUpdate};
