//! Labor records and payroll computation for construction sites.
//!
//! This crate keeps sites, workers, attendance, measurements and payments,
//! and computes what each worker is owed for the current settlement period:
//! hourly workers over a weekly window anchored to a cut weekday, area-rate
//! contractors over a fixed semi-monthly period.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod store;
