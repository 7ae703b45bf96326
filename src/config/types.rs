//! Configuration types for the site payroll service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AttendanceRecord, CutWeekday, MeasurementRecord, Payment, Role, Site, Worker,
};

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_company_name() -> String {
    "Site Payroll".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Socket address to listen on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Settings the payroll engine and report read.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollSettings {
    /// Cut weekday for workers with none configured (Sunday = 0).
    #[serde(default)]
    pub default_cut_weekday: CutWeekday,
    /// Currency symbol printed on reports.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Header line printed on reports.
    #[serde(default = "default_company_name")]
    pub company_name: String,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            default_cut_weekday: CutWeekday::default(),
            currency_symbol: default_currency_symbol(),
            company_name: default_company_name(),
        }
    }
}

/// Contents of `payroll.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSettings,
    /// Payroll settings.
    #[serde(default)]
    pub payroll: PayrollSettings,
}

/// Contents of the optional `seed.yaml`: records loaded into a fresh store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Sites.
    #[serde(default)]
    pub sites: Vec<Site>,
    /// Workers.
    #[serde(default)]
    pub workers: Vec<Worker>,
    /// Roles.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// Measurements.
    #[serde(default)]
    pub measurements: Vec<MeasurementRecord>,
    /// Payments.
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl SeedData {
    /// Runs every record through its validator, naming the first offender.
    pub fn validate(&self) -> PayrollResult<()> {
        fn check<T>(
            kind: &str,
            rows: &[T],
            id: impl Fn(&T) -> &str,
            validate: impl Fn(&T) -> PayrollResult<()>,
        ) -> PayrollResult<()> {
            for row in rows {
                validate(row).map_err(|e| {
                    PayrollError::invalid(kind, format!("seed record '{}': {}", id(row), e))
                })?;
            }
            Ok(())
        }

        check("worker", &self.workers, |w| w.id.as_str(), Worker::validate)?;
        check("role", &self.roles, |r| r.id.as_str(), Role::validate)?;
        check(
            "attendance",
            &self.attendance,
            |a| a.id.as_str(),
            AttendanceRecord::validate,
        )?;
        check(
            "measurement",
            &self.measurements,
            |m| m.id.as_str(),
            MeasurementRecord::validate,
        )?;
        check("payment", &self.payments, |p| p.id.as_str(), Payment::validate)
    }
}
