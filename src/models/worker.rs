//! Worker model and related types.
//!
//! This module defines the [`Worker`] struct, its [`CompensationType`], and the
//! [`CutWeekday`] that anchors an hourly worker's weekly settlement window.

use chrono::{DateTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::limits::{MAX_RATE, check_bounds};

/// How a worker is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationType {
    /// Paid per logged day or hour against a daily rate.
    Hourly,
    /// Paid per measured quantity (e.g. square metres) against a unit rate.
    AreaRate,
}

impl std::fmt::Display for CompensationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompensationType::Hourly => write!(f, "hourly"),
            CompensationType::AreaRate => write!(f, "area_rate"),
        }
    }
}

/// The weekday on which an hourly worker's settlement window closes.
///
/// Stored as an index with Sunday = 0 through Saturday = 6. Values outside
/// that range are rejected on deserialization.
///
/// # Example
///
/// ```
/// use site_payroll::models::CutWeekday;
/// use chrono::Weekday;
///
/// assert_eq!(CutWeekday::THURSDAY.weekday(), Weekday::Thu);
/// assert_eq!(CutWeekday::try_from(0).unwrap().weekday(), Weekday::Sun);
/// assert!(CutWeekday::try_from(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CutWeekday(u8);

impl CutWeekday {
    /// Thursday, the cut weekday used when a worker has none configured.
    pub const THURSDAY: CutWeekday = CutWeekday(4);

    /// Returns the index, Sunday = 0.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Returns the corresponding chrono weekday.
    pub fn weekday(self) -> Weekday {
        match self.0 {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }
}

impl Default for CutWeekday {
    fn default() -> Self {
        Self::THURSDAY
    }
}

impl TryFrom<u8> for CutWeekday {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 6 {
            Ok(CutWeekday(value))
        } else {
            Err(format!("cut weekday must be between 0 and 6, got {}", value))
        }
    }
}

impl From<CutWeekday> for u8 {
    fn from(value: CutWeekday) -> Self {
        value.0
    }
}

impl From<Weekday> for CutWeekday {
    fn from(weekday: Weekday) -> Self {
        CutWeekday(weekday.num_days_from_sunday() as u8)
    }
}

/// A worker on the roster.
///
/// Created and edited through the record endpoints; the payroll engine only
/// reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// Display name, also the roster sort key.
    pub name: String,
    /// How this worker is paid.
    pub compensation_type: CompensationType,
    /// Weekday on which the weekly window closes. Falls back to the service default.
    #[serde(default)]
    pub cut_weekday: Option<CutWeekday>,
    /// Default daily rate for hourly workers.
    #[serde(default)]
    pub default_daily_rate: Option<Decimal>,
    /// Default unit rate for area-rate workers.
    #[serde(default)]
    pub default_area_rate: Option<Decimal>,
    /// Where payouts are routed (e.g. a PIX key).
    #[serde(default)]
    pub payout_destination: Option<String>,
    /// National tax id.
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Worker {
    /// Returns true if the worker is paid by time.
    pub fn is_hourly(&self) -> bool {
        self.compensation_type == CompensationType::Hourly
    }

    /// Returns the worker's cut weekday, or `default` when none is configured.
    pub fn cut_weekday_or(&self, default: CutWeekday) -> CutWeekday {
        self.cut_weekday.unwrap_or(default)
    }

    /// Checks the name and rates.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_name(&self.name)?;
        validate_rate("default_daily_rate", self.default_daily_rate)?;
        validate_rate("default_area_rate", self.default_area_rate)
    }
}

/// Fields for creating a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorker {
    /// Display name.
    pub name: String,
    /// How this worker is paid.
    pub compensation_type: CompensationType,
    /// Weekday on which the weekly window closes.
    #[serde(default)]
    pub cut_weekday: Option<CutWeekday>,
    /// Default daily rate.
    #[serde(default)]
    pub default_daily_rate: Option<Decimal>,
    /// Default unit rate.
    #[serde(default)]
    pub default_area_rate: Option<Decimal>,
    /// Payout routing key.
    #[serde(default)]
    pub payout_destination: Option<String>,
    /// National tax id.
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewWorker {
    /// Checks the name and rates.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_name(&self.name)?;
        validate_rate("default_daily_rate", self.default_daily_rate)?;
        validate_rate("default_area_rate", self.default_area_rate)
    }

    /// Builds the stored worker.
    pub fn into_worker(self, id: String, created_at: DateTime<Utc>) -> Worker {
        Worker {
            id,
            name: self.name,
            compensation_type: self.compensation_type,
            cut_weekday: self.cut_weekday,
            default_daily_rate: self.default_daily_rate,
            default_area_rate: self.default_area_rate,
            payout_destination: self.payout_destination,
            tax_id: self.tax_id,
            email: self.email,
            phone: self.phone,
            created_at: Some(created_at),
        }
    }
}

/// A partial update to a worker. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerUpdate {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New compensation type.
    #[serde(default)]
    pub compensation_type: Option<CompensationType>,
    /// New cut weekday.
    #[serde(default)]
    pub cut_weekday: Option<CutWeekday>,
    /// New default daily rate.
    #[serde(default)]
    pub default_daily_rate: Option<Decimal>,
    /// New default unit rate.
    #[serde(default)]
    pub default_area_rate: Option<Decimal>,
    /// New payout routing key.
    #[serde(default)]
    pub payout_destination: Option<String>,
    /// New tax id.
    #[serde(default)]
    pub tax_id: Option<String>,
    /// New email.
    #[serde(default)]
    pub email: Option<String>,
    /// New phone.
    #[serde(default)]
    pub phone: Option<String>,
}

impl WorkerUpdate {
    /// Validates the supplied fields and applies them to `worker`.
    pub fn apply_to(self, worker: &mut Worker) -> PayrollResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_rate("default_daily_rate", self.default_daily_rate)?;
        validate_rate("default_area_rate", self.default_area_rate)?;

        if let Some(name) = self.name {
            worker.name = name;
        }
        if let Some(compensation_type) = self.compensation_type {
            worker.compensation_type = compensation_type;
        }
        if self.cut_weekday.is_some() {
            worker.cut_weekday = self.cut_weekday;
        }
        if self.default_daily_rate.is_some() {
            worker.default_daily_rate = self.default_daily_rate;
        }
        if self.default_area_rate.is_some() {
            worker.default_area_rate = self.default_area_rate;
        }
        if self.payout_destination.is_some() {
            worker.payout_destination = self.payout_destination;
        }
        if self.tax_id.is_some() {
            worker.tax_id = self.tax_id;
        }
        if self.email.is_some() {
            worker.email = self.email;
        }
        if self.phone.is_some() {
            worker.phone = self.phone;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> PayrollResult<()> {
    if name.trim().is_empty() {
        return Err(PayrollError::InvalidWorker {
            field: "name".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_rate(field: &str, rate: Option<Decimal>) -> PayrollResult<()> {
    match rate {
        Some(rate) => check_bounds(rate, MAX_RATE).map_err(|message| PayrollError::InvalidWorker {
            field: field.to_string(),
            message,
        }),
        None => Ok(()),
    }
}
