//! Disbursement records.
//!
//! A [`Payment`] is money actually paid (or scheduled to be paid) to a worker.
//! Payroll batches produce payments; the duplicate-check gate looks them up by
//! worker and date range.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::limits::MAX_AMOUNT;

/// How a payment is made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant transfer to a PIX key.
    #[default]
    Pix,
    /// Cash in hand.
    Cash,
    /// Bank deposit.
    Deposit,
    /// Bank transfer.
    Transfer,
}

/// Lifecycle of a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Recorded, not yet paid.
    #[default]
    Pending,
    /// Paid out.
    Paid,
    /// Cancelled.
    Cancelled,
}

/// A disbursement to a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for the payment.
    pub id: String,
    /// Site the payment is booked against.
    pub site_id: String,
    /// The worker paid.
    pub worker_id: String,
    /// Amount paid.
    pub amount: Decimal,
    /// Date of payment.
    pub payment_date: NaiveDate,
    /// How it is paid.
    pub method: PaymentMethod,
    /// Where it is in its lifecycle.
    pub status: PaymentStatus,
    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Checks every rule and reports all violations in one error.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_payment(&self.site_id, &self.worker_id, self.amount)
    }
}

/// Fields for creating a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayment {
    /// Site the payment is booked against.
    pub site_id: String,
    /// The worker paid.
    pub worker_id: String,
    /// Amount paid. Must be greater than zero.
    pub amount: Decimal,
    /// Date of payment.
    pub payment_date: NaiveDate,
    /// Defaults to PIX.
    #[serde(default)]
    pub method: PaymentMethod,
    /// Defaults to pending.
    #[serde(default)]
    pub status: PaymentStatus,
}

impl NewPayment {
    /// Checks every rule and reports all violations in one error.
    ///
    /// # Example
    ///
    /// ```
    /// use site_payroll::models::{NewPayment, PaymentMethod, PaymentStatus};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let payment = NewPayment {
    ///     site_id: String::new(),
    ///     worker_id: "w-1".to_string(),
    ///     amount: Decimal::ZERO,
    ///     payment_date: NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
    ///     method: PaymentMethod::Pix,
    ///     status: PaymentStatus::Pending,
    /// };
    /// let error = payment.validate().unwrap_err();
    /// assert!(error.to_string().contains("site_id"));
    /// assert!(error.to_string().contains("amount"));
    /// ```
    pub fn validate(&self) -> PayrollResult<()> {
        validate_payment(&self.site_id, &self.worker_id, self.amount)
    }

    /// Builds the stored payment.
    pub fn into_payment(self, id: String, created_at: DateTime<Utc>) -> Payment {
        Payment {
            id,
            site_id: self.site_id,
            worker_id: self.worker_id,
            amount: self.amount,
            payment_date: self.payment_date,
            method: self.method,
            status: self.status,
            created_at: Some(created_at),
        }
    }
}

/// A partial update to a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUpdate {
    /// New site.
    #[serde(default)]
    pub site_id: Option<String>,
    /// New amount. Must be greater than zero.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// New payment date.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    /// New method.
    #[serde(default)]
    pub method: Option<PaymentMethod>,
    /// New status.
    #[serde(default)]
    pub status: Option<PaymentStatus>,
}

impl PaymentUpdate {
    /// Validates the supplied fields only.
    pub fn validate(&self) -> PayrollResult<()> {
        let mut violations: Vec<(&str, String)> = Vec::new();
        if matches!(&self.site_id, Some(site_id) if site_id.trim().is_empty()) {
            violations.push(("site_id", "must not be empty".to_string()));
        }
        if let Some(message) = self.amount.and_then(amount_violation) {
            violations.push(("amount", message));
        }
        into_result(violations)
    }

    /// Validates and applies the supplied fields to `payment`.
    pub fn apply_to(self, payment: &mut Payment) -> PayrollResult<()> {
        self.validate()?;
        if let Some(site_id) = self.site_id {
            payment.site_id = site_id;
        }
        if let Some(amount) = self.amount {
            payment.amount = amount;
        }
        if let Some(payment_date) = self.payment_date {
            payment.payment_date = payment_date;
        }
        if let Some(method) = self.method {
            payment.method = method;
        }
        if let Some(status) = self.status {
            payment.status = status;
        }
        Ok(())
    }
}

fn validate_payment(site_id: &str, worker_id: &str, amount: Decimal) -> PayrollResult<()> {
    let mut violations: Vec<(&str, String)> = Vec::new();
    if site_id.trim().is_empty() {
        violations.push(("site_id", "is required".to_string()));
    }
    if worker_id.trim().is_empty() {
        violations.push(("worker_id", "is required".to_string()));
    }
    if let Some(message) = amount_violation(amount) {
        violations.push(("amount", message));
    }
    into_result(violations)
}

fn amount_violation(amount: Decimal) -> Option<String> {
    if amount <= Decimal::ZERO {
        Some("must be greater than 0".to_string())
    } else if amount > MAX_AMOUNT {
        Some(format!("must not exceed {}", MAX_AMOUNT))
    } else {
        None
    }
}

fn into_result(violations: Vec<(&str, String)>) -> PayrollResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    let field = violations
        .iter()
        .map(|(field, _)| *field)
        .collect::<Vec<_>>()
        .join(", ");
    let message = violations
        .iter()
        .map(|(field, message)| format!("'{}' {}", field, message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(PayrollError::InvalidPayment { field, message })
}
