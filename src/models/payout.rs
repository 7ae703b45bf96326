//! Payroll engine output: line items, per-worker outcomes, and batches.
//!
//! A [`PayrollBatch`] is what one run of the aggregator produces. Each worker
//! contributes at most one [`PayoutOutcome`]: either a computed
//! [`PayoutLineItem`] or a [`PayoutFailure`] that an operator must resolve.
//! A batch can then be persisted as a [`SavedBatch`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

use super::{CompensationType, PayPeriod, Worker};

/// One worker's computed pay for a period.
///
/// # Example
///
/// ```
/// use site_payroll::models::{CompensationType, PayPeriod, PayoutLineItem};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 10, 8).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
/// );
/// let item = PayoutLineItem {
///     worker_id: "w-1".to_string(),
///     worker_name: "Ana".to_string(),
///     compensation_type: CompensationType::Hourly,
///     period,
///     period_label: period.label(),
///     amount: Decimal::new(90, 0),
///     hours_total: Some(Decimal::new(9, 0)),
///     quantity: None,
///     unit_rate: None,
///     payout_destination: None,
/// };
/// assert_eq!(item.period_label, "2026-10-08 a 2026-10-15");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutLineItem {
    /// The worker paid.
    pub worker_id: String,
    /// The worker's display name.
    pub worker_name: String,
    /// How the amount was computed.
    pub compensation_type: CompensationType,
    /// The settlement period.
    pub period: PayPeriod,
    /// The period as shown on documents.
    pub period_label: String,
    /// Amount owed.
    pub amount: Decimal,
    /// Total hours across the period (hourly workers only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hours_total: Option<Decimal>,
    /// Measured quantity (area-rate workers only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quantity: Option<Decimal>,
    /// Unit rate applied (area-rate workers only).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unit_rate: Option<Decimal>,
    /// Where the payout is routed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payout_destination: Option<String>,
}

/// A worker whose pay could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutFailure {
    /// The worker concerned.
    pub worker_id: String,
    /// The worker's display name.
    pub worker_name: String,
    /// The worker's compensation type.
    pub compensation_type: CompensationType,
    /// The period that was being settled.
    pub period: PayPeriod,
    /// What the operator needs to fix.
    pub error: String,
}

impl PayoutFailure {
    /// A failure for a worker whose pay does not fit in a decimal amount.
    pub fn amount_out_of_range(
        worker: &Worker,
        compensation_type: CompensationType,
        period: PayPeriod,
    ) -> Self {
        Self {
            worker_id: worker.id.clone(),
            worker_name: worker.name.clone(),
            compensation_type,
            period,
            error: format!(
                "AMOUNT OUT OF RANGE FOR PERIOD {} to {}",
                period.start_date.format("%Y-%m-%d"),
                period.end_date.format("%Y-%m-%d")
            ),
        }
    }
}

/// The per-worker result of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoutOutcome {
    /// Pay was computed.
    Computed(PayoutLineItem),
    /// Pay could not be computed.
    Failed(PayoutFailure),
}

impl PayoutOutcome {
    /// The worker this outcome belongs to.
    pub fn worker_id(&self) -> &str {
        match self {
            PayoutOutcome::Computed(item) => &item.worker_id,
            PayoutOutcome::Failed(failure) => &failure.worker_id,
        }
    }

    /// The worker's display name.
    pub fn worker_name(&self) -> &str {
        match self {
            PayoutOutcome::Computed(item) => &item.worker_name,
            PayoutOutcome::Failed(failure) => &failure.worker_name,
        }
    }

    /// The amount owed, or `None` for a failure.
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            PayoutOutcome::Computed(item) => Some(item.amount),
            PayoutOutcome::Failed(_) => None,
        }
    }

    /// True for a failure.
    pub fn is_failed(&self) -> bool {
        matches!(self, PayoutOutcome::Failed(_))
    }
}

/// The result of one payroll run over the whole roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBatch {
    /// The date the batch was computed for.
    pub computed_on: NaiveDate,
    /// Included outcomes in roster order.
    pub items: Vec<PayoutOutcome>,
    /// Sum of computed amounts. Failures contribute nothing.
    pub grand_total: Decimal,
}

impl PayrollBatch {
    /// Creates an empty batch.
    pub fn new(computed_on: NaiveDate) -> Self {
        Self {
            computed_on,
            items: Vec::new(),
            grand_total: Decimal::ZERO,
        }
    }

    /// Appends an outcome, adding computed amounts to the grand total.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::AmountOutOfRange`] when the grand total would
    /// overflow. The batch is left unchanged in that case.
    pub fn push(&mut self, outcome: PayoutOutcome) -> PayrollResult<()> {
        if let Some(amount) = outcome.amount() {
            self.grand_total = self.grand_total.checked_add(amount).ok_or_else(|| {
                PayrollError::AmountOutOfRange {
                    message: format!(
                        "grand total overflowed adding {} for worker {}",
                        amount,
                        outcome.worker_id()
                    ),
                }
            })?;
        }
        self.items.push(outcome);
        Ok(())
    }

    /// Computed line items in order.
    pub fn computed_items(&self) -> impl Iterator<Item = &PayoutLineItem> {
        self.items.iter().filter_map(|outcome| match outcome {
            PayoutOutcome::Computed(item) => Some(item),
            PayoutOutcome::Failed(_) => None,
        })
    }

    /// Failures in order.
    pub fn failures(&self) -> impl Iterator<Item = &PayoutFailure> {
        self.items.iter().filter_map(|outcome| match outcome {
            PayoutOutcome::Failed(failure) => Some(failure),
            PayoutOutcome::Computed(_) => None,
        })
    }

    /// The period of the first computed item, used as the batch header period.
    pub fn header_period(&self) -> Option<PayPeriod> {
        self.computed_items().next().map(|item| item.period)
    }

    /// Builds what gets persisted for this batch. `None` when nothing is payable.
    pub fn to_draft(&self) -> Option<BatchDraft> {
        let period = self.header_period()?;
        Some(BatchDraft {
            period,
            total_amount: self.grand_total,
            items: self.computed_items().map(SavedBatchItem::from).collect(),
        })
    }
}

/// Lifecycle of a persisted batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Saved, not yet paid out.
    #[default]
    Pending,
    /// Paid out.
    Paid,
}

/// One child row of a persisted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBatchItem {
    /// The worker paid.
    pub worker_id: String,
    /// How the amount was computed.
    pub compensation_type: CompensationType,
    /// Amount owed.
    pub amount: Decimal,
    /// Hours (hourly only).
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Quantity (area-rate only).
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Unit rate (area-rate only).
    #[serde(default)]
    pub unit_rate: Option<Decimal>,
    /// Where the payout is routed.
    #[serde(default)]
    pub payout_destination: Option<String>,
}

impl From<&PayoutLineItem> for SavedBatchItem {
    fn from(item: &PayoutLineItem) -> Self {
        Self {
            worker_id: item.worker_id.clone(),
            compensation_type: item.compensation_type,
            amount: item.amount,
            hours: item.hours_total,
            quantity: item.quantity,
            unit_rate: item.unit_rate,
            payout_destination: item.payout_destination.clone(),
        }
    }
}

/// A batch ready to be written by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDraft {
    /// Header period.
    pub period: PayPeriod,
    /// Batch total.
    pub total_amount: Decimal,
    /// Child rows.
    pub items: Vec<SavedBatchItem>,
}

/// A persisted batch header with its child rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBatch {
    /// Unique identifier for the batch.
    pub id: String,
    /// Header period.
    pub period: PayPeriod,
    /// Batch total.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: BatchStatus,
    /// When the batch was saved.
    pub created_at: DateTime<Utc>,
    /// Child rows.
    pub items: Vec<SavedBatchItem>,
}

impl SavedBatch {
    /// Stamps a draft with its id and creation time.
    pub fn from_draft(draft: BatchDraft, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            period: draft.period,
            total_amount: draft.total_amount,
            status: BatchStatus::Pending,
            created_at,
            items: draft.items,
        }
    }
}
