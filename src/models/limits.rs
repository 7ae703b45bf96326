//! Upper bounds on the numbers a record may carry.
//!
//! Pay is a product of a rate and hours or a quantity, summed across days and
//! workers. Records inside these bounds keep every such product and sum well
//! inside the range of [`Decimal`].

use rust_decimal::Decimal;

/// Most hours that can be logged for a single day.
pub const MAX_WORKED_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Largest daily or unit rate a worker, role, or measurement may carry.
pub const MAX_RATE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Largest measured quantity.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Largest single amount: a measurement total or a payment.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Checks that `value` lies in `0..=max`, describing the violated bound otherwise.
pub(crate) fn check_bounds(value: Decimal, max: Decimal) -> Result<(), String> {
    if value < Decimal::ZERO {
        Err("must not be negative".to_string())
    } else if value > max {
        Err(format!("must not exceed {}", max))
    } else {
        Ok(())
    }
}
