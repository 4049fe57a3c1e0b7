//! Fixed-precision rounding of allocation amounts

use kitty_common::ALLOCATION_DECIMALS;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to [`ALLOCATION_DECIMALS`] places, half away from zero.
///
/// Values that do not fit a `Decimal` (non-finite, out of range) are
/// returned unchanged.
pub fn round_amount(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(ALLOCATION_DECIMALS, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
