//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic happens in `Decimal`; values are converted to `f64` only for
//! storage and serialization.

use rust_decimal::prelude::*;

/// Rounding precision for monetary values (paise)
const DECIMAL_PLACES: u32 = 2;

/// Flat tax applied to every order at checkout (5%)
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Convert f64 to Decimal; non-finite input counts as zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// unit price × quantity
pub fn line_total(unit_price: f64, quantity: i32) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// Subtotal, tax and grand total for a checkout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Compute totals from `(unit_price, quantity)` pairs
///
/// `total = subtotal × (1 + TAX_RATE)`, each figure rounded to paise.
/// Subtotal and total are rounded separately, so `total` matches
/// `cart.total_price() * 1.05` to the paisa: sub-paisa unit prices can move
/// it by up to 0.005.
pub fn compute_totals<I>(lines: I) -> Totals
where
    I: IntoIterator<Item = (f64, i32)>,
{
    let subtotal: Decimal = lines
        .into_iter()
        .map(|(price, qty)| line_total(price, qty))
        .sum();
    let tax = subtotal * TAX_RATE;
    Totals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(subtotal + tax),
    }
}
