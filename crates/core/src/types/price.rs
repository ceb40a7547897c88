//! Price formatting and discount arithmetic.
//!
//! Amounts are plain decimals in CFA francs. The franc has no minor unit,
//! so display rounds to whole francs and groups thousands with a space
//! (`12 500 FCFA`).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// An entry priced in CFA francs, possibly marked down from an original price.
pub trait Priced {
    /// Unit price the shopper pays.
    fn unit_price(&self) -> Decimal;

    /// Price before markdown, if any.
    fn original_price(&self) -> Option<Decimal>;

    /// Whole-percent markdown, 0 when the entry is not discounted.
    fn discount_percentage(&self) -> u32 {
        self.original_price()
            .map_or(0, |original| discount_percentage(original, self.unit_price()))
    }
}

/// Format an amount as CFA francs, e.g. `12 500 FCFA`.
#[must_use]
pub fn format_fcfa(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_thousands(&digits);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped} FCFA")
    } else {
        format!("{grouped} FCFA")
    }
}

/// Whole-percent discount from `original` down to `price`.
///
/// Returns 0 when there is no meaningful discount.
#[must_use]
pub fn discount_percentage(original: Decimal, price: Decimal) -> u32 {
    if original <= Decimal::ZERO || original <= price {
        return 0;
    }
    ((original - price) / original * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
