//! Monetary helpers shared by the calculation steps.

use rust_decimal::{Decimal, RoundingStrategy};

/// Days in the commercial month used for daily rates (calendar-month convention).
pub const DAYS_PER_MONTH: u32 = 30;

/// Rounds an amount to centavos, half away from zero.
///
/// # Example
///
/// ```
/// use ferias_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(3788196, 4)), Decimal::new(37882, 2));
/// assert_eq!(round_currency(Decimal::new(5, 3)), Decimal::new(1, 2));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Pays `days` days of a monthly remuneration, rounded to centavos.
///
/// Multiplies before dividing so that whole months come out exact.
pub fn prorate(monthly: Decimal, days: u32) -> Decimal {
    round_currency(monthly * Decimal::from(days) / Decimal::from(DAYS_PER_MONTH))
}
