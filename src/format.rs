//! Display formatting in Brazilian conventions.
//!
//! Currency uses `.` as thousands separator, `,` as decimal separator and the
//! `R$` prefix. Dates are `dd/mm/yyyy`.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as Brazilian Real.
///
/// # Example
///
/// ```
/// use ferias_engine::format::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(345944, 2)), "R$ 3.459,44");
/// assert_eq!(format_currency(Decimal::new(-105, 1)), "-R$ 10,50");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded = rounded.abs();
    rounded.rescale(2);

    let digits = rounded.to_string();
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{}", sign, grouped, fraction)
}

/// Formats a date as `dd/mm/yyyy`.
///
/// # Example
///
/// ```
/// use ferias_engine::format::format_date;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
/// assert_eq!(format_date(date), "08/06/2024");
/// ```
pub fn format_date(date: NaiveDate) -> String {
    format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_currency_small_values() {
        assert_eq!(format_currency(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_currency(dec("0.5")), "R$ 0,50");
        assert_eq!(format_currency(dec("7")), "R$ 7,00");
        assert_eq!(format_currency(dec("999.99")), "R$ 999,99");
    }

    #[test]
    fn test_format_currency_thousands_separators() {
        assert_eq!(format_currency(dec("1000")), "R$ 1.000,00");
        assert_eq!(format_currency(dec("3459.44")), "R$ 3.459,44");
        assert_eq!(format_currency(dec("1234567.891")), "R$ 1.234.567,89");
        assert_eq!(format_currency(dec("100000")), "R$ 100.000,00");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec("999.995")), "R$ 1.000,00");
        assert_eq!(format_currency(dec("0.005")), "R$ 0,01");
        assert_eq!(format_currency(dec("0.004")), "R$ 0,00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec("-1234.5")), "-R$ 1.234,50");
        assert_eq!(format_currency(dec("-0.001")), "R$ 0,00");
    }

    #[test]
    fn test_format_date_pads_day_and_month() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(date), "05/01/2025");

        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(format_date(date), "31/12/2024");
    }
}
