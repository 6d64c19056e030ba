//! Calendar arithmetic for pay dates.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// A calendar month.
///
/// Pay dates are resolved per month: a pay day beyond the month's last day
/// falls on the last day instead.
///
/// # Example
///
/// ```
/// use ferias_engine::calculation::YearMonth;
/// use chrono::NaiveDate;
///
/// let feb = YearMonth::new(2023, 2);
/// assert_eq!(feb.pay_date(31), NaiveDate::from_ymd_opt(2023, 2, 28));
/// assert_eq!(feb.next(), YearMonth::new(2023, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month; `month` is 1-based and must be in `1..=12`.
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
        }
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month, rolling into January of the next year.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// The preceding month, rolling back into December of the previous year.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The number of days in the month.
    pub fn last_day(&self) -> u32 {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|d| d.pred_opt())
            .map_or(28, |d| d.day())
    }

    /// The day of the month pay falls on, clamped to the month's length.
    pub fn effective_pay_day(&self, pay_day: u32) -> u32 {
        pay_day.clamp(1, self.last_day())
    }

    /// The pay date in this month.
    ///
    /// Returns `None` only for years outside chrono's supported range.
    pub fn pay_date(&self, pay_day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.effective_pay_day(pay_day))
    }
}

/// Adds (or, for negative values, subtracts) whole days.
pub fn add_days(date: NaiveDate, days: i64) -> EngineResult<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };

    shifted.ok_or_else(|| EngineError::CalculationError {
        message: format!("Date {} shifted by {} days is out of range", date, days),
    })
}

/// Resolves the pay date of a month, failing for unrepresentable years.
pub fn pay_date(month: YearMonth, pay_day: u32) -> EngineResult<NaiveDate> {
    month
        .pay_date(pay_day)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!(
                "No pay date for {}-{:02} (pay day {})",
                month.year(),
                month.month(),
                pay_day
            ),
        })
}
