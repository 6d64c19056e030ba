//! Calculation logic for the vacation pay engine.
//!
//! This module contains the calculation functions for vacation pay:
//! bracket evaluation for INSS and IRRF withholding, the monetary
//! composition of the vacation components, the payment timeline around
//! the vacation window and the narrative explanation.

mod bracket_tax;
mod calendar;
mod composition;
mod explanation;
mod money;
mod timeline;
mod vacation;

pub use bracket_tax::{
    INSS_CEILING_WARNING, INSS_CLAUSE, IRRF_CLAMP_WARNING, IRRF_CLAUSE, WithholdingResult,
    calculate_inss, calculate_irrf, evaluate_bracket,
};
pub use calendar::{YearMonth, add_days};
pub use composition::{CompositionResult, VacationAmounts, compose_amounts};
pub use explanation::explain;
pub use money::{DAYS_PER_MONTH, prorate, round_currency};
pub use timeline::{
    LEAVE_END, LEAVE_START, NEXT_FULL_SALARY, PAYMENT_LEAD_DAYS, PRO_RATA_LEAVE_MONTH,
    PRO_RATA_RETURN, SALARY_BEFORE_LEAVE, TimelineResult, VACATION_PAYMENT, VacationWindow,
    build_timeline,
};
pub use vacation::calculate_vacation;
