//! Payment timeline around the vacation window.
//!
//! The timeline lists, in insertion order, the salary paid before the leave,
//! the vacation payment, the leave markers, any pro-rata salary for the leave
//! month and the first salary after the return.
//!
//! Pay days are resolved per month with [`YearMonth::effective_pay_day`], so a
//! pay day of 30 falls on 28 February (29 in leap years). The salary after
//! the return is placed in the month the employee returns in: a return on or
//! before that month's pay day is paid pro rata on it, a later return waits
//! for the following month's pay day.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::format::format_date;
use crate::models::{AuditStep, EmploymentProfile, EventKind, PayEvent, VacationRequest};

use super::calendar::{YearMonth, add_days, pay_date};
use super::composition::VacationAmounts;

/// Legal basis of the vacation payment deadline.
pub const PAYMENT_DEADLINE_CLAUSE: &str = "CLT art. 145";

/// Days before the leave by which vacation pay is due.
pub const PAYMENT_LEAD_DAYS: i64 = 2;

/// Label of the full salary paid before the leave.
pub const SALARY_BEFORE_LEAVE: &str = "Salário do mês anterior";

/// Label of the vacation payment.
pub const VACATION_PAYMENT: &str = "Pagamento de férias";

/// Label of the leave start marker.
pub const LEAVE_START: &str = "Início das férias";

/// Label of the leave end marker.
pub const LEAVE_END: &str = "Fim das férias";

/// Label of the pro-rata salary for days worked before the leave.
pub const PRO_RATA_LEAVE_MONTH: &str = "Salário proporcional (mês das férias)";

/// Label of the pro-rata salary for days worked after the return.
pub const PRO_RATA_RETURN: &str = "Salário proporcional (volta)";

/// Label of the first full salary after the return.
pub const NEXT_FULL_SALARY: &str = "Próximo salário completo";

/// The key dates of a vacation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VacationWindow {
    /// The date vacation pay is due.
    pub payment_date: NaiveDate,
    /// First day of leave.
    pub start: NaiveDate,
    /// Last day of leave.
    pub end: NaiveDate,
    /// First working day after the leave.
    pub return_date: NaiveDate,
}

impl VacationWindow {
    /// Derives the window from a request.
    ///
    /// # Example
    ///
    /// ```
    /// use ferias_engine::calculation::VacationWindow;
    /// use ferias_engine::models::VacationRequest;
    /// use chrono::NaiveDate;
    ///
    /// let request = VacationRequest {
    ///     start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
    ///     vacation_days: 30,
    ///     sold_days: 0,
    ///     advance_13th: false,
    /// };
    /// let window = VacationWindow::new(&request).unwrap();
    /// assert_eq!(window.payment_date, NaiveDate::from_ymd_opt(2024, 6, 8).unwrap());
    /// assert_eq!(window.end, NaiveDate::from_ymd_opt(2024, 7, 9).unwrap());
    /// assert_eq!(window.return_date, NaiveDate::from_ymd_opt(2024, 7, 10).unwrap());
    /// ```
    pub fn new(request: &VacationRequest) -> EngineResult<Self> {
        let start = request.start_date;
        let end = add_days(start, i64::from(request.vacation_days.max(1)) - 1)?;

        Ok(Self {
            payment_date: add_days(start, -PAYMENT_LEAD_DAYS)?,
            start,
            end,
            return_date: add_days(end, 1)?,
        })
    }
}

/// The result of building a timeline.
#[derive(Debug, Clone)]
pub struct TimelineResult {
    /// The vacation window the events were placed around.
    pub window: VacationWindow,
    /// Events in insertion order.
    pub events: Vec<PayEvent>,
    /// The audit step recording the placement.
    pub audit_step: AuditStep,
}

impl TimelineResult {
    /// Finds the first event with the given label.
    pub fn event(&self, label: &str) -> Option<&PayEvent> {
        self.events.iter().find(|e| e.label == label)
    }
}

/// Builds the payroll events around a vacation.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::CalculationError`] when a date falls
/// outside the representable calendar.
pub fn build_timeline(
    profile: &EmploymentProfile,
    request: &VacationRequest,
    amounts: &VacationAmounts,
    step_number: u32,
) -> EngineResult<TimelineResult> {
    let pay_day = profile.pay_day();
    let window = VacationWindow::new(request)?;
    let mut events = Vec::with_capacity(6);

    let leave_month = YearMonth::of(window.start);
    let leave_pay_day = leave_month.effective_pay_day(pay_day);
    let start_day = window.start.day();

    // Salary before the leave
    if start_day > leave_pay_day {
        events.push(salary_event(leave_month, pay_day, amounts.remuneration)?);
    } else {
        let previous = salary_event(leave_month.previous(), pay_day, amounts.remuneration)?;
        if previous.date < window.start {
            events.push(previous);
        }
    }

    events.push(PayEvent::new(
        window.payment_date,
        VACATION_PAYMENT,
        amounts.net,
        EventKind::Vacation,
        vacation_payment_description(request),
    ));

    events.push(PayEvent::new(
        window.start,
        LEAVE_START,
        Decimal::ZERO,
        EventKind::Info,
        format!("Primeiro dia de descanso ({} dias)", request.vacation_days),
    ));

    events.push(PayEvent::new(
        window.end,
        LEAVE_END,
        Decimal::ZERO,
        EventKind::Info,
        format!("Último dia de descanso; retorno em {}", format_date(window.return_date)),
    ));

    // Days worked in the leave month before the leave starts
    if start_day <= leave_pay_day {
        let worked = start_day - 1;
        if worked > 0 {
            events.push(PayEvent::new(
                pay_date(leave_month, pay_day)?,
                PRO_RATA_LEAVE_MONTH,
                amounts.pro_rata(worked),
                EventKind::Salary,
                format!("{} dias trabalhados antes das férias", worked),
            ));
        }
    }

    let return_month = YearMonth::of(window.return_date);
    let return_day = window.return_date.day();
    let return_pay_day = return_month.effective_pay_day(pay_day);

    if return_day <= return_pay_day {
        let worked = return_pay_day - return_day + 1;
        events.push(PayEvent::new(
            pay_date(return_month, pay_day)?,
            PRO_RATA_RETURN,
            amounts.pro_rata(worked),
            EventKind::Salary,
            format!("{} dias trabalhados após o retorno", worked),
        ));
    } else {
        events.push(PayEvent::new(
            pay_date(return_month.next(), pay_day)?,
            NEXT_FULL_SALARY,
            amounts.remuneration,
            EventKind::Salary,
            "Retorno ao ciclo normal de pagamento",
        ));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "payment_timeline".to_string(),
        rule_name: "Payment Timeline".to_string(),
        clause_ref: PAYMENT_DEADLINE_CLAUSE.to_string(),
        input: serde_json::json!({
            "start_date": window.start,
            "vacation_days": request.vacation_days,
            "pay_day": pay_day
        }),
        output: serde_json::json!({
            "payment_date": window.payment_date,
            "end_date": window.end,
            "return_date": window.return_date,
            "events": events.len()
        }),
        reasoning: format!(
            "Vacation pay due {} ({} days before the leave); leave {} to {}, return {}",
            format_date(window.payment_date),
            PAYMENT_LEAD_DAYS,
            format_date(window.start),
            format_date(window.end),
            format_date(window.return_date)
        ),
    };

    Ok(TimelineResult {
        window,
        events,
        audit_step,
    })
}

fn salary_event(month: YearMonth, pay_day: u32, amount: Decimal) -> EngineResult<PayEvent> {
    let day = if pay_day > 28 && month.effective_pay_day(pay_day) == month.last_day() {
        "último dia do mês".to_string()
    } else {
        format!("dia {}", month.effective_pay_day(pay_day))
    };

    Ok(PayEvent::new(
        pay_date(month, pay_day)?,
        SALARY_BEFORE_LEAVE,
        amount,
        EventKind::Salary,
        format!("Salário integral pago no dia de pagamento ({})", day),
    ))
}

fn vacation_payment_description(request: &VacationRequest) -> String {
    let mut description = String::from("Férias + 1/3 constitucional");
    if request.sold_days > 0 {
        description.push_str(" + venda de dias");
    }
    if request.advance_13th {
        description.push_str(" + adiantamento do 13º");
    }
    description.push_str(" (pago até 2 dias antes do início)");
    description
}
