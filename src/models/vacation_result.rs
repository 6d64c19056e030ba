//! Vacation result models.
//!
//! This module contains the [`VacationResult`] type and its associated
//! structures: the payment timeline, the credit/debit breakdown and the
//! audit trace. A result is computed once and never mutated; the history
//! store persists copies of it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditTrace;

/// The kind of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A regular or pro-rata salary payment.
    Salary,
    /// The vacation payment.
    Vacation,
    /// A zero-amount marker (leave start, leave end).
    Info,
    /// A 13th-salary payment.
    Thirteenth,
}

/// A dated payroll event around the vacation window.
///
/// # Example
///
/// ```
/// use ferias_engine::models::{EventKind, PayEvent};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let event = PayEvent::new(
///     NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
///     "Pagamento de férias",
///     Decimal::new(345944, 2),
///     EventKind::Vacation,
///     "Férias + 1/3 constitucional",
/// );
/// assert_eq!(event.display_date, "08/06/2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayEvent {
    /// The calendar date of the event.
    pub date: NaiveDate,
    /// The date as shown to the user (dd/mm/yyyy).
    pub display_date: String,
    /// Short title.
    pub label: String,
    /// Amount paid on this date (zero for markers).
    pub amount: Decimal,
    /// The event kind.
    pub kind: EventKind,
    /// Longer explanation.
    pub description: String,
}

impl PayEvent {
    /// Creates an event, deriving the display date from `date`.
    pub fn new(
        date: NaiveDate,
        label: impl Into<String>,
        amount: Decimal,
        kind: EventKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            display_date: crate::format::format_date(date),
            label: label.into(),
            amount,
            kind,
            description: description.into(),
        }
    }
}

/// Whether a breakdown line adds to or subtracts from the net amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Adds to the net amount.
    Credit,
    /// Subtracts from the net amount.
    Debit,
}

/// One line of the credit/debit breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Description shown to the user.
    pub label: String,
    /// The (non-negative) amount.
    pub value: Decimal,
    /// Credit or debit.
    pub kind: LineKind,
}

impl LineItem {
    /// Creates a credit line.
    pub fn credit(label: impl Into<String>, value: Decimal) -> Self {
        Self {
            label: label.into(),
            value,
            kind: LineKind::Credit,
        }
    }

    /// Creates a debit line.
    pub fn debit(label: impl Into<String>, value: Decimal) -> Self {
        Self {
            label: label.into(),
            value,
            kind: LineKind::Debit,
        }
    }
}

/// The complete result of a vacation pay calculation.
///
/// Monetary fields are rounded to centavos. Field names follow the payroll
/// terms printed on a Brazilian vacation receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationResult {
    /// Monthly remuneration (base salary plus variable pay average).
    pub remuneracao_base: Decimal,
    /// Daily rate (remuneration / 30).
    pub valor_dia: Decimal,
    /// Gross pay for the days on leave.
    pub ferias_gozadas_bruto: Decimal,
    /// Constitutional one-third bonus on the days on leave.
    pub terco_constitucional_gozado: Decimal,
    /// Gross pay for the sold days.
    pub abono_pecuniario_bruto: Decimal,
    /// Constitutional one-third bonus on the sold days.
    pub terco_constitucional_abono: Decimal,
    /// Advance of half the 13th salary (zero if not requested).
    pub advance_13th_value: Decimal,
    /// Sum of the four vacation components.
    pub total_ferias_bruto: Decimal,
    /// INSS contribution base.
    pub base_inss_ferias: Decimal,
    /// INSS withheld.
    pub desconto_inss_ferias: Decimal,
    /// IRRF base before the INSS deduction.
    pub base_irrf_ferias: Decimal,
    /// IRRF withheld.
    pub desconto_irrf_ferias: Decimal,
    /// Net amount paid before the leave.
    pub liquido_ferias: Decimal,
    /// Payroll events in insertion order.
    pub timeline: Vec<PayEvent>,
    /// Credit and debit lines in display order.
    pub breakdown: Vec<LineItem>,
    /// Narrative summary in Portuguese.
    pub explicacao_texto: String,
    /// Rule-by-rule audit trace.
    pub audit_trace: AuditTrace,
}

impl VacationResult {
    /// Sum of all credit lines.
    pub fn total_credits(&self) -> Decimal {
        self.breakdown
            .iter()
            .filter(|l| l.kind == LineKind::Credit)
            .map(|l| l.value)
            .sum()
    }

    /// Sum of all debit lines.
    pub fn total_debits(&self) -> Decimal {
        self.breakdown
            .iter()
            .filter(|l| l.kind == LineKind::Debit)
            .map(|l| l.value)
            .sum()
    }

    /// Returns the timeline events of one kind, in timeline order.
    pub fn events_of_kind(&self, kind: EventKind) -> impl Iterator<Item = &PayEvent> + '_ {
        self.timeline.iter().filter(move |e| e.kind == kind)
    }
}
