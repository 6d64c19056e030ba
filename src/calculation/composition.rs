//! Monetary composition of vacation pay.
//!
//! This module derives the gross components (leave pay, constitutional
//! one-third, sold days, 13th advance), the INSS and IRRF bases, the
//! withholdings and the net amount, together with the credit/debit
//! breakdown shown on the receipt.
//!
//! Every component is rounded to centavos as it is produced, so the
//! breakdown lines add up to the net amount exactly.

use rust_decimal::Decimal;

use crate::config::TaxTables;
use crate::models::{AuditStep, AuditWarning, EmploymentProfile, LineItem, VacationRequest};

use super::bracket_tax::{calculate_inss, calculate_irrf};
use super::money::{DAYS_PER_MONTH, prorate, round_currency};

/// Legal basis of vacation pay at the regular remuneration.
pub const VACATION_PAY_CLAUSE: &str = "CLT art. 142";

/// Legal basis of the constitutional one-third bonus.
pub const ONE_THIRD_CLAUSE: &str = "CF art. 7º, XVII";

/// Legal basis of selling vacation days.
pub const ABONO_CLAUSE: &str = "CLT art. 143";

/// Legal basis of the 13th salary advance at vacation time.
pub const ADVANCE_13TH_CLAUSE: &str = "Lei 4.749/1965 art. 2º, §2º";

/// Legal basis of deductions from pay.
pub const NET_PAY_CLAUSE: &str = "CLT art. 462";

/// The monetary amounts of a vacation, rounded to centavos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacationAmounts {
    /// Monthly remuneration (base salary plus variable pay average).
    pub remuneration: Decimal,
    /// Remuneration divided by 30.
    pub daily_rate: Decimal,
    /// Pay for the days on leave.
    pub vacation_pay: Decimal,
    /// One-third bonus on the days on leave.
    pub vacation_bonus: Decimal,
    /// Pay for the sold days.
    pub sold_pay: Decimal,
    /// One-third bonus on the sold days.
    pub sold_bonus: Decimal,
    /// Half of the remuneration when the 13th advance is requested.
    pub advance_13th: Decimal,
    /// Sum of the four vacation components.
    pub total_gross: Decimal,
    /// INSS contribution base.
    pub inss_base: Decimal,
    /// INSS withheld.
    pub inss: Decimal,
    /// IRRF base before the INSS deduction.
    pub irrf_base: Decimal,
    /// IRRF withheld.
    pub irrf: Decimal,
    /// Amount paid before the leave.
    pub net: Decimal,
}

impl VacationAmounts {
    /// Pays `days` days of the monthly remuneration.
    pub fn pro_rata(&self, days: u32) -> Decimal {
        prorate(self.remuneration, days)
    }
}

/// The result of composing vacation amounts.
#[derive(Debug, Clone)]
pub struct CompositionResult {
    /// The computed amounts.
    pub amounts: VacationAmounts,
    /// Credit and debit lines in display order.
    pub breakdown: Vec<LineItem>,
    /// Audit steps, numbered from the requested first step.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised by the withholding calculations.
    pub warnings: Vec<AuditWarning>,
}

/// Composes the vacation amounts for a profile and request.
///
/// The request is assumed valid; see [`VacationRequest::validate`].
///
/// # Example
///
/// ```
/// use ferias_engine::calculation::compose_amounts;
/// use ferias_engine::config::TaxTables;
/// use ferias_engine::models::{EmploymentProfile, VacationRequest};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let profile = EmploymentProfile {
///     base_salary: Some(Decimal::new(3000, 0)),
///     ..Default::default()
/// };
/// let request = VacationRequest {
///     start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
///     vacation_days: 30,
///     sold_days: 0,
///     advance_13th: false,
/// };
///
/// let result = compose_amounts(&profile, &request, &TaxTables::clt_2024(), 1);
/// assert_eq!(result.amounts.total_gross, Decimal::new(4000, 0));
/// assert_eq!(result.amounts.net, Decimal::new(345944, 2));
/// ```
pub fn compose_amounts(
    profile: &EmploymentProfile,
    request: &VacationRequest,
    tables: &TaxTables,
    first_step: u32,
) -> CompositionResult {
    let remuneration = profile.remuneration();
    let daily_rate = round_currency(remuneration / Decimal::from(DAYS_PER_MONTH));

    let vacation_pay = prorate(remuneration, request.vacation_days);
    let vacation_bonus = one_third(vacation_pay);
    let sold_pay = prorate(remuneration, request.sold_days);
    let sold_bonus = one_third(sold_pay);
    let advance_13th = if request.advance_13th {
        round_currency(remuneration / Decimal::from(2))
    } else {
        Decimal::ZERO
    };

    let total_gross = vacation_pay + vacation_bonus + sold_pay + sold_bonus;
    let inss_base = total_gross;
    let irrf_base = vacation_pay + vacation_bonus;

    let mut audit_steps = Vec::with_capacity(7);
    let mut warnings = Vec::new();
    let mut step_number = first_step;
    let mut next_step = || {
        let current = step_number;
        step_number += 1;
        current
    };

    audit_steps.push(AuditStep {
        step_number: next_step(),
        rule_id: "remuneration".to_string(),
        rule_name: "Vacation Remuneration".to_string(),
        clause_ref: VACATION_PAY_CLAUSE.to_string(),
        input: serde_json::json!({
            "base_salary": profile.base_salary.unwrap_or_default().normalize().to_string(),
            "variable_pay_average": profile
                .variable_pay_average
                .unwrap_or_default()
                .normalize()
                .to_string()
        }),
        output: serde_json::json!({
            "remuneration": remuneration.normalize().to_string(),
            "daily_rate": daily_rate.to_string()
        }),
        reasoning: format!(
            "Remuneration R$ {} / {} = R$ {} per day",
            remuneration.normalize(),
            DAYS_PER_MONTH,
            daily_rate
        ),
    });

    audit_steps.push(AuditStep {
        step_number: next_step(),
        rule_id: "vacation_gross".to_string(),
        rule_name: "Vacation Pay and One-Third Bonus".to_string(),
        clause_ref: format!("{}; {}", VACATION_PAY_CLAUSE, ONE_THIRD_CLAUSE),
        input: serde_json::json!({
            "remuneration": remuneration.normalize().to_string(),
            "vacation_days": request.vacation_days
        }),
        output: serde_json::json!({
            "vacation_pay": vacation_pay.to_string(),
            "one_third_bonus": vacation_bonus.to_string()
        }),
        reasoning: format!(
            "{} days of R$ {} = R$ {}; one third = R$ {}",
            request.vacation_days,
            remuneration.normalize(),
            vacation_pay,
            vacation_bonus
        ),
    });

    audit_steps.push(AuditStep {
        step_number: next_step(),
        rule_id: "abono_pecuniario".to_string(),
        rule_name: "Sold Vacation Days".to_string(),
        clause_ref: ABONO_CLAUSE.to_string(),
        input: serde_json::json!({
            "sold_days": request.sold_days
        }),
        output: serde_json::json!({
            "sold_pay": sold_pay.to_string(),
            "one_third_bonus": sold_bonus.to_string()
        }),
        reasoning: if request.sold_days > 0 {
            format!(
                "{} sold days = R$ {}; one third = R$ {}; excluded from the IRRF base",
                request.sold_days, sold_pay, sold_bonus
            )
        } else {
            "No vacation days sold".to_string()
        },
    });

    audit_steps.push(AuditStep {
        step_number: next_step(),
        rule_id: "advance_13th".to_string(),
        rule_name: "13th Salary Advance".to_string(),
        clause_ref: ADVANCE_13TH_CLAUSE.to_string(),
        input: serde_json::json!({
            "requested": request.advance_13th
        }),
        output: serde_json::json!({
            "advance": advance_13th.to_string()
        }),
        reasoning: if request.advance_13th {
            format!(
                "Half of R$ {} = R$ {}; not part of the INSS or IRRF base",
                remuneration.normalize(),
                advance_13th
            )
        } else {
            "13th salary advance not requested".to_string()
        },
    });

    let inss = calculate_inss(inss_base, &tables.inss, next_step());
    audit_steps.push(inss.audit_step);
    warnings.extend(inss.warning);

    let irrf = calculate_irrf(irrf_base, inss.amount, &tables.irrf, next_step());
    audit_steps.push(irrf.audit_step);
    warnings.extend(irrf.warning);

    let net = total_gross + advance_13th - inss.amount - irrf.amount;

    audit_steps.push(AuditStep {
        step_number: next_step(),
        rule_id: "net_amount".to_string(),
        rule_name: "Net Vacation Pay".to_string(),
        clause_ref: NET_PAY_CLAUSE.to_string(),
        input: serde_json::json!({
            "total_gross": total_gross.to_string(),
            "advance_13th": advance_13th.to_string(),
            "inss": inss.amount.to_string(),
            "irrf": irrf.amount.to_string()
        }),
        output: serde_json::json!({
            "net": net.to_string()
        }),
        reasoning: format!(
            "R$ {} + R$ {} - R$ {} - R$ {} = R$ {}",
            total_gross, advance_13th, inss.amount, irrf.amount, net
        ),
    });

    let amounts = VacationAmounts {
        remuneration,
        daily_rate,
        vacation_pay,
        vacation_bonus,
        sold_pay,
        sold_bonus,
        advance_13th,
        total_gross,
        inss_base,
        inss: inss.amount,
        irrf_base,
        irrf: irrf.amount,
        net,
    };

    CompositionResult {
        breakdown: breakdown(request, &amounts),
        amounts,
        audit_steps,
        warnings,
    }
}

fn one_third(value: Decimal) -> Decimal {
    round_currency(value / Decimal::from(3))
}

fn breakdown(request: &VacationRequest, amounts: &VacationAmounts) -> Vec<LineItem> {
    let mut lines = vec![
        LineItem::credit(
            format!("Férias gozadas ({} dias)", request.vacation_days),
            amounts.vacation_pay,
        ),
        LineItem::credit("1/3 constitucional sobre férias", amounts.vacation_bonus),
    ];

    if request.sold_days > 0 {
        lines.push(LineItem::credit(
            format!("Abono pecuniário ({} dias vendidos)", request.sold_days),
            amounts.sold_pay,
        ));
        lines.push(LineItem::credit(
            "1/3 constitucional sobre venda",
            amounts.sold_bonus,
        ));
    }

    if amounts.advance_13th > Decimal::ZERO {
        lines.push(LineItem::credit(
            "Adiantamento de 13º salário (50%)",
            amounts.advance_13th,
        ));
    }

    lines.push(LineItem::debit("INSS sobre férias", amounts.inss));
    lines.push(LineItem::debit("IRRF sobre férias", amounts.irrf));
    lines
}
