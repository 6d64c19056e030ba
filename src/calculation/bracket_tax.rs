//! Bracket tax evaluation.
//!
//! This module computes INSS and IRRF withholding from the configured
//! [`BracketTable`]s. The same evaluator serves both taxes; the table's
//! [`BracketMethod`] selects between cumulative (INSS) and
//! flat-rate-with-deduction (IRRF) arithmetic.

use rust_decimal::Decimal;

use crate::config::{BracketMethod, BracketTable, TaxBracket};
use crate::models::{AuditStep, AuditWarning};

use super::money::round_currency;

/// Legal basis of the progressive INSS contribution.
pub const INSS_CLAUSE: &str = "EC 103/2019 art. 28";

/// Legal basis of the IRRF withholding.
pub const IRRF_CLAUSE: &str = "Lei 7.713/1988 art. 7º";

/// Warning raised when the INSS base exceeds the contribution ceiling.
pub const INSS_CEILING_WARNING: &str = "INSS_CEILING_REACHED";

/// Warning raised when the IRRF formula yields a negative amount.
pub const IRRF_CLAMP_WARNING: &str = "IRRF_CLAMPED_TO_ZERO";

/// The result of a withholding calculation.
#[derive(Debug, Clone)]
pub struct WithholdingResult {
    /// The base the table was applied to.
    pub taxable_base: Decimal,
    /// The withheld amount, rounded to centavos and never negative.
    pub amount: Decimal,
    /// A warning about a cap or clamp, if one applied.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Evaluates a bracket table for a base amount.
///
/// The result is unrounded and never negative.
///
/// # Examples
///
/// ```
/// use ferias_engine::calculation::evaluate_bracket;
/// use ferias_engine::config::TaxTables;
/// use rust_decimal::Decimal;
///
/// let tables = TaxTables::clt_2024();
///
/// // 1412.00 * 7.5% + 1254.68 * 9% + 1333.32 * 12%
/// let inss = evaluate_bracket(Decimal::new(4000, 0), &tables.inss);
/// assert_eq!(inss, Decimal::new(3788196, 4));
///
/// // Exempt band
/// let irrf = evaluate_bracket(Decimal::new(225920, 2), &tables.irrf);
/// assert_eq!(irrf, Decimal::ZERO);
/// ```
pub fn evaluate_bracket(base: Decimal, table: &BracketTable) -> Decimal {
    raw_amount(base, table).max(Decimal::ZERO)
}

/// Evaluates a table without clamping.
fn raw_amount(base: Decimal, table: &BracketTable) -> Decimal {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match table.method {
        BracketMethod::Progressive => progressive(base, &table.brackets),
        BracketMethod::FlatWithDeduction => flat_with_deduction(base, &table.brackets),
    }
}

fn progressive(base: Decimal, brackets: &[TaxBracket]) -> Decimal {
    let mut total = Decimal::ZERO;
    let mut floor = Decimal::ZERO;

    for bracket in brackets {
        if base <= floor {
            break;
        }
        let top = bracket.ceiling.map_or(base, |c| base.min(c));
        total += (top - floor) * bracket.rate;

        match bracket.ceiling {
            Some(ceiling) => floor = ceiling,
            None => break,
        }
    }

    total
}

fn flat_with_deduction(base: Decimal, brackets: &[TaxBracket]) -> Decimal {
    // Bases above the last finite ceiling of a closed table use the last bracket.
    brackets
        .iter()
        .find(|b| b.ceiling.is_none_or(|c| base <= c))
        .or_else(|| brackets.last())
        .map_or(Decimal::ZERO, |b| base * b.rate - b.deduction)
}

/// Calculates the INSS contribution on vacation pay.
///
/// # Examples
///
/// ```
/// use ferias_engine::calculation::calculate_inss;
/// use ferias_engine::config::TaxTables;
/// use rust_decimal::Decimal;
///
/// let tables = TaxTables::clt_2024();
/// let result = calculate_inss(Decimal::new(4000, 0), &tables.inss, 4);
/// assert_eq!(result.amount, Decimal::new(37882, 2));
/// assert!(result.warning.is_none());
/// ```
pub fn calculate_inss(base: Decimal, table: &BracketTable, step_number: u32) -> WithholdingResult {
    let amount = round_currency(evaluate_bracket(base, table));
    let ceiling = table.top_ceiling();
    let capped = table.method == BracketMethod::Progressive
        && table.brackets.last().is_some_and(|b| b.ceiling.is_some())
        && ceiling.is_some_and(|c| base > c);

    let warning = capped.then(|| AuditWarning {
        code: INSS_CEILING_WARNING.to_string(),
        message: format!(
            "INSS base R$ {} exceeds the contribution ceiling; contribution capped",
            base.normalize()
        ),
        severity: "low".to_string(),
    });

    let reasoning = if capped {
        format!(
            "Progressive INSS on R$ {} capped at the ceiling: R$ {}",
            base.normalize(),
            amount
        )
    } else {
        format!("Progressive INSS on R$ {}: R$ {}", base.normalize(), amount)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "inss_withholding".to_string(),
        rule_name: "INSS Withholding".to_string(),
        clause_ref: INSS_CLAUSE.to_string(),
        input: serde_json::json!({
            "base": base.normalize().to_string(),
            "ceiling": ceiling.map(|c| c.normalize().to_string())
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "capped": capped
        }),
        reasoning,
    };

    WithholdingResult {
        taxable_base: base,
        amount,
        warning,
        audit_step,
    }
}

/// Calculates the IRRF withheld on vacation pay.
///
/// The INSS contribution is deductible: the table is applied to
/// `base - inss`. A negative formula result is clamped to zero and reported
/// as a warning.
///
/// # Examples
///
/// ```
/// use ferias_engine::calculation::calculate_irrf;
/// use ferias_engine::config::TaxTables;
/// use rust_decimal::Decimal;
///
/// let tables = TaxTables::clt_2024();
/// // (4000.00 - 378.82) * 15% - 381.44 = 161.737
/// let result = calculate_irrf(Decimal::new(4000, 0), Decimal::new(37882, 2), &tables.irrf, 5);
/// assert_eq!(result.amount, Decimal::new(16174, 2));
/// ```
pub fn calculate_irrf(
    base: Decimal,
    inss: Decimal,
    table: &BracketTable,
    step_number: u32,
) -> WithholdingResult {
    let taxable_base = (base - inss).max(Decimal::ZERO);
    let raw = raw_amount(taxable_base, table);
    let clamped = raw < Decimal::ZERO;
    let amount = round_currency(raw.max(Decimal::ZERO));

    let warning = clamped.then(|| AuditWarning {
        code: IRRF_CLAMP_WARNING.to_string(),
        message: format!(
            "IRRF formula gave R$ {} for base R$ {}; withholding set to zero",
            round_currency(raw),
            taxable_base.normalize()
        ),
        severity: "low".to_string(),
    });

    let audit_step = AuditStep {
        step_number,
        rule_id: "irrf_withholding".to_string(),
        rule_name: "IRRF Withholding".to_string(),
        clause_ref: IRRF_CLAUSE.to_string(),
        input: serde_json::json!({
            "base": base.normalize().to_string(),
            "inss_deduction": inss.normalize().to_string(),
            "taxable_base": taxable_base.normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "clamped": clamped
        }),
        reasoning: format!(
            "IRRF on R$ {} (R$ {} less INSS R$ {}): R$ {}",
            taxable_base.normalize(),
            base.normalize(),
            inss.normalize(),
            amount
        ),
    };

    WithholdingResult {
        taxable_base,
        amount,
        warning,
        audit_step,
    }
}
