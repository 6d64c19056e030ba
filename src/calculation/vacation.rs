//! The vacation pay calculation entry point.

use tracing::debug;

use crate::config::TaxTables;
use crate::error::EngineResult;
use crate::models::{AuditTrace, EmploymentProfile, VacationRequest, VacationResult};

use super::composition::compose_amounts;
use super::explanation::explain;
use super::timeline::build_timeline;

/// Calculates vacation pay for a profile and request.
///
/// The calculation is a pure function of its inputs: identical inputs give
/// identical results.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidProfile`] or
/// [`crate::error::EngineError::InvalidRequest`] when the inputs are out of
/// range, and [`crate::error::EngineError::CalculationError`] when a date
/// leaves the representable calendar.
///
/// # Example
///
/// ```
/// use ferias_engine::calculation::calculate_vacation;
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
/// let result = calculate_vacation(&profile, &request, &TaxTables::clt_2024()).unwrap();
/// assert_eq!(result.liquido_ferias, Decimal::new(345944, 2));
/// assert_eq!(result.timeline.len(), 5);
/// ```
pub fn calculate_vacation(
    profile: &EmploymentProfile,
    request: &VacationRequest,
    tables: &TaxTables,
) -> EngineResult<VacationResult> {
    profile.validate()?;
    request.validate()?;

    let composition = compose_amounts(profile, request, tables, 1);
    let amounts = composition.amounts;

    let timeline_step = composition.audit_steps.len() as u32 + 1;
    let timeline = build_timeline(profile, request, &amounts, timeline_step)?;
    let explicacao_texto = explain(request, &amounts, &timeline);

    debug!(
        start_date = %request.start_date,
        tables = %tables.effective_date,
        net = %amounts.net,
        events = timeline.events.len(),
        "Vacation pay calculated"
    );

    let mut steps = composition.audit_steps;
    steps.push(timeline.audit_step);

    Ok(VacationResult {
        remuneracao_base: amounts.remuneration,
        valor_dia: amounts.daily_rate,
        ferias_gozadas_bruto: amounts.vacation_pay,
        terco_constitucional_gozado: amounts.vacation_bonus,
        abono_pecuniario_bruto: amounts.sold_pay,
        terco_constitucional_abono: amounts.sold_bonus,
        advance_13th_value: amounts.advance_13th,
        total_ferias_bruto: amounts.total_gross,
        base_inss_ferias: amounts.inss_base,
        desconto_inss_ferias: amounts.inss,
        base_irrf_ferias: amounts.irrf_base,
        desconto_irrf_ferias: amounts.irrf,
        liquido_ferias: amounts.net,
        timeline: timeline.events,
        breakdown: composition.breakdown,
        explicacao_texto,
        audit_trace: AuditTrace {
            steps,
            warnings: composition.warnings,
        },
    })
}
