//! Narrative summary of a vacation calculation, in Portuguese.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::format::{format_currency, format_date};
use crate::models::VacationRequest;

use super::composition::VacationAmounts;
use super::timeline::{
    NEXT_FULL_SALARY, PRO_RATA_LEAVE_MONTH, PRO_RATA_RETURN, SALARY_BEFORE_LEAVE, TimelineResult,
};

/// Writes the explanation shown with the result.
pub fn explain(
    request: &VacationRequest,
    amounts: &VacationAmounts,
    timeline: &TimelineResult,
) -> String {
    let window = &timeline.window;
    let mut sentences = Vec::with_capacity(6);

    sentences.push(format!(
        "Suas férias de {} dias vão de {} a {}.",
        request.vacation_days,
        format_date(window.start),
        format_date(window.end)
    ));

    sentences.push(format!(
        "O valor líquido de {} deve ser pago até {}, dois dias antes do início.",
        format_currency(amounts.net),
        format_date(window.payment_date)
    ));

    if let Some(pro_rata) = timeline.event(PRO_RATA_LEAVE_MONTH) {
        sentences.push(format!(
            "Os dias trabalhados no mês das férias rendem {} em {}.",
            format_currency(pro_rata.amount),
            pro_rata.display_date
        ));
    } else if window.start.day() == 1 {
        sentences.push(
            "Como as férias começam no primeiro dia do mês, não há salário proporcional antes do descanso."
                .to_string(),
        );
    } else if let Some(salary) = timeline.event(SALARY_BEFORE_LEAVE) {
        sentences.push(format!(
            "Como as férias começam depois do dia de pagamento, o salário de {} é pago integralmente em {}.",
            format_currency(salary.amount),
            salary.display_date
        ));
    }

    if request.sold_days > 0 {
        sentences.push(format!(
            "A venda de {} dias rende {} de abono pecuniário, já com o 1/3 constitucional.",
            request.sold_days,
            format_currency(amounts.sold_pay + amounts.sold_bonus)
        ));
    }

    if amounts.advance_13th > Decimal::ZERO {
        sentences.push(format!(
            "O adiantamento de {} do 13º salário é pago junto com as férias.",
            format_currency(amounts.advance_13th)
        ));
    }

    let mut back = format!("Você volta ao trabalho em {}.", format_date(window.return_date));
    if let Some(pro_rata) = timeline.event(PRO_RATA_RETURN) {
        back.push_str(&format!(
            " O salário proporcional de {} é pago em {}.",
            format_currency(pro_rata.amount),
            pro_rata.display_date
        ));
    } else if let Some(next) = timeline.event(NEXT_FULL_SALARY) {
        back.push_str(&format!(
            " O próximo salário completo, de {}, é pago em {}.",
            format_currency(next.amount),
            next.display_date
        ));
    }
    sentences.push(back);

    sentences.join(" ")
}
