//! Integration tests for the vacation pay engine.
//!
//! This test suite drives the HTTP router end to end:
//! - Reference scenarios (full month, sold days, 13th advance, partial month)
//! - Payment timeline placement
//! - Tax table selection by start date
//! - Simulation history
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use ferias_engine::api::{AppState, EARLIEST_TABLES_WARNING, create_router};
use ferias_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/clt").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal as string")).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

async fn post_calculate(router: Router, body: Value) -> (StatusCode, Value) {
    send(router, "POST", "/calculate", Some(body)).await
}

fn create_request(
    salary: &str,
    payment_period: &str,
    start_date: &str,
    vacation_days: u32,
    sold_days: u32,
    advance_13th: bool,
) -> Value {
    json!({
        "profile": {
            "base_salary": salary,
            "payment_period": payment_period,
            "contract_type": "indefinite",
            "payment_frequency": "monthly"
        },
        "vacation": {
            "start_date": start_date,
            "vacation_days": vacation_days,
            "sold_days": sold_days,
            "advance_13th": advance_13th
        }
    })
}

fn timeline(result: &Value) -> Vec<(String, String, Decimal)> {
    result["timeline"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["date"].as_str().unwrap().to_string(),
                e["label"].as_str().unwrap().to_string(),
                decimal(&e["amount"]),
            )
        })
        .collect()
}

fn assert_balanced(result: &Value) {
    let mut net = Decimal::ZERO;
    for line in result["breakdown"].as_array().unwrap() {
        match line["kind"].as_str().unwrap() {
            "credit" => net += decimal(&line["value"]),
            "debit" => net -= decimal(&line["value"]),
            other => panic!("unexpected line kind {}", other),
        }
    }
    assert_eq!(net, decimal(&result["liquido_ferias"]));
}

fn assert_has_audit_step_with_clause(result: &Value, clause_contains: &str) {
    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    assert!(
        steps
            .iter()
            .any(|s| s["clause_ref"].as_str().unwrap().contains(clause_contains)),
        "no audit step references {}",
        clause_contains
    );
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[tokio::test]
async fn test_full_month_no_sale() {
    let body = create_request("3000.00", "early", "2024-06-10", 30, 0, false);
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&result["valor_dia"]), dec("100"));
    assert_eq!(decimal(&result["ferias_gozadas_bruto"]), dec("3000"));
    assert_eq!(decimal(&result["terco_constitucional_gozado"]), dec("1000"));
    assert_eq!(decimal(&result["total_ferias_bruto"]), dec("4000"));
    assert_eq!(decimal(&result["base_inss_ferias"]), dec("4000"));
    assert_eq!(decimal(&result["desconto_inss_ferias"]), dec("378.82"));
    assert_eq!(decimal(&result["base_irrf_ferias"]), dec("4000"));
    assert_eq!(decimal(&result["desconto_irrf_ferias"]), dec("161.74"));
    assert_eq!(decimal(&result["liquido_ferias"]), dec("3459.44"));
    assert_balanced(&result);

    assert_eq!(result["breakdown"].as_array().unwrap().len(), 4);
    assert!(result["explicacao_texto"].as_str().unwrap().contains("R$ 3.459,44"));
}

#[tokio::test]
async fn test_ten_days_sold() {
    let body = create_request("3000.00", "early", "2024-06-10", 30, 10, false);
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&result["abono_pecuniario_bruto"]), dec("1000"));
    assert_eq!(decimal(&result["terco_constitucional_abono"]), dec("333.33"));
    assert_eq!(decimal(&result["total_ferias_bruto"]), dec("5333.33"));
    assert_eq!(decimal(&result["desconto_inss_ferias"]), dec("565.49"));
    assert_eq!(decimal(&result["base_irrf_ferias"]), dec("4000"));
    assert_eq!(decimal(&result["desconto_irrf_ferias"]), dec("133.74"));
    assert_eq!(decimal(&result["liquido_ferias"]), dec("4634.10"));
    assert_balanced(&result);

    let labels: Vec<&str> = result["breakdown"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["label"].as_str().unwrap())
        .collect();
    assert!(labels.contains(&"Abono pecuniário (10 dias vendidos)"));
    assert!(labels.contains(&"1/3 constitucional sobre venda"));
    assert_has_audit_step_with_clause(&result, "CLT art. 143");
}

#[tokio::test]
async fn test_advance_13th() {
    let body = create_request("3000.00", "early", "2024-06-10", 30, 0, true);
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&result["advance_13th_value"]), dec("1500"));
    assert_eq!(decimal(&result["desconto_inss_ferias"]), dec("378.82"));
    assert_eq!(decimal(&result["liquido_ferias"]), dec("4959.44"));
    assert_balanced(&result);

    let vacation = result["timeline"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["kind"] == "vacation")
        .unwrap();
    assert!(vacation["description"].as_str().unwrap().contains("13º"));
    assert_has_audit_step_with_clause(&result, "Lei 4.749/1965");
}

#[tokio::test]
async fn test_partial_month_mid_payer() {
    let body = create_request("2500.00", "mid", "2024-03-11", 20, 0, false);
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&result["ferias_gozadas_bruto"]), dec("1666.67"));
    assert_eq!(decimal(&result["terco_constitucional_gozado"]), dec("555.56"));
    assert_eq!(decimal(&result["desconto_inss_ferias"]), dec("178.82"));
    assert_eq!(decimal(&result["desconto_irrf_ferias"]), Decimal::ZERO);
    assert_eq!(decimal(&result["liquido_ferias"]), dec("2043.41"));

    assert_eq!(
        timeline(&result),
        vec![
            ("2024-02-15".to_string(), "Salário do mês anterior".to_string(), dec("2500")),
            ("2024-03-09".to_string(), "Pagamento de férias".to_string(), dec("2043.41")),
            ("2024-03-11".to_string(), "Início das férias".to_string(), Decimal::ZERO),
            ("2024-03-30".to_string(), "Fim das férias".to_string(), Decimal::ZERO),
            (
                "2024-03-15".to_string(),
                "Salário proporcional (mês das férias)".to_string(),
                dec("833.33")
            ),
            ("2024-04-15".to_string(), "Próximo salário completo".to_string(), dec("2500")),
        ]
    );
}

#[tokio::test]
async fn test_variable_pay_included() {
    let body = json!({
        "profile": {
            "base_salary": "2500.00",
            "has_variable_pay": true,
            "variable_pay_average": "500.00"
        },
        "vacation": {"start_date": "2024-06-10", "vacation_days": 30}
    });
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&result["remuneracao_base"]), dec("3000"));
    assert_eq!(decimal(&result["liquido_ferias"]), dec("3459.44"));
}

#[tokio::test]
async fn test_high_salary_reaches_inss_ceiling() {
    let body = create_request("12000.00", "early", "2024-06-10", 30, 0, false);
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&result["desconto_inss_ferias"]), dec("908.86"));
    let warnings = result["audit_trace"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["code"], "INSS_CEILING_REACHED");
    assert_balanced(&result);
}

// =============================================================================
// Timeline
// =============================================================================

#[tokio::test]
async fn test_timeline_events_carry_display_dates() {
    let body = create_request("3000.00", "early", "2024-06-10", 30, 0, false);
    let (_, result) = post_calculate(create_router_for_test(), body).await;

    let events = result["timeline"].as_array().unwrap();
    assert_eq!(events.len(), 5);
    assert_eq!(events[1]["date"], "2024-06-08");
    assert_eq!(events[1]["display_date"], "08/06/2024");
    assert_eq!(events[1]["kind"], "vacation");
    assert_eq!(events[2]["kind"], "info");
    assert_eq!(events[4]["date"], "2024-08-05");
}

#[tokio::test]
async fn test_timeline_across_new_year() {
    let body = create_request("3000.00", "early", "2025-01-03", 30, 0, false);
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    let dates: Vec<String> = timeline(&result).into_iter().map(|(d, _, _)| d).collect();
    assert_eq!(
        dates,
        vec![
            "2024-12-05",
            "2025-01-01",
            "2025-01-03",
            "2025-02-01",
            "2025-01-05",
            "2025-02-05"
        ]
    );
}

#[tokio::test]
async fn test_pay_day_override_clamps_in_february() {
    let body = json!({
        "profile": {"base_salary": "3000.00", "pay_day": 30},
        "vacation": {"start_date": "2023-03-10", "vacation_days": 10}
    });
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    let first = &result["timeline"][0];
    assert_eq!(first["date"], "2023-02-28");
    assert!(first["description"].as_str().unwrap().contains("último dia do mês"));
}

// =============================================================================
// Tax table selection
// =============================================================================

#[tokio::test]
async fn test_2023_tables_apply_before_2024() {
    let body = create_request("3000.00", "early", "2023-12-15", 30, 0, false);
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    // 1320.00 * 7.5% + 1251.29 * 9% + 1285.65 * 12% + 143.06 * 14%
    assert_eq!(decimal(&result["desconto_inss_ferias"]), dec("385.92"));
    // (4000.00 - 385.92) * 15% - 370.40
    assert_eq!(decimal(&result["desconto_irrf_ferias"]), dec("171.71"));
    assert_balanced(&result);
}

#[tokio::test]
async fn test_start_before_any_table_uses_earliest_tables() {
    let body = create_request("3000.00", "early", "2020-01-10", 30, 0, false);
    let (status, result) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::OK);
    // Same figures as the 2023-05-01 tables
    assert_eq!(decimal(&result["desconto_inss_ferias"]), dec("385.92"));
    assert_eq!(decimal(&result["desconto_irrf_ferias"]), dec("171.71"));
    assert_balanced(&result);

    let warnings = result["audit_trace"]["warnings"].as_array().unwrap();
    let warning = warnings
        .iter()
        .find(|w| w["code"] == EARLIEST_TABLES_WARNING)
        .expect("earliest tables warning");
    assert!(warning["message"].as_str().unwrap().contains("2023-05-01"));
}

#[tokio::test]
async fn test_tables_in_force_raise_no_fallback_warning() {
    let body = create_request("3000.00", "early", "2024-06-10", 30, 0, false);
    let (_, result) = post_calculate(create_router_for_test(), body).await;

    let warnings = result["audit_trace"]["warnings"].as_array().unwrap();
    assert!(warnings.iter().all(|w| w["code"] != EARLIEST_TABLES_WARNING));
}

// =============================================================================
// Simulation history
// =============================================================================

#[tokio::test]
async fn test_simulations_are_recorded_newest_first() {
    let router = create_router_for_test();

    let (status, first) = send(
        router.clone(),
        "POST",
        "/simulations",
        Some(create_request("3000.00", "early", "2024-06-10", 30, 0, false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(decimal(&first["result"]["liquido_ferias"]), dec("3459.44"));
    assert!(first["id"].as_str().is_some());

    let (status, second) = send(
        router.clone(),
        "POST",
        "/simulations",
        Some(create_request("2500.00", "mid", "2024-03-11", 20, 0, false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = send(router.clone(), "GET", "/simulations", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], second["id"]);
    assert_eq!(list[1]["id"], first["id"]);
    assert_eq!(list[0]["request"]["vacation_days"], 20);
}

#[tokio::test]
async fn test_clear_simulations() {
    let router = create_router_for_test();

    send(
        router.clone(),
        "POST",
        "/simulations",
        Some(create_request("3000.00", "early", "2024-06-10", 30, 0, false)),
    )
    .await;

    let (status, body) = send(router.clone(), "DELETE", "/simulations", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, list) = send(router, "GET", "/simulations", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_simulation_is_not_recorded() {
    let router = create_router_for_test();

    let (status, _) = send(
        router.clone(),
        "POST",
        "/simulations",
        Some(create_request("3000.00", "early", "2024-06-10", 3, 0, false)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(router, "GET", "/simulations", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_simulations_persist_to_history_file() {
    let path = std::env::temp_dir().join(format!("ferias-it-{}.json", uuid::Uuid::new_v4()));
    let config = ConfigLoader::load("./config/clt").unwrap();
    let router = create_router(AppState::with_history_file(config, &path).unwrap());

    let (status, record) = send(
        router,
        "POST",
        "/simulations",
        Some(create_request("3000.00", "early", "2024-06-10", 30, 0, false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A fresh server sees the stored simulation
    let config = ConfigLoader::load("./config/clt").unwrap();
    let router = create_router(AppState::with_history_file(config, &path).unwrap());
    let (_, list) = send(router, "GET", "/simulations", None).await;
    std::fs::remove_file(&path).ok();

    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], record["id"]);
}

#[tokio::test]
async fn test_get_simulation_by_id() {
    let router = create_router_for_test();

    let (_, record) = send(
        router.clone(),
        "POST",
        "/simulations",
        Some(create_request("3000.00", "early", "2024-06-10", 30, 0, false)),
    )
    .await;
    let id = record["id"].as_str().unwrap();

    let (status, found) = send(router.clone(), "GET", &format!("/simulations/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], record["id"]);
    assert_eq!(decimal(&found["result"]["liquido_ferias"]), dec("3459.44"));

    let unknown = uuid::Uuid::new_v4();
    let (status, error) = send(router, "GET", &format!("/simulations/{}", unknown), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "SIMULATION_NOT_FOUND");
}

fn unwritable_history_path() -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("ferias-missing-{}", uuid::Uuid::new_v4()))
        .join("history.json")
}

#[tokio::test]
async fn test_failed_save_does_not_record_simulation() {
    let config = ConfigLoader::load("./config/clt").unwrap();
    let router = create_router(AppState::with_history_file(config, unwritable_history_path()).unwrap());

    let (status, error) = send(
        router.clone(),
        "POST",
        "/simulations",
        Some(create_request("3000.00", "early", "2024-06-10", 30, 0, false)),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["code"], "HISTORY_ERROR");

    let (status, list) = send(router, "GET", "/simulations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_save_does_not_clear_simulations() {
    let dir = std::env::temp_dir().join(format!("ferias-dir-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir(&dir).unwrap();
    let path = dir.join("history.json");
    let config = ConfigLoader::load("./config/clt").unwrap();
    let router = create_router(AppState::with_history_file(config, &path).unwrap());

    let (status, _) = send(
        router.clone(),
        "POST",
        "/simulations",
        Some(create_request("3000.00", "early", "2024-06-10", 30, 0, false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Removing the directory makes the next save fail
    std::fs::remove_dir_all(&dir).unwrap();

    let (status, error) = send(router.clone(), "DELETE", "/simulations", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error["code"], "HISTORY_ERROR");

    let (_, list) = send(router, "GET", "/simulations", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_error_malformed_json() {
    let router = create_router_for_test();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from("{ invalid json }"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_missing_vacation() {
    let body = json!({"profile": {"base_salary": "3000.00"}});
    let (status, error) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_error_missing_start_date() {
    let body = json!({"vacation": {"vacation_days": 30}});
    let (status, error) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["message"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn test_error_invalid_payment_period() {
    let body = json!({
        "profile": {"base_salary": "3000.00", "payment_period": "weekly"},
        "vacation": {"start_date": "2024-06-10", "vacation_days": 30}
    });
    let (status, error) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_error_too_few_vacation_days() {
    let body = create_request("3000.00", "early", "2024-06-10", 4, 0, false);
    let (status, error) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_REQUEST");
    assert!(error["message"].as_str().unwrap().contains("vacation_days"));
}

#[tokio::test]
async fn test_error_too_many_sold_days() {
    let body = create_request("3000.00", "early", "2024-06-10", 15, 6, false);
    let (status, error) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_REQUEST");
    assert!(error["message"].as_str().unwrap().contains("sold_days"));
}

#[tokio::test]
async fn test_error_negative_salary() {
    let body = create_request("-100.00", "early", "2024-06-10", 30, 0, false);
    let (status, error) = post_calculate(create_router_for_test(), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PROFILE");
}
