//! End-to-end checks over the HTTP surface with an in-memory database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveValue, Database, EntityTrait};
use serde_json::{Value, json};
use tower::ServiceExt;

const USERNAME: &str = "admin";
const PASSWORD: &str = "secret";

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    engine::users::Entity::insert(engine::users::ActiveModel {
        username: ActiveValue::Set(USERNAME.to_string()),
        password: ActiveValue::Set(PASSWORD.to_string()),
    })
    .exec(&db)
    .await
    .unwrap();

    let engine = engine::Engine::builder().database(db.clone()).build();
    server::app(engine, db)
}

fn basic_auth() -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{USERNAME}:{PASSWORD}"));
    format!("Basic {encoded}")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth());
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_bank(app: &Router, name: &str, account_no: &str, opening: i64) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/banks",
        Some(json!({
            "name": name,
            "account_no": account_no,
            "opening_balance_minor": opening,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = app().await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/banks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = app().await;
    let encoded = base64::engine::general_purpose::STANDARD.encode("admin:wrong");
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/banks")
                .header(header::AUTHORIZATION, format!("Basic {encoded}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bank_create_fetch_and_owner() {
    let app = app().await;
    let id = create_bank(&app, "Operating", "OP-001", 50_000).await;

    let (status, bank) = send_json(&app, "GET", &format!("/banks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bank["name"], "Operating");
    assert_eq!(bank["balance_minor"], 50_000);
    assert_eq!(bank["owner"], USERNAME);
}

#[tokio::test]
async fn unknown_bank_is_404() {
    let app = app().await;
    let (status, body) = send_json(&app, "GET", "/banks/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("bank"));
}

#[tokio::test]
async fn transfer_moves_money_between_banks() {
    let app = app().await;
    let from = create_bank(&app, "Operating", "OP-001", 100_000).await;
    let to = create_bank(&app, "Reserve", "RS-001", 0).await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/transfers",
        Some(json!({
            "from_bank_id": from,
            "to_bank_id": to,
            "amount_minor": 30_000,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, from_bank) = send_json(&app, "GET", &format!("/banks/{from}"), None).await;
    let (_, to_bank) = send_json(&app, "GET", &format!("/banks/{to}"), None).await;
    assert_eq!(from_bank["balance_minor"], 70_000);
    assert_eq!(to_bank["balance_minor"], 30_000);

    let (status, body) = send_json(&app, "GET", "/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["kind"], "transfer");
}

#[tokio::test]
async fn overdrawn_transfer_is_rejected() {
    let app = app().await;
    let from = create_bank(&app, "Operating", "OP-001", 100).await;
    let to = create_bank(&app, "Reserve", "RS-001", 0).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/transfers",
        Some(json!({
            "from_bank_id": from,
            "to_bank_id": to,
            "amount_minor": 500,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("holds"));

    let (_, from_bank) = send_json(&app, "GET", &format!("/banks/{from}"), None).await;
    assert_eq!(from_bank["balance_minor"], 100);
}

#[tokio::test]
async fn income_lifecycle_over_http() {
    let app = app().await;
    let bank = create_bank(&app, "Operating", "OP-001", 0).await;

    let (status, created) = send_json(
        &app,
        "POST",
        "/incomes",
        Some(json!({
            "bank_id": bank,
            "amount_minor": 12_500,
            "category": "Brokerage",
            "note": "monthly settlement",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let income_id = created["id"].as_str().unwrap().to_string();

    let (_, bank_view) = send_json(&app, "GET", &format!("/banks/{bank}"), None).await;
    assert_eq!(bank_view["balance_minor"], 12_500);

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/incomes/{income_id}"),
        Some(json!({ "amount_minor": 10_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, bank_view) = send_json(&app, "GET", &format!("/banks/{bank}"), None).await;
    assert_eq!(bank_view["balance_minor"], 10_000);

    let (status, _) = send_json(&app, "DELETE", &format!("/incomes/{income_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, bank_view) = send_json(&app, "GET", &format!("/banks/{bank}"), None).await;
    assert_eq!(bank_view["balance_minor"], 0);
}

#[tokio::test]
async fn trip_cascade_over_http() {
    let app = app().await;
    let bank = create_bank(&app, "Operating", "OP-001", 10_000_000).await;

    let (status, vehicle) = send_json(
        &app,
        "POST",
        "/vehicles",
        Some(json!({ "name": "Tanker 1", "registration_no": "KA-01-1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let vehicle_id = vehicle["id"].as_str().unwrap().to_string();

    let (status, driver) = send_json(
        &app,
        "POST",
        "/drivers",
        Some(json!({ "name": "R. Kumar" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let driver_id = driver["id"].as_str().unwrap().to_string();

    let (status, customer) = send_json(
        &app,
        "POST",
        "/customers",
        Some(json!({ "name": "Acme Cements" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let customer_id = customer["id"].as_str().unwrap().to_string();

    // Fill up 100 litres over 1000 km: mileage 10 km/L.
    let (status, _) = send_json(
        &app,
        "POST",
        "/fuel-tracking",
        Some(json!({
            "vehicle_id": vehicle_id,
            "bank_id": bank,
            "start_km": 0,
            "end_km": 1000,
            "quantity_milli": 100_000,
            "rate_minor": 90_000,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, created) = send_json(
        &app,
        "POST",
        "/trips",
        Some(json!({
            "vehicle_id": vehicle_id,
            "driver_id": driver_id,
            "start_km": 1000,
            "end_km": 1100,
            "start_date": "2026-08-01",
            "end_date": "2026-08-02",
            "routes": [{
                "customer_id": customer_id,
                "bank_id": bank,
                "rate_minor": 500_000,
                "weight_milli": 10_000,
                "advance_minor": 1_000_000,
            }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let trip_id = created["id"].as_str().unwrap().to_string();

    let (status, trip) = send_json(&app, "GET", &format!("/trips/{trip_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trip["status"], "draft");
    // 100 km at 10 km/L needs 10 L; at 90 minor/mL rate that is 900_000 minor.
    assert_eq!(trip["diesel_cost_minor"], 900_000);
    assert_eq!(trip["route_cost_minor"], 5_000_000);

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/trips/{trip_id}"),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, invoices) = send_json(&app, "GET", "/invoices", None).await;
    assert_eq!(status, StatusCode::OK);
    let invoices = invoices.as_array().unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["trip_id"].as_str().unwrap(), trip_id);
    assert_eq!(invoices[0]["status"], "pending");
}

#[tokio::test]
async fn report_download_renders_csv() {
    let app = app().await;
    let bank = create_bank(&app, "Operating", "OP-001", 1_000).await;
    let _ = bank;

    let (status, bytes) = send(&app, "GET", "/reports/download?module=transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.lines().next().unwrap().contains("kind"));
}

#[tokio::test]
async fn report_rejects_unknown_module() {
    let app = app().await;
    let (status, body) = send_json(&app, "GET", "/reports/download?module=payroll", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("payroll"));
}
