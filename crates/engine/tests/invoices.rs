//! Manual invoices and the trip-keyed guard.

mod common;

use common::{USER, bank, customer, driver, engine, fill_up, vehicle};
use engine::{
    EngineError, InvoiceCmd, InvoiceRowCmd, InvoiceStatus, InvoiceUpdate, ReportModule, RouteCmd,
    RouteStatus, TripCmd,
};

fn invoice(lr_no: &str, customer_id: &str) -> InvoiceCmd {
    InvoiceCmd {
        lr_no: lr_no.to_string(),
        customer_id: customer_id.to_string(),
        rows: vec![
            InvoiceRowCmd {
                description: "Freight".to_string(),
                amount_minor: 80_000,
            },
            InvoiceRowCmd {
                description: "Loading".to_string(),
                amount_minor: 20_000,
            },
        ],
        tax_permille: 50,
        advance_minor: 30_000,
        occurred_at: None,
    }
}

#[tokio::test]
async fn invoice_totals_follow_rows_tax_and_advance() {
    let engine = engine().await;
    let customer_id = customer(&engine, "Acme Cements").await;

    let id = engine
        .new_invoice(invoice("LR-2026-001", &customer_id))
        .await
        .unwrap();

    let (row, items) = engine.invoice(&id).await.unwrap();
    assert_eq!(items.len(), 2);
    // 100_000 rows + 5% tax, 30_000 already advanced.
    assert_eq!(row.tax_amount_minor, 5_000);
    assert_eq!(row.total_minor, 105_000);
    assert_eq!(row.remaining_minor, 75_000);
    assert_eq!(row.status, InvoiceStatus::Pending.as_str());
}

#[tokio::test]
async fn duplicate_lr_no_is_rejected() {
    let engine = engine().await;
    let customer_id = customer(&engine, "Acme Cements").await;
    engine
        .new_invoice(invoice("LR-2026-001", &customer_id))
        .await
        .unwrap();

    let err = engine
        .new_invoice(invoice("LR-2026-001", &customer_id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn settling_the_advance_marks_the_invoice_paid() {
    let engine = engine().await;
    let customer_id = customer(&engine, "Acme Cements").await;
    let id = engine
        .new_invoice(invoice("LR-2026-001", &customer_id))
        .await
        .unwrap();

    engine
        .update_invoice(
            &id,
            InvoiceUpdate {
                advance_minor: Some(105_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (row, _) = engine.invoice(&id).await.unwrap();
    assert_eq!(row.remaining_minor, 0);
    assert_eq!(row.status, InvoiceStatus::Paid.as_str());
}

#[tokio::test]
async fn trip_spawned_invoices_are_managed_by_the_trip() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    let driver_id = driver(&engine, "R. Kumar").await;
    let customer_id = customer(&engine, "Acme Cements").await;
    engine
        .record_fill_up(fill_up(&vehicle_id, &bank_id, 0, 1_000, 100_000, 9_000))
        .await
        .unwrap();

    engine
        .new_trip(TripCmd {
            vehicle_id,
            driver_id,
            start_km: 1_000,
            end_km: 1_100,
            start_date: "2026-08-01".parse().unwrap(),
            end_date: "2026-08-01".parse().unwrap(),
            routes: vec![RouteCmd {
                customer_id,
                bank_id,
                rate_minor: 500_000,
                weight_milli: 10_000,
                amount_minor: None,
                advance_minor: 0,
                expenses: Vec::new(),
                status: RouteStatus::Completed,
            }],
            occurred_at: None,
            created_by: USER.to_string(),
        })
        .await
        .unwrap();

    let invoices = engine.list_invoices().await.unwrap();
    assert_eq!(invoices.len(), 1);
    let invoice_id = invoices[0].0.id.clone();

    let err = engine
        .update_invoice(
            &invoice_id,
            InvoiceUpdate {
                advance_minor: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));

    let err = engine.delete_invoice(&invoice_id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
}

#[tokio::test]
async fn reports_project_the_ledger() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    engine
        .record_fill_up(fill_up(&vehicle_id, &bank_id, 0, 1_000, 100_000, 9_000))
        .await
        .unwrap();

    let table = engine
        .report(ReportModule::Transactions, None, None)
        .await
        .unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.headers.len(), table.rows[0].len());

    let table = engine.report(ReportModule::Fuel, None, None).await.unwrap();
    assert_eq!(table.rows.len(), 1);
    // Millilitre quantities render as litres.
    assert!(table.rows[0].iter().any(|cell| cell == "100.000"));
}
