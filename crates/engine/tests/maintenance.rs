//! Maintenance schedules: the km sweep, alerts, and accept/decline.

mod common;

use common::{USER, bank, engine, fill_up, vehicle};
use engine::{EngineError, MaintenanceStatus, ScheduleCmd, TransactionListFilter};

fn schedule(vehicle_id: &str, start_km: i64, target_km: i64) -> ScheduleCmd {
    ScheduleCmd {
        vehicle_id: vehicle_id.to_string(),
        category: "Oil change".to_string(),
        amount_minor: 50_000,
        start_km,
        target_km,
    }
}

/// Latest odometer reading comes from fill-ups; push it to `end_km`.
async fn drive_to(engine: &engine::Engine, vehicle_id: &str, bank_id: &str, end_km: i64) {
    engine
        .record_fill_up(fill_up(vehicle_id, bank_id, end_km - 100, end_km, 10_000, 9_000))
        .await
        .unwrap();
}

#[tokio::test]
async fn schedule_starts_pending_before_the_target() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    drive_to(&engine, &vehicle_id, &bank_id, 1_200).await;

    let id = engine
        .new_maintenance_schedule(schedule(&vehicle_id, 1_000, 500))
        .await
        .unwrap();

    let row = engine.maintenance_schedule(&id).await.unwrap();
    assert_eq!(row.total_km, 200);
    assert_eq!(row.status, MaintenanceStatus::Pending.as_str());
}

#[tokio::test]
async fn sweep_flips_to_due_at_the_target() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    drive_to(&engine, &vehicle_id, &bank_id, 1_200).await;

    let id = engine
        .new_maintenance_schedule(schedule(&vehicle_id, 1_000, 500))
        .await
        .unwrap();

    drive_to(&engine, &vehicle_id, &bank_id, 1_500).await;
    let summary = engine.run_maintenance_sweep().await.unwrap();
    assert_eq!(summary.checked, 1);
    assert_eq!(summary.due, 1);
    assert_eq!(summary.alerts_opened, 1);

    let row = engine.maintenance_schedule(&id).await.unwrap();
    assert_eq!(row.total_km, 500);
    assert_eq!(row.status, MaintenanceStatus::Due.as_str());

    let alerts = engine.list_open_alerts().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].schedule_id, id);

    // A second sweep does not open a duplicate alert.
    let summary = engine.run_maintenance_sweep().await.unwrap();
    assert_eq!(summary.alerts_opened, 0);
    assert_eq!(engine.list_open_alerts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn ten_percent_past_the_target_is_overdue() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    drive_to(&engine, &vehicle_id, &bank_id, 1_550).await;

    let id = engine
        .new_maintenance_schedule(schedule(&vehicle_id, 1_000, 500))
        .await
        .unwrap();

    let row = engine.maintenance_schedule(&id).await.unwrap();
    assert_eq!(row.total_km, 550);
    assert_eq!(row.status, MaintenanceStatus::Overdue.as_str());
}

#[tokio::test]
async fn accepting_charges_the_bank_and_completes() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    drive_to(&engine, &vehicle_id, &bank_id, 1_500).await;

    let id = engine
        .new_maintenance_schedule(schedule(&vehicle_id, 1_000, 500))
        .await
        .unwrap();
    engine.run_maintenance_sweep().await.unwrap();

    let balance_before = engine.bank(&bank_id).await.unwrap().balance_minor;
    engine
        .accept_maintenance(&id, &bank_id, None, USER)
        .await
        .unwrap();

    let row = engine.maintenance_schedule(&id).await.unwrap();
    assert_eq!(row.status, MaintenanceStatus::Completed.as_str());
    assert_eq!(row.end_km, Some(1_500));
    assert!(row.expense_id.is_some());

    assert_eq!(
        engine.bank(&bank_id).await.unwrap().balance_minor,
        balance_before - 50_000
    );
    assert!(engine.list_open_alerts().await.unwrap().is_empty());

    let expenses = engine.list_expenses(None, None).await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category, "Maintenance");
    assert_eq!(expenses[0].maintenance_id.as_deref(), Some(id.as_str()));

    // Terminal: a second accept is refused.
    let err = engine
        .accept_maintenance(&id, &bank_id, None, USER)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
}

#[tokio::test]
async fn pending_schedule_cannot_be_accepted() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    drive_to(&engine, &vehicle_id, &bank_id, 1_100).await;

    let id = engine
        .new_maintenance_schedule(schedule(&vehicle_id, 1_000, 500))
        .await
        .unwrap();

    let err = engine
        .accept_maintenance(&id, &bank_id, None, USER)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
    assert!(
        engine
            .list_transactions(TransactionListFilter::default())
            .await
            .unwrap()
            .len()
            == 1 // only the fill-up posting
    );
}

#[tokio::test]
async fn declining_closes_the_alert_without_spending() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    drive_to(&engine, &vehicle_id, &bank_id, 1_500).await;

    let id = engine
        .new_maintenance_schedule(schedule(&vehicle_id, 1_000, 500))
        .await
        .unwrap();
    engine.run_maintenance_sweep().await.unwrap();
    let balance_before = engine.bank(&bank_id).await.unwrap().balance_minor;

    engine.decline_maintenance(&id).await.unwrap();

    let row = engine.maintenance_schedule(&id).await.unwrap();
    assert_eq!(row.status, MaintenanceStatus::Pending.as_str());
    assert!(engine.list_open_alerts().await.unwrap().is_empty());
    assert_eq!(
        engine.bank(&bank_id).await.unwrap().balance_minor,
        balance_before
    );
}
