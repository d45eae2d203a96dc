//! Fuel fill-ups: mileage, bank postings, and the carry-forward chain.

mod common;

use common::{USER, bank, engine, fill_up, ts, vehicle};
use engine::{EngineError, FillUpCmd, FillUpUpdate};

#[tokio::test]
async fn fill_up_charges_the_bank_and_derives_mileage() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 1_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;

    // 100 L over 1000 km at 90 minor per litre-milli rate unit.
    let id = engine
        .record_fill_up(fill_up(&vehicle_id, &bank_id, 0, 1_000, 100_000, 9_000))
        .await
        .unwrap();

    let log = engine.fill_up(&id).await.unwrap();
    assert_eq!(log.total_amount_minor, 900_000);
    assert_eq!(log.average_milli, 10_000); // 10 km/L
    assert_eq!(log.carried_milli, 0);
    assert_eq!(log.remaining_milli, 100_000);

    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 100_000);
}

#[tokio::test]
async fn next_fill_up_absorbs_the_open_remainder() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;

    let first = engine
        .record_fill_up(FillUpCmd {
            occurred_at: Some(ts("2026-08-01T08:00:00Z")),
            ..fill_up(&vehicle_id, &bank_id, 0, 1_000, 100_000, 9_000)
        })
        .await
        .unwrap();
    let second = engine
        .record_fill_up(FillUpCmd {
            occurred_at: Some(ts("2026-08-02T08:00:00Z")),
            ..fill_up(&vehicle_id, &bank_id, 1_000, 1_100, 50_000, 9_000)
        })
        .await
        .unwrap();

    let first_log = engine.fill_up(&first).await.unwrap();
    let second_log = engine.fill_up(&second).await.unwrap();

    // The predecessor is zeroed; its fuel lives on in the new row.
    assert_eq!(first_log.remaining_milli, 0);
    assert_eq!(second_log.carried_milli, 100_000);
    assert_eq!(second_log.carried_from_id.as_deref(), Some(first.as_str()));
    assert_eq!(second_log.remaining_milli, 150_000);
    // Mileage spans purchased + carried: 100 km over 150 L.
    assert_eq!(second_log.average_milli, 666);
}

#[tokio::test]
async fn invalid_readings_and_purchases_are_rejected() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 1_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;

    let err = engine
        .record_fill_up(fill_up(&vehicle_id, &bank_id, 500, 500, 10_000, 9_000))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .record_fill_up(fill_up(&vehicle_id, &bank_id, 0, 100, 0, 9_000))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn carried_from_fill_up_is_locked() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;

    let first = engine
        .record_fill_up(FillUpCmd {
            occurred_at: Some(ts("2026-08-01T08:00:00Z")),
            ..fill_up(&vehicle_id, &bank_id, 0, 1_000, 100_000, 9_000)
        })
        .await
        .unwrap();
    engine
        .record_fill_up(FillUpCmd {
            occurred_at: Some(ts("2026-08-02T08:00:00Z")),
            ..fill_up(&vehicle_id, &bank_id, 1_000, 1_100, 50_000, 9_000)
        })
        .await
        .unwrap();

    let err = engine
        .update_fill_up(
            &first,
            FillUpUpdate {
                end_km: Some(900),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));

    let err = engine.delete_fill_up(&first).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
}

#[tokio::test]
async fn deleting_the_newest_fill_up_restores_the_chain() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;

    let first = engine
        .record_fill_up(FillUpCmd {
            occurred_at: Some(ts("2026-08-01T08:00:00Z")),
            ..fill_up(&vehicle_id, &bank_id, 0, 1_000, 100_000, 9_000)
        })
        .await
        .unwrap();
    let second = engine
        .record_fill_up(FillUpCmd {
            occurred_at: Some(ts("2026-08-02T08:00:00Z")),
            ..fill_up(&vehicle_id, &bank_id, 1_000, 1_100, 50_000, 9_000)
        })
        .await
        .unwrap();
    let balance_after_both = engine.bank(&bank_id).await.unwrap().balance_minor;

    engine.delete_fill_up(&second).await.unwrap();

    // The predecessor gets its remainder back and the bank is refunded.
    let first_log = engine.fill_up(&first).await.unwrap();
    assert_eq!(first_log.remaining_milli, 100_000);
    assert_eq!(
        engine.bank(&bank_id).await.unwrap().balance_minor,
        balance_after_both + 450_000
    );
    assert!(matches!(
        engine.fill_up(&second).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}

#[tokio::test]
async fn vehicle_reassignment_reattaches_the_carry_chain() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let truck_a = vehicle(&engine, "KA-01-1234").await;
    let truck_b = vehicle(&engine, "KA-02-5678").await;

    let a_first = engine
        .record_fill_up(FillUpCmd {
            occurred_at: Some(ts("2026-08-01T08:00:00Z")),
            ..fill_up(&truck_a, &bank_id, 0, 1_000, 100_000, 9_000)
        })
        .await
        .unwrap();
    // Booked against truck B by mistake.
    let misfiled = engine
        .record_fill_up(FillUpCmd {
            occurred_at: Some(ts("2026-08-02T08:00:00Z")),
            ..fill_up(&truck_b, &bank_id, 1_000, 1_100, 50_000, 9_000)
        })
        .await
        .unwrap();

    engine
        .update_fill_up(
            &misfiled,
            FillUpUpdate {
                vehicle_id: Some(truck_a.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let moved = engine.fill_up(&misfiled).await.unwrap();
    assert_eq!(moved.vehicle_id, truck_a);
    // It now absorbs truck A's open remainder.
    assert_eq!(moved.carried_milli, 100_000);
    assert_eq!(moved.carried_from_id.as_deref(), Some(a_first.as_str()));
    assert_eq!(moved.remaining_milli, 150_000);
    assert_eq!(engine.fill_up(&a_first).await.unwrap().remaining_milli, 0);
    assert!(engine.list_fill_ups(Some(&truck_b)).await.unwrap().is_empty());
}
