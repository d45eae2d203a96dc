//! The trip lifecycle and its completion cascade.

mod common;

use chrono::NaiveDate;
use common::{USER, bank, customer, driver, engine, fill_up, ts, vehicle};
use engine::{
    BudgetCmd, EngineError, RouteCmd, RouteExpenseCmd, RouteStatus, TransactionKind,
    TransactionListFilter, TripCmd, TripStatus, TripUpdateCmd,
};

struct Fixture {
    engine: engine::Engine,
    bank_id: String,
    vehicle_id: String,
    driver_id: String,
    customer_id: String,
    fuel_log_id: String,
}

/// Bank with 10_000_000 minor, one fill-up of 100 L over 1000 km
/// (mileage 10 km/L) at 9_000 minor per litre.
async fn fixture() -> Fixture {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    let driver_id = driver(&engine, "R. Kumar").await;
    let customer_id = customer(&engine, "Acme Cements").await;
    let fuel_log_id = engine
        .record_fill_up(fill_up(&vehicle_id, &bank_id, 0, 1_000, 100_000, 9_000))
        .await
        .unwrap();
    Fixture {
        engine,
        bank_id,
        vehicle_id,
        driver_id,
        customer_id,
        fuel_log_id,
    }
}

fn date(raw: &str) -> NaiveDate {
    raw.parse().unwrap()
}

impl Fixture {
    fn route(&self, advance_minor: i64, expenses_minor: i64) -> RouteCmd {
        let expenses = if expenses_minor > 0 {
            vec![RouteExpenseCmd {
                description: "Toll".to_string(),
                amount_minor: expenses_minor,
            }]
        } else {
            Vec::new()
        };
        RouteCmd {
            customer_id: self.customer_id.clone(),
            bank_id: self.bank_id.clone(),
            rate_minor: 500_000,
            weight_milli: 10_000,
            amount_minor: None,
            advance_minor,
            expenses,
            status: RouteStatus::Pending,
        }
    }

    fn trip(&self, routes: Vec<RouteCmd>) -> TripCmd {
        TripCmd {
            vehicle_id: self.vehicle_id.clone(),
            driver_id: self.driver_id.clone(),
            start_km: 1_000,
            end_km: 1_100,
            start_date: date("2026-08-01"),
            end_date: date("2026-08-02"),
            routes,
            occurred_at: Some(ts("2026-08-02T18:00:00Z")),
            created_by: USER.to_string(),
        }
    }
}

#[tokio::test]
async fn trip_creation_prices_the_trip_and_draws_fuel() {
    let f = fixture().await;
    f.engine
        .allocate_daily_budget(BudgetCmd {
            driver_id: f.driver_id.clone(),
            bank_id: f.bank_id.clone(),
            allocated_minor: 300_000,
            occurred_at: Some(ts("2026-08-01T06:00:00Z")),
            created_by: USER.to_string(),
        })
        .await
        .unwrap();

    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(1_000_000, 50_000)]))
        .await
        .unwrap();

    let (trip, routes) = f.engine.trip(&trip_id).await.unwrap();
    assert_eq!(trip.status, TripStatus::Draft.as_str());
    // 100 km at 10 km/L needs 10 L; 10_000 mL at 9_000/L is 90_000 minor.
    assert_eq!(trip.fuel_used_milli, 10_000);
    assert_eq!(trip.diesel_cost_minor, 90_000);
    assert_eq!(trip.route_cost_minor, 5_000_000);
    assert_eq!(trip.expenses_minor, 50_000);
    assert_eq!(trip.remaining_minor, 4_860_000);
    assert_eq!(trip.fuel_log_id, f.fuel_log_id);

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].route_no, 1);
    assert_eq!(routes[0].amount_minor, 5_000_000);

    // The fuel came out of the ledger, the running costs out of the budget.
    let log = f.engine.fill_up(&f.fuel_log_id).await.unwrap();
    assert_eq!(log.remaining_milli, 90_000);
    let budgets = f.engine.list_daily_budgets(Some(&f.driver_id)).await.unwrap();
    assert_eq!(budgets[0].remaining_minor, 250_000);
}

#[tokio::test]
async fn trip_without_a_fuel_record_is_rejected() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000_000).await;
    let vehicle_id = vehicle(&engine, "KA-01-1234").await;
    let driver_id = driver(&engine, "R. Kumar").await;
    let customer_id = customer(&engine, "Acme Cements").await;

    let err = engine
        .new_trip(TripCmd {
            vehicle_id,
            driver_id,
            start_km: 0,
            end_km: 100,
            start_date: date("2026-08-01"),
            end_date: date("2026-08-01"),
            routes: vec![RouteCmd {
                customer_id,
                bank_id,
                rate_minor: 500_000,
                weight_milli: 10_000,
                amount_minor: None,
                advance_minor: 0,
                expenses: Vec::new(),
                status: RouteStatus::Pending,
            }],
            occurred_at: None,
            created_by: USER.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn advance_beyond_the_route_amount_is_rejected() {
    let f = fixture().await;
    let err = f
        .engine
        .new_trip(f.trip(vec![f.route(6_000_000, 0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert!(f.engine.list_trips().await.unwrap().is_empty());
}

#[tokio::test]
async fn completion_settles_invoice_income_and_expense() {
    let f = fixture().await;
    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(1_000_000, 50_000)]))
        .await
        .unwrap();
    let balance_before = f.engine.bank(&f.bank_id).await.unwrap().balance_minor;

    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                status: Some(TripStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (trip, routes) = f.engine.trip(&trip_id).await.unwrap();
    assert_eq!(trip.status, TripStatus::Completed.as_str());
    assert!(routes.iter().all(|r| r.status == RouteStatus::Completed.as_str()));

    // One invoice per route, keyed by the deterministic LR number.
    let invoices = f.engine.list_invoices().await.unwrap();
    assert_eq!(invoices.len(), 1);
    let (invoice, rows) = &invoices[0];
    assert_eq!(invoice.lr_no, format!("LR-{trip_id}-1"));
    assert_eq!(invoice.trip_id.as_deref(), Some(trip_id.as_str()));
    assert_eq!(invoice.total_minor, 5_000_000);
    assert_eq!(invoice.advance_minor, 1_000_000);
    assert_eq!(invoice.remaining_minor, 4_000_000);
    assert_eq!(invoice.status, engine::InvoiceStatus::Pending.as_str());
    assert_eq!(rows.len(), 1);

    // A part-paid route realizes only the advance.
    assert_eq!(
        f.engine.bank(&f.bank_id).await.unwrap().balance_minor,
        balance_before + 1_000_000
    );
    let incomes = f.engine.list_incomes(None, None).await.unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].category, "Trip Income");
    assert_eq!(incomes[0].amount_minor, 1_000_000);

    // Route running costs land in the cashbook without a bank.
    let expenses = f.engine.list_expenses(None, None).await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category, "Trip Expense");
    assert_eq!(expenses[0].bank_id, None);

    // The trip-keyed mirror row exists alongside the income posting.
    let mirrors = f
        .engine
        .list_transactions(TransactionListFilter {
            kind: Some(TransactionKind::TripIncome),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mirrors.len(), 1);
    assert_eq!(mirrors[0].related_id, trip_id);
}

#[tokio::test]
async fn fully_paid_route_realizes_the_full_amount() {
    let f = fixture().await;
    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(0, 0)]))
        .await
        .unwrap();
    let balance_before = f.engine.bank(&f.bank_id).await.unwrap().balance_minor;

    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                status: Some(TripStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        f.engine.bank(&f.bank_id).await.unwrap().balance_minor,
        balance_before + 5_000_000
    );
    let invoices = f.engine.list_invoices().await.unwrap();
    assert_eq!(invoices[0].0.status, engine::InvoiceStatus::Unpaid.as_str());
}

#[tokio::test]
async fn uncompleting_reverses_the_settlement() {
    let f = fixture().await;
    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(1_000_000, 50_000)]))
        .await
        .unwrap();
    let balance_before = f.engine.bank(&f.bank_id).await.unwrap().balance_minor;

    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                status: Some(TripStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                status: Some(TripStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        f.engine.bank(&f.bank_id).await.unwrap().balance_minor,
        balance_before
    );
    assert!(f.engine.list_invoices().await.unwrap().is_empty());
    assert!(f.engine.list_incomes(None, None).await.unwrap().is_empty());
    assert!(f.engine.list_expenses(None, None).await.unwrap().is_empty());
    assert!(
        f.engine
            .list_transactions(TransactionListFilter {
                kind: Some(TransactionKind::TripIncome),
                ..Default::default()
            })
            .await
            .unwrap()
            .is_empty()
    );

    // The fuel draw is handed back with the settlement.
    let (trip, _) = f.engine.trip(&trip_id).await.unwrap();
    assert_eq!(trip.fuel_used_milli, 0);
    assert_eq!(
        f.engine.fill_up(&f.fuel_log_id).await.unwrap().remaining_milli,
        100_000
    );
}

#[tokio::test]
async fn remeasuring_redraws_the_fuel() {
    let f = fixture().await;
    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(1_000_000, 0)]))
        .await
        .unwrap();

    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                end_km: Some(1_200),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (trip, _) = f.engine.trip(&trip_id).await.unwrap();
    assert_eq!(trip.end_km, 1_200);
    assert_eq!(trip.fuel_used_milli, 20_000);
    assert_eq!(trip.diesel_cost_minor, 180_000);
    assert_eq!(
        f.engine.fill_up(&f.fuel_log_id).await.unwrap().remaining_milli,
        80_000
    );
}

#[tokio::test]
async fn completed_trip_cannot_be_remeasured() {
    let f = fixture().await;
    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(0, 0)]))
        .await
        .unwrap();
    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                status: Some(TripStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = f
        .engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                end_km: Some(1_200),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
}

#[tokio::test]
async fn completing_one_route_settles_only_that_route() {
    let f = fixture().await;
    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(0, 0), f.route(0, 0)]))
        .await
        .unwrap();

    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                route_statuses: vec![(1, RouteStatus::Completed)],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // The completed route is invoiced and realized straight away; the
    // pending one waits. The trip moves out of draft.
    assert_eq!(f.engine.list_invoices().await.unwrap().len(), 1);
    assert_eq!(f.engine.list_incomes(None, None).await.unwrap().len(), 1);
    let (trip, _) = f.engine.trip(&trip_id).await.unwrap();
    assert_eq!(trip.status, TripStatus::InProgress.as_str());

    // Completing the trip settles the rest, without settling route 1 twice.
    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                status: Some(TripStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let invoices = f.engine.list_invoices().await.unwrap();
    assert_eq!(invoices.len(), 2);
    let incomes = f.engine.list_incomes(None, None).await.unwrap();
    assert_eq!(incomes.len(), 2);
}

#[tokio::test]
async fn creation_with_a_completed_route_settles_it_immediately() {
    let f = fixture().await;
    let balance_before = f.engine.bank(&f.bank_id).await.unwrap().balance_minor;

    let trip_id = f
        .engine
        .new_trip(f.trip(vec![
            RouteCmd {
                status: RouteStatus::Completed,
                ..f.route(0, 0)
            },
            f.route(0, 0),
        ]))
        .await
        .unwrap();

    let (trip, _) = f.engine.trip(&trip_id).await.unwrap();
    assert_eq!(trip.status, TripStatus::InProgress.as_str());

    let invoices = f.engine.list_invoices().await.unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].0.lr_no, format!("LR-{trip_id}-1"));
    let incomes = f.engine.list_incomes(None, None).await.unwrap();
    assert_eq!(incomes.len(), 1);
    assert_eq!(
        f.engine.bank(&f.bank_id).await.unwrap().balance_minor,
        balance_before + 5_000_000
    );
}

#[tokio::test]
async fn attendance_follows_the_first_completed_route() {
    let f = fixture().await;
    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(0, 0)]))
        .await
        .unwrap();

    // Nothing delivered yet, nothing on the attendance sheet.
    assert!(
        f.engine
            .list_attendance(Some(&f.driver_id))
            .await
            .unwrap()
            .is_empty()
    );

    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                route_statuses: vec![(1, RouteStatus::Completed)],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // One on-trip row per trip day.
    let rows = f.engine.list_attendance(Some(&f.driver_id)).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(
        rows.iter()
            .all(|r| r.status == engine::AttendanceStatus::OnTrip.as_str())
    );
    assert!(rows.iter().all(|r| r.trip_id.as_deref() == Some(trip_id.as_str())));
}

#[tokio::test]
async fn deleting_a_trip_restores_fuel_budget_and_ledger() {
    let f = fixture().await;
    f.engine
        .allocate_daily_budget(BudgetCmd {
            driver_id: f.driver_id.clone(),
            bank_id: f.bank_id.clone(),
            allocated_minor: 300_000,
            occurred_at: Some(ts("2026-08-01T06:00:00Z")),
            created_by: USER.to_string(),
        })
        .await
        .unwrap();
    let balance_before_trip = f.engine.bank(&f.bank_id).await.unwrap().balance_minor;

    let trip_id = f
        .engine
        .new_trip(f.trip(vec![f.route(1_000_000, 50_000)]))
        .await
        .unwrap();
    f.engine
        .update_trip(
            &trip_id,
            TripUpdateCmd {
                status: Some(TripStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    f.engine.delete_trip(&trip_id).await.unwrap();

    assert!(matches!(
        f.engine.trip(&trip_id).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert_eq!(
        f.engine.bank(&f.bank_id).await.unwrap().balance_minor,
        balance_before_trip
    );
    assert_eq!(
        f.engine.fill_up(&f.fuel_log_id).await.unwrap().remaining_milli,
        100_000
    );
    let budgets = f.engine.list_daily_budgets(Some(&f.driver_id)).await.unwrap();
    assert_eq!(budgets[0].remaining_minor, 300_000);
    assert!(f.engine.list_invoices().await.unwrap().is_empty());
    assert!(f.engine.list_incomes(None, None).await.unwrap().is_empty());
}
