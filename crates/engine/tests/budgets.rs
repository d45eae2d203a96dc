//! Daily driver budget allocations and their carry-forward.

mod common;

use common::{USER, bank, driver, engine, ts};
use engine::{BudgetCmd, EngineError, TransactionListFilter};

fn budget(driver_id: &str, bank_id: &str, allocated_minor: i64, at: &str) -> BudgetCmd {
    BudgetCmd {
        driver_id: driver_id.to_string(),
        bank_id: bank_id.to_string(),
        allocated_minor,
        occurred_at: Some(ts(at)),
        created_by: USER.to_string(),
    }
}

#[tokio::test]
async fn allocation_debits_the_bank_and_mirrors_an_expense() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 1_000).await;
    let driver_id = driver(&engine, "R. Kumar").await;

    let id = engine
        .allocate_daily_budget(budget(&driver_id, &bank_id, 300, "2026-08-01T06:00:00Z"))
        .await
        .unwrap();

    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 700);

    let row = engine.daily_budget(&id).await.unwrap();
    assert_eq!(row.allocated_minor, 300);
    assert_eq!(row.daily_budget_minor, 300);
    assert_eq!(row.remaining_minor, 300);

    // The cashbook shows the outflow under its own category.
    let expenses = engine.list_expenses(None, None).await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].category, "Driver Budget");
    assert_eq!(expenses[0].amount_minor, 300);
    assert_eq!(expenses[0].transaction_id, row.transaction_id);

    let rows = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].balance_after_minor, 700);
}

#[tokio::test]
async fn unspent_remainder_rolls_into_the_next_allocation() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000).await;
    let driver_id = driver(&engine, "R. Kumar").await;

    let first = engine
        .allocate_daily_budget(budget(&driver_id, &bank_id, 300, "2026-08-01T06:00:00Z"))
        .await
        .unwrap();
    let second = engine
        .allocate_daily_budget(budget(&driver_id, &bank_id, 500, "2026-08-02T06:00:00Z"))
        .await
        .unwrap();

    let first_row = engine.daily_budget(&first).await.unwrap();
    let second_row = engine.daily_budget(&second).await.unwrap();

    assert_eq!(first_row.remaining_minor, 0);
    assert_eq!(second_row.daily_budget_minor, 800);
    assert_eq!(second_row.remaining_minor, 800);
    assert_eq!(second_row.carried_from_id.as_deref(), Some(first.as_str()));

    // Only the fresh portion left the bank.
    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 9_200);
}

#[tokio::test]
async fn allocation_larger_than_the_bank_is_rejected() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 100).await;
    let driver_id = driver(&engine, "R. Kumar").await;

    let err = engine
        .allocate_daily_budget(budget(&driver_id, &bank_id, 300, "2026-08-01T06:00:00Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));
    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 100);
    assert!(engine.list_daily_budgets(None).await.unwrap().is_empty());
    assert!(engine.list_expenses(None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_allocation_restores_bank_and_predecessor() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000).await;
    let driver_id = driver(&engine, "R. Kumar").await;

    let first = engine
        .allocate_daily_budget(budget(&driver_id, &bank_id, 300, "2026-08-01T06:00:00Z"))
        .await
        .unwrap();
    let second = engine
        .allocate_daily_budget(budget(&driver_id, &bank_id, 500, "2026-08-02T06:00:00Z"))
        .await
        .unwrap();

    engine.delete_daily_budget(&second).await.unwrap();

    // The carried remainder flows back to the first allocation.
    let first_row = engine.daily_budget(&first).await.unwrap();
    assert_eq!(first_row.remaining_minor, 300);
    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 9_700);
    assert!(engine.list_expenses(None, None).await.unwrap().len() == 1);
}

#[tokio::test]
async fn carried_from_allocation_cannot_be_deleted() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 10_000).await;
    let driver_id = driver(&engine, "R. Kumar").await;

    let first = engine
        .allocate_daily_budget(budget(&driver_id, &bank_id, 300, "2026-08-01T06:00:00Z"))
        .await
        .unwrap();
    engine
        .allocate_daily_budget(budget(&driver_id, &bank_id, 500, "2026-08-02T06:00:00Z"))
        .await
        .unwrap();

    let err = engine.delete_daily_budget(&first).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
}
