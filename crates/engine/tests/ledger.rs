//! Cashbook entries, transfers, and the single-ledger invariants.

mod common;

use common::{USER, bank, engine};
use engine::{EngineError, EntryCmd, EntryUpdate, TransactionListFilter, TransferCmd};

fn entry(bank_id: &str, amount_minor: i64, category: &str) -> EntryCmd {
    EntryCmd {
        bank_id: bank_id.to_string(),
        amount_minor,
        category: category.to_string(),
        note: None,
        occurred_at: None,
        created_by: USER.to_string(),
    }
}

#[tokio::test]
async fn income_and_expense_move_the_bank_balance() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 0).await;

    engine
        .new_income(entry(&bank_id, 12_500, "Brokerage"))
        .await
        .unwrap();
    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 12_500);

    engine
        .new_expense(entry(&bank_id, 2_500, "Office"))
        .await
        .unwrap();
    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 10_000);

    let rows = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    // Every row snapshots the balance after it was applied.
    let mut after: Vec<i64> = rows.iter().map(|t| t.balance_after_minor).collect();
    after.sort_unstable();
    assert_eq!(after, vec![10_000, 12_500]);
}

#[tokio::test]
async fn zero_amounts_are_rejected() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 0).await;

    let err = engine
        .new_income(entry(&bank_id, 0, "Brokerage"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn overdrawn_expense_leaves_no_trace() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 100).await;

    let err = engine
        .new_expense(entry(&bank_id, 500, "Office"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 100);
    assert!(engine.list_expenses(None, None).await.unwrap().is_empty());
    assert!(
        engine
            .list_transactions(TransactionListFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn transfer_conserves_the_total() {
    let engine = engine().await;
    let from = bank(&engine, "OP-001", 1_000).await;
    let to = bank(&engine, "RS-001", 0).await;

    engine
        .transfer(TransferCmd {
            from_bank_id: from.clone(),
            to_bank_id: to.clone(),
            amount_minor: 400,
            occurred_at: None,
            created_by: USER.to_string(),
        })
        .await
        .unwrap();

    let from_balance = engine.bank(&from).await.unwrap().balance_minor;
    let to_balance = engine.bank(&to).await.unwrap().balance_minor;
    assert_eq!(from_balance, 600);
    assert_eq!(to_balance, 400);
    assert_eq!(from_balance + to_balance, 1_000);

    // One row naming both sides, not one per leg.
    let rows = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].from_bank_id.as_deref(), Some(from.as_str()));
    assert_eq!(rows[0].to_bank_id.as_deref(), Some(to.as_str()));
}

#[tokio::test]
async fn transfer_to_the_same_bank_is_rejected() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 1_000).await;

    let err = engine
        .transfer(TransferCmd {
            from_bank_id: bank_id.clone(),
            to_bank_id: bank_id,
            amount_minor: 100,
            occurred_at: None,
            created_by: USER.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn amount_edit_replaces_the_posting() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 0).await;
    let income_id = engine
        .new_income(entry(&bank_id, 1_000, "Brokerage"))
        .await
        .unwrap();

    engine
        .update_income(
            &income_id,
            EntryUpdate {
                amount_minor: Some(600),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 600);
    let rows = engine
        .list_transactions(TransactionListFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount_minor, 600);
}

#[tokio::test]
async fn deleting_an_entry_reverses_its_posting() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 0).await;
    let income_id = engine
        .new_income(entry(&bank_id, 1_000, "Brokerage"))
        .await
        .unwrap();

    engine.delete_income(&income_id).await.unwrap();

    assert_eq!(engine.bank(&bank_id).await.unwrap().balance_minor, 0);
    assert!(engine.list_incomes(None, None).await.unwrap().is_empty());
    assert!(
        engine
            .list_transactions(TransactionListFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn bank_with_ledger_history_cannot_be_deleted() {
    let engine = engine().await;
    let bank_id = bank(&engine, "OP-001", 0).await;
    engine
        .new_income(entry(&bank_id, 1_000, "Brokerage"))
        .await
        .unwrap();

    let err = engine.delete_bank(&bank_id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition(_)));
}

#[tokio::test]
async fn duplicate_account_no_is_rejected() {
    let engine = engine().await;
    bank(&engine, "OP-001", 0).await;

    let err = engine
        .new_bank(engine::BankCmd {
            name: "Duplicate".to_string(),
            account_no: "OP-001".to_string(),
            opening_balance_minor: 0,
            owner: USER.to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}
