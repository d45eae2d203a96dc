//! The ledger contract shared by every balance-affecting operation.
//!
//! A posting is one bank-balance change plus exactly one transaction row
//! whose `balance_after_minor` snapshots the balance right after the change.
//! Debits are rejected with `InsufficientFunds` before anything is written.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, RelatedKind, ResultEngine, Transaction, TransactionKind, banks, transactions,
};

use super::Engine;

impl Engine {
    pub(super) async fn require_bank(
        &self,
        db_tx: &DatabaseTransaction,
        bank_id: &str,
    ) -> ResultEngine<banks::Model> {
        banks::Entity::find_by_id(bank_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("bank {bank_id}")))
    }

    async fn set_bank_balance(
        &self,
        db_tx: &DatabaseTransaction,
        bank_id: &str,
        balance_minor: i64,
    ) -> ResultEngine<()> {
        let model = banks::ActiveModel {
            id: ActiveValue::Set(bank_id.to_string()),
            balance_minor: ActiveValue::Set(balance_minor),
            ..Default::default()
        };
        model.update(db_tx).await?;
        Ok(())
    }

    /// Apply a signed delta to a bank and record the paired transaction.
    ///
    /// Returns the transaction id. The delta sign picks the side: negative
    /// fills `from_bank_id`, positive fills `to_bank_id`.
    pub(super) async fn post(
        &self,
        db_tx: &DatabaseTransaction,
        bank_id: &str,
        delta_minor: i64,
        kind: TransactionKind,
        related_id: &str,
        related_kind: RelatedKind,
        occurred_at: DateTime<Utc>,
        created_by: &str,
    ) -> ResultEngine<String> {
        if delta_minor == 0 {
            return Err(EngineError::InvalidAmount(
                "posting amount must not be 0".to_string(),
            ));
        }

        let bank = self.require_bank(db_tx, bank_id).await?;
        if delta_minor < 0 && bank.balance_minor < -delta_minor {
            return Err(EngineError::InsufficientFunds(format!(
                "bank {} holds {} minor, need {}",
                bank.id, bank.balance_minor, -delta_minor
            )));
        }

        let balance_after = bank.balance_minor + delta_minor;
        self.set_bank_balance(db_tx, bank_id, balance_after).await?;

        let (from_bank, to_bank) = if delta_minor < 0 {
            (Some(bank_id.to_string()), None)
        } else {
            (None, Some(bank_id.to_string()))
        };

        let tx = Transaction {
            id: Uuid::new_v4(),
            kind,
            amount_minor: delta_minor.abs(),
            from_bank_id: from_bank,
            to_bank_id: to_bank,
            related_id: related_id.to_string(),
            related_kind,
            balance_after_minor: balance_after,
            occurred_at,
            created_by: created_by.to_string(),
        };
        transactions::ActiveModel::from(&tx).insert(db_tx).await?;

        Ok(tx.id.to_string())
    }

    /// Undo a posting: apply the opposite delta and delete the transaction.
    ///
    /// Reversing a credit is itself a debit and is funds-checked, so a
    /// delete cannot push a bank below zero.
    pub(super) async fn reverse_posting(
        &self,
        db_tx: &DatabaseTransaction,
        transaction_id: &str,
    ) -> ResultEngine<()> {
        let tx_model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("transaction {transaction_id}")))?;

        match (&tx_model.from_bank_id, &tx_model.to_bank_id) {
            (Some(from), Some(to)) => {
                // Transfer row: credit the source back, debit the destination.
                let to_bank = self.require_bank(db_tx, to).await?;
                if to_bank.balance_minor < tx_model.amount_minor {
                    return Err(EngineError::InsufficientFunds(format!(
                        "bank {} holds {} minor, need {}",
                        to_bank.id, to_bank.balance_minor, tx_model.amount_minor
                    )));
                }
                self.set_bank_balance(db_tx, to, to_bank.balance_minor - tx_model.amount_minor)
                    .await?;
                let from_bank = self.require_bank(db_tx, from).await?;
                self.set_bank_balance(db_tx, from, from_bank.balance_minor + tx_model.amount_minor)
                    .await?;
            }
            (Some(from), None) => {
                let bank = self.require_bank(db_tx, from).await?;
                self.set_bank_balance(db_tx, from, bank.balance_minor + tx_model.amount_minor)
                    .await?;
            }
            (None, Some(to)) => {
                let bank = self.require_bank(db_tx, to).await?;
                if bank.balance_minor < tx_model.amount_minor {
                    return Err(EngineError::InsufficientFunds(format!(
                        "bank {} holds {} minor, need {}",
                        bank.id, bank.balance_minor, tx_model.amount_minor
                    )));
                }
                self.set_bank_balance(db_tx, to, bank.balance_minor - tx_model.amount_minor)
                    .await?;
            }
            (None, None) => {
                return Err(EngineError::Validation(
                    "transaction names no bank".to_string(),
                ));
            }
        }

        tx_model.delete(db_tx).await?;
        Ok(())
    }
}
