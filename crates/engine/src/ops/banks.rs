//! Bank accounts: CRUD and transfers.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Bank, EngineError, RelatedKind, ResultEngine, Transaction, TransactionKind, banks, transactions,
};

use super::{Engine, normalize_required, positive_amount, with_tx};

pub struct BankCmd {
    pub name: String,
    pub account_no: String,
    pub opening_balance_minor: i64,
    pub owner: String,
}

pub struct TransferCmd {
    pub from_bank_id: String,
    pub to_bank_id: String,
    pub amount_minor: i64,
    pub occurred_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl Engine {
    pub async fn new_bank(&self, cmd: BankCmd) -> ResultEngine<String> {
        let name = normalize_required(&cmd.name, "bank name")?;
        let account_no = normalize_required(&cmd.account_no, "account number")?;
        if cmd.opening_balance_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "opening balance must be >= 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let existing = banks::Entity::find()
                .filter(banks::Column::AccountNo.eq(account_no.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(account_no));
            }

            let bank = Bank::new(name, account_no, cmd.opening_balance_minor, cmd.owner);
            let id = bank.id.to_string();
            banks::ActiveModel::from(&bank).insert(&db_tx).await?;
            Ok(id)
        })
    }

    pub async fn bank(&self, bank_id: &str) -> ResultEngine<banks::Model> {
        banks::Entity::find_by_id(bank_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("bank {bank_id}")))
    }

    pub async fn list_banks(&self) -> ResultEngine<Vec<banks::Model>> {
        Ok(banks::Entity::find()
            .order_by_asc(banks::Column::Name)
            .all(&self.database)
            .await?)
    }

    pub async fn update_bank(
        &self,
        bank_id: &str,
        name: Option<String>,
        active: Option<bool>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let bank = self.require_bank(&db_tx, bank_id).await?;
            let mut model: banks::ActiveModel = bank.into();
            if let Some(name) = name {
                model.name = ActiveValue::Set(normalize_required(&name, "bank name")?);
            }
            if let Some(active) = active {
                model.active = ActiveValue::Set(active);
            }
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deleting a bank with ledger history would orphan its audit trail, so
    /// it is refused once any transaction names the bank.
    pub async fn delete_bank(&self, bank_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let bank = self.require_bank(&db_tx, bank_id).await?;
            let referenced = transactions::Entity::find()
                .filter(
                    transactions::Column::FromBankId
                        .eq(bank_id.to_string())
                        .or(transactions::Column::ToBankId.eq(bank_id.to_string())),
                )
                .one(&db_tx)
                .await?;
            if referenced.is_some() {
                return Err(EngineError::InvalidTransition(
                    "bank has transaction history".to_string(),
                ));
            }
            bank.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Move money between two banks: one transaction row naming both, with
    /// `balance_after_minor` snapshotting the destination.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<String> {
        positive_amount(cmd.amount_minor, "transfer amount")?;
        if cmd.from_bank_id == cmd.to_bank_id {
            return Err(EngineError::Validation(
                "from_bank_id and to_bank_id must differ".to_string(),
            ));
        }
        let occurred_at = super::now_or(cmd.occurred_at);

        with_tx!(self, |db_tx| {
            let from = self.require_bank(&db_tx, &cmd.from_bank_id).await?;
            let to = self.require_bank(&db_tx, &cmd.to_bank_id).await?;
            if from.balance_minor < cmd.amount_minor {
                return Err(EngineError::InsufficientFunds(format!(
                    "bank {} holds {} minor, need {}",
                    from.id, from.balance_minor, cmd.amount_minor
                )));
            }

            let mut from_model: banks::ActiveModel = from.clone().into();
            from_model.balance_minor = ActiveValue::Set(from.balance_minor - cmd.amount_minor);
            from_model.update(&db_tx).await?;

            let to_balance_after = to.balance_minor + cmd.amount_minor;
            let mut to_model: banks::ActiveModel = to.clone().into();
            to_model.balance_minor = ActiveValue::Set(to_balance_after);
            to_model.update(&db_tx).await?;

            let tx = Transaction {
                id: Uuid::new_v4(),
                kind: TransactionKind::Transfer,
                amount_minor: cmd.amount_minor,
                from_bank_id: Some(cmd.from_bank_id.clone()),
                to_bank_id: Some(cmd.to_bank_id.clone()),
                related_id: cmd.to_bank_id.clone(),
                related_kind: RelatedKind::Bank,
                balance_after_minor: to_balance_after,
                occurred_at,
                created_by: cmd.created_by.clone(),
            };
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            Ok(tx.id.to_string())
        })
    }
}
