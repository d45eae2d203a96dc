//! Direct income and expense entries.
//!
//! Creation order follows the ledger contract: insert the domain row, post
//! the bank delta, then back-link the transaction id. Updates reverse the
//! old posting and re-post; deletes reverse and remove the pair.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, RelatedKind, ResultEngine, TransactionKind, expenses, incomes};

use super::{Engine, normalize_optional_text, normalize_required, now_or, positive_amount, with_tx};

pub struct EntryCmd {
    pub bank_id: String,
    pub amount_minor: i64,
    pub category: String,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

#[derive(Default)]
pub struct EntryUpdate {
    pub amount_minor: Option<i64>,
    pub category: Option<String>,
    pub note: Option<String>,
}

impl Engine {
    pub async fn new_income(&self, cmd: EntryCmd) -> ResultEngine<String> {
        positive_amount(cmd.amount_minor, "income amount")?;
        let category = normalize_required(&cmd.category, "category")?;
        let occurred_at = now_or(cmd.occurred_at);
        let id = Uuid::new_v4().to_string();

        with_tx!(self, |db_tx| {
            let row = incomes::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                bank_id: ActiveValue::Set(Some(cmd.bank_id.clone())),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                category: ActiveValue::Set(category),
                note: ActiveValue::Set(normalize_optional_text(cmd.note.as_deref())),
                trip_id: ActiveValue::Set(None),
                route_id: ActiveValue::Set(None),
                transaction_id: ActiveValue::Set(None),
                occurred_at: ActiveValue::Set(occurred_at),
                created_by: ActiveValue::Set(cmd.created_by.clone()),
            };
            row.insert(&db_tx).await?;

            let tx_id = self
                .post(
                    &db_tx,
                    &cmd.bank_id,
                    cmd.amount_minor,
                    TransactionKind::Income,
                    &id,
                    RelatedKind::Income,
                    occurred_at,
                    &cmd.created_by,
                )
                .await?;

            let link = incomes::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                transaction_id: ActiveValue::Set(Some(tx_id)),
                ..Default::default()
            };
            link.update(&db_tx).await?;
            Ok(id)
        })
    }

    pub async fn new_expense(&self, cmd: EntryCmd) -> ResultEngine<String> {
        positive_amount(cmd.amount_minor, "expense amount")?;
        let category = normalize_required(&cmd.category, "category")?;
        let occurred_at = now_or(cmd.occurred_at);
        let id = Uuid::new_v4().to_string();

        with_tx!(self, |db_tx| {
            let row = expenses::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                bank_id: ActiveValue::Set(Some(cmd.bank_id.clone())),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                category: ActiveValue::Set(category),
                note: ActiveValue::Set(normalize_optional_text(cmd.note.as_deref())),
                trip_id: ActiveValue::Set(None),
                route_id: ActiveValue::Set(None),
                maintenance_id: ActiveValue::Set(None),
                transaction_id: ActiveValue::Set(None),
                occurred_at: ActiveValue::Set(occurred_at),
                created_by: ActiveValue::Set(cmd.created_by.clone()),
            };
            row.insert(&db_tx).await?;

            let tx_id = self
                .post(
                    &db_tx,
                    &cmd.bank_id,
                    -cmd.amount_minor,
                    TransactionKind::Expense,
                    &id,
                    RelatedKind::Expense,
                    occurred_at,
                    &cmd.created_by,
                )
                .await?;

            let link = expenses::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                transaction_id: ActiveValue::Set(Some(tx_id)),
                ..Default::default()
            };
            link.update(&db_tx).await?;
            Ok(id)
        })
    }

    pub async fn income(&self, id: &str) -> ResultEngine<incomes::Model> {
        incomes::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("income {id}")))
    }

    pub async fn expense(&self, id: &str) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("expense {id}")))
    }

    pub async fn list_incomes(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<incomes::Model>> {
        let mut query = incomes::Entity::find().order_by_desc(incomes::Column::OccurredAt);
        if let Some(from) = from {
            query = query.filter(incomes::Column::OccurredAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(incomes::Column::OccurredAt.lte(to));
        }
        Ok(query.all(&self.database).await?)
    }

    pub async fn list_expenses(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<Vec<expenses::Model>> {
        let mut query = expenses::Entity::find().order_by_desc(expenses::Column::OccurredAt);
        if let Some(from) = from {
            query = query.filter(expenses::Column::OccurredAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(expenses::Column::OccurredAt.lte(to));
        }
        Ok(query.all(&self.database).await?)
    }

    pub async fn update_income(&self, id: &str, update: EntryUpdate) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let row = incomes::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("income {id}")))?;
            if row.trip_id.is_some() {
                return Err(EngineError::InvalidTransition(
                    "income is managed by its trip".to_string(),
                ));
            }

            let new_amount = match update.amount_minor {
                Some(amount) => positive_amount(amount, "income amount")?,
                None => row.amount_minor,
            };

            let mut tx_id = row.transaction_id.clone();
            if new_amount != row.amount_minor {
                let bank_id = row
                    .bank_id
                    .clone()
                    .ok_or_else(|| EngineError::Validation("income has no bank".to_string()))?;
                if let Some(old_tx) = row.transaction_id.as_deref() {
                    self.reverse_posting(&db_tx, old_tx).await?;
                }
                tx_id = Some(
                    self.post(
                        &db_tx,
                        &bank_id,
                        new_amount,
                        TransactionKind::Income,
                        id,
                        RelatedKind::Income,
                        row.occurred_at,
                        &row.created_by,
                    )
                    .await?,
                );
            }

            let mut model: incomes::ActiveModel = row.clone().into();
            model.amount_minor = ActiveValue::Set(new_amount);
            model.transaction_id = ActiveValue::Set(tx_id);
            if let Some(category) = update.category {
                model.category = ActiveValue::Set(normalize_required(&category, "category")?);
            }
            if let Some(note) = update.note {
                model.note = ActiveValue::Set(normalize_optional_text(Some(&note)));
            }
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn update_expense(&self, id: &str, update: EntryUpdate) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let row = expenses::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("expense {id}")))?;
            if row.trip_id.is_some() || row.maintenance_id.is_some() {
                return Err(EngineError::InvalidTransition(
                    "expense is managed by its trip or maintenance".to_string(),
                ));
            }

            let new_amount = match update.amount_minor {
                Some(amount) => positive_amount(amount, "expense amount")?,
                None => row.amount_minor,
            };

            let mut tx_id = row.transaction_id.clone();
            if new_amount != row.amount_minor {
                let bank_id = row
                    .bank_id
                    .clone()
                    .ok_or_else(|| EngineError::Validation("expense has no bank".to_string()))?;
                if let Some(old_tx) = row.transaction_id.as_deref() {
                    self.reverse_posting(&db_tx, old_tx).await?;
                }
                tx_id = Some(
                    self.post(
                        &db_tx,
                        &bank_id,
                        -new_amount,
                        TransactionKind::Expense,
                        id,
                        RelatedKind::Expense,
                        row.occurred_at,
                        &row.created_by,
                    )
                    .await?,
                );
            }

            let mut model: expenses::ActiveModel = row.clone().into();
            model.amount_minor = ActiveValue::Set(new_amount);
            model.transaction_id = ActiveValue::Set(tx_id);
            if let Some(category) = update.category {
                model.category = ActiveValue::Set(normalize_required(&category, "category")?);
            }
            if let Some(note) = update.note {
                model.note = ActiveValue::Set(normalize_optional_text(Some(&note)));
            }
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_income(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let row = incomes::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("income {id}")))?;
            if row.trip_id.is_some() {
                return Err(EngineError::InvalidTransition(
                    "income is managed by its trip".to_string(),
                ));
            }
            if let Some(tx_id) = row.transaction_id.as_deref() {
                self.reverse_posting(&db_tx, tx_id).await?;
            }
            row.delete(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_expense(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let row = expenses::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("expense {id}")))?;
            if row.trip_id.is_some() || row.maintenance_id.is_some() {
                return Err(EngineError::InvalidTransition(
                    "expense is managed by its trip or maintenance".to_string(),
                ));
            }
            if let Some(tx_id) = row.transaction_id.as_deref() {
                self.reverse_posting(&db_tx, tx_id).await?;
            }
            row.delete(&db_tx).await?;
            Ok(())
        })
    }
}
