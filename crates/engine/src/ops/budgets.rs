//! Daily driver budget allocations.
//!
//! Mirrors the fuel ledger's carry-forward: the previous allocation's
//! `remaining_minor` rolls into the new row and the bank is debited for the
//! fresh portion only. Each allocation is mirrored as an expense entry so the
//! cashbook shows the outflow under its own category.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, RelatedKind, ResultEngine, TransactionKind, driver_budgets, drivers, expenses,
};

use super::{Engine, now_or, positive_amount, with_tx};

pub const BUDGET_EXPENSE_CATEGORY: &str = "Driver Budget";

pub struct BudgetCmd {
    pub driver_id: String,
    pub bank_id: String,
    pub allocated_minor: i64,
    pub occurred_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl Engine {
    pub(super) async fn latest_budget(
        &self,
        db_tx: &DatabaseTransaction,
        driver_id: &str,
        exclude_id: Option<&str>,
    ) -> ResultEngine<Option<driver_budgets::Model>> {
        let mut query = driver_budgets::Entity::find()
            .filter(driver_budgets::Column::DriverId.eq(driver_id.to_string()))
            .order_by_desc(driver_budgets::Column::OccurredAt)
            .order_by_desc(driver_budgets::Column::Id);
        if let Some(id) = exclude_id {
            query = query.filter(driver_budgets::Column::Id.ne(id.to_string()));
        }
        Ok(query.one(db_tx).await?)
    }

    pub async fn allocate_daily_budget(&self, cmd: BudgetCmd) -> ResultEngine<String> {
        positive_amount(cmd.allocated_minor, "budget allocation")?;
        let occurred_at = now_or(cmd.occurred_at);

        with_tx!(self, |db_tx| {
            let driver = drivers::Entity::find_by_id(cmd.driver_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("driver {}", cmd.driver_id)))?;

            let previous = self.latest_budget(&db_tx, &driver.id, None).await?;
            let (carried_minor, carried_from_id) = match &previous {
                Some(prev) if prev.remaining_minor > 0 => {
                    let mut model: driver_budgets::ActiveModel = prev.clone().into();
                    model.remaining_minor = ActiveValue::Set(0);
                    model.update(&db_tx).await?;
                    (prev.remaining_minor, Some(prev.id.clone()))
                }
                _ => (0, None),
            };

            let daily_budget_minor = cmd.allocated_minor + carried_minor;
            let id = Uuid::new_v4().to_string();

            let tx_id = self
                .post(
                    &db_tx,
                    &cmd.bank_id,
                    -cmd.allocated_minor,
                    TransactionKind::DriverBudget,
                    &id,
                    RelatedKind::DriverBudget,
                    occurred_at,
                    &cmd.created_by,
                )
                .await?;

            let expense_id = Uuid::new_v4().to_string();
            let expense = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.clone()),
                bank_id: ActiveValue::Set(Some(cmd.bank_id.clone())),
                amount_minor: ActiveValue::Set(cmd.allocated_minor),
                category: ActiveValue::Set(BUDGET_EXPENSE_CATEGORY.to_string()),
                note: ActiveValue::Set(Some(format!("daily budget for {}", driver.name))),
                trip_id: ActiveValue::Set(None),
                route_id: ActiveValue::Set(None),
                maintenance_id: ActiveValue::Set(None),
                transaction_id: ActiveValue::Set(Some(tx_id.clone())),
                occurred_at: ActiveValue::Set(occurred_at),
                created_by: ActiveValue::Set(cmd.created_by.clone()),
            };
            expense.insert(&db_tx).await?;

            let row = driver_budgets::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                driver_id: ActiveValue::Set(driver.id),
                bank_id: ActiveValue::Set(cmd.bank_id.clone()),
                allocated_minor: ActiveValue::Set(cmd.allocated_minor),
                daily_budget_minor: ActiveValue::Set(daily_budget_minor),
                remaining_minor: ActiveValue::Set(daily_budget_minor),
                carried_from_id: ActiveValue::Set(carried_from_id),
                transaction_id: ActiveValue::Set(Some(tx_id)),
                expense_id: ActiveValue::Set(Some(expense_id)),
                occurred_at: ActiveValue::Set(occurred_at),
                created_by: ActiveValue::Set(cmd.created_by.clone()),
            };
            row.insert(&db_tx).await?;

            Ok(id)
        })
    }

    pub async fn daily_budget(&self, id: &str) -> ResultEngine<driver_budgets::Model> {
        driver_budgets::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("driver budget {id}")))
    }

    pub async fn list_daily_budgets(
        &self,
        driver_id: Option<&str>,
    ) -> ResultEngine<Vec<driver_budgets::Model>> {
        let mut condition = Condition::all();
        if let Some(driver_id) = driver_id {
            condition = condition.add(driver_budgets::Column::DriverId.eq(driver_id.to_string()));
        }
        Ok(driver_budgets::Entity::find()
            .filter(condition)
            .order_by_desc(driver_budgets::Column::OccurredAt)
            .order_by_desc(driver_budgets::Column::Id)
            .all(&self.database)
            .await?)
    }

    pub async fn delete_daily_budget(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let row = driver_budgets::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("driver budget {id}")))?;

            if row.remaining_minor < row.daily_budget_minor {
                return Err(EngineError::InvalidTransition(
                    "trips have spent from this budget".to_string(),
                ));
            }
            let successor = driver_budgets::Entity::find()
                .filter(driver_budgets::Column::CarriedFromId.eq(row.id.clone()))
                .one(&db_tx)
                .await?;
            if successor.is_some() {
                return Err(EngineError::InvalidTransition(
                    "a later allocation carries from this one".to_string(),
                ));
            }

            if let Some(prev_id) = row.carried_from_id.as_deref() {
                let carried = row.daily_budget_minor - row.allocated_minor;
                if carried > 0
                    && let Some(prev) = driver_budgets::Entity::find_by_id(prev_id.to_string())
                        .one(&db_tx)
                        .await?
                {
                    let mut model: driver_budgets::ActiveModel = prev.clone().into();
                    model.remaining_minor = ActiveValue::Set(prev.remaining_minor + carried);
                    model.update(&db_tx).await?;
                }
            }

            if let Some(expense_id) = row.expense_id.as_deref() {
                expenses::Entity::delete_by_id(expense_id.to_string())
                    .exec(&db_tx)
                    .await?;
            }
            if let Some(tx_id) = row.transaction_id.as_deref() {
                self.reverse_posting(&db_tx, tx_id).await?;
            }
            row.delete(&db_tx).await?;
            Ok(())
        })
    }
}
