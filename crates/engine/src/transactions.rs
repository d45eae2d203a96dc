//! The append-only transaction log.
//!
//! One row per balance-affecting event. `balance_after_minor` is a snapshot
//! of the bank balance right after the event was applied; it is never
//! recomputed.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
    Fuel,
    DriverBudget,
    Maintenance,
    TripIncome,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Transfer => "transfer",
            Self::Fuel => "fuel",
            Self::DriverBudget => "driver_budget",
            Self::Maintenance => "maintenance",
            Self::TripIncome => "trip_income",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "transfer" => Ok(Self::Transfer),
            "fuel" => Ok(Self::Fuel),
            "driver_budget" => Ok(Self::DriverBudget),
            "maintenance" => Ok(Self::Maintenance),
            "trip_income" => Ok(Self::TripIncome),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// What a transaction points back at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    Income,
    Expense,
    FuelLog,
    DriverBudget,
    Maintenance,
    Trip,
    Bank,
}

impl RelatedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::FuelLog => "fuel_log",
            Self::DriverBudget => "driver_budget",
            Self::Maintenance => "maintenance",
            Self::Trip => "trip",
            Self::Bank => "bank",
        }
    }
}

impl TryFrom<&str> for RelatedKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "fuel_log" => Ok(Self::FuelLog),
            "driver_budget" => Ok(Self::DriverBudget),
            "maintenance" => Ok(Self::Maintenance),
            "trip" => Ok(Self::Trip),
            "bank" => Ok(Self::Bank),
            other => Err(EngineError::Validation(format!(
                "invalid related kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub from_bank_id: Option<String>,
    pub to_bank_id: Option<String>,
    pub related_id: String,
    pub related_kind: RelatedKind,
    pub balance_after_minor: i64,
    pub occurred_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub from_bank_id: Option<String>,
    pub to_bank_id: Option<String>,
    pub related_id: String,
    pub related_kind: String,
    pub balance_after_minor: i64,
    pub occurred_at: DateTimeUtc,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            from_bank_id: ActiveValue::Set(tx.from_bank_id.clone()),
            to_bank_id: ActiveValue::Set(tx.to_bank_id.clone()),
            related_id: ActiveValue::Set(tx.related_id.clone()),
            related_kind: ActiveValue::Set(tx.related_kind.as_str().to_string()),
            balance_after_minor: ActiveValue::Set(tx.balance_after_minor),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            created_by: ActiveValue::Set(tx.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction".to_string()))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            from_bank_id: model.from_bank_id,
            to_bank_id: model.to_bank_id,
            related_id: model.related_id,
            related_kind: RelatedKind::try_from(model.related_kind.as_str())?,
            balance_after_minor: model.balance_after_minor,
            occurred_at: model.occurred_at,
            created_by: model.created_by,
        })
    }
}
