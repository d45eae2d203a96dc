//! Bank accounts.
//!
//! A bank's balance is the algebraic sum of every transaction that names it
//! as source (debit) or destination (credit). The balance column is the
//! denormalized running total; the transaction log is the audit trail.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: Uuid,
    pub name: String,
    pub account_no: String,
    pub balance_minor: i64,
    pub owner: String,
    pub active: bool,
}

impl Bank {
    pub fn new(name: String, account_no: String, balance_minor: i64, owner: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            account_no,
            balance_minor,
            owner,
            active: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "banks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub account_no: String,
    pub balance_minor: i64,
    pub owner: String,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Bank> for ActiveModel {
    fn from(bank: &Bank) -> Self {
        Self {
            id: ActiveValue::Set(bank.id.to_string()),
            name: ActiveValue::Set(bank.name.clone()),
            account_no: ActiveValue::Set(bank.account_no.clone()),
            balance_minor: ActiveValue::Set(bank.balance_minor),
            owner: ActiveValue::Set(bank.owner.clone()),
            active: ActiveValue::Set(bank.active),
        }
    }
}
