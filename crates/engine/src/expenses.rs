//! Expense rows.
//!
//! `bank_id`/`transaction_id` are set when the expense moved money (direct
//! expenses, budget mirrors, maintenance). Trip route expenses are paid out
//! of the driver budget and carry neither.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub bank_id: Option<String>,
    pub amount_minor: i64,
    pub category: String,
    pub note: Option<String>,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub maintenance_id: Option<String>,
    pub transaction_id: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
