//! Income rows.
//!
//! Standalone incomes carry a bank and a paired transaction. Trip-generated
//! incomes additionally point at the trip and route that produced them.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub bank_id: Option<String>,
    pub amount_minor: i64,
    pub category: String,
    pub note: Option<String>,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub transaction_id: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
