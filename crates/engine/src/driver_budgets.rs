//! Per-driver daily budget ledger.
//!
//! Same carry-forward shape as the fuel ledger: a new allocation absorbs the
//! previous row's `remaining_minor` and zeroes it. Only the freshly
//! allocated portion (`allocated_minor`) is debited from the bank; the
//! carried portion was debited when it was first allocated.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "driver_budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub driver_id: String,
    pub bank_id: String,
    /// New money in this allocation.
    pub allocated_minor: i64,
    /// allocated + carry-forward; immutable once written.
    pub daily_budget_minor: i64,
    /// Spendable pool; trips draw from it.
    pub remaining_minor: i64,
    pub carried_from_id: Option<String>,
    pub transaction_id: Option<String>,
    pub expense_id: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
