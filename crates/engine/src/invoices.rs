//! Invoices.
//!
//! Invariants enforced on every write:
//! `tax_amount = Σ rows * tax_permille / 1000`,
//! `total = Σ rows + tax_amount`,
//! `remaining = max(0, total - advance)`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
    Pending,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::Pending => "pending",
        }
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "paid" => Ok(Self::Paid),
            "unpaid" => Ok(Self::Unpaid),
            "pending" => Ok(Self::Pending),
            other => Err(EngineError::Validation(format!(
                "invalid invoice status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Lorry-receipt number; the human-facing unique key.
    pub lr_no: String,
    pub customer_id: String,
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
    pub tax_permille: i64,
    pub tax_amount_minor: i64,
    pub total_minor: i64,
    pub advance_minor: i64,
    pub remaining_minor: i64,
    pub status: String,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_rows::Entity")]
    Rows,
}

impl Related<super::invoice_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
