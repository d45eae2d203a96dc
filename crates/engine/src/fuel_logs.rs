//! Per-vehicle fuel fill-up ledger.
//!
//! Each row is one fill-up. Unused fuel rolls forward: when a new fill-up is
//! recorded for a vehicle, the previous open row's `remaining_milli` moves
//! into the new row as `carried_milli` and the previous row is zeroed, so at
//! most one row per vehicle holds a non-zero remainder. `carried_from_id`
//! makes the chain explicit instead of relying purely on creation order.
//!
//! Invariant: `average_milli = total_km * 1_000_000 / (quantity_milli +
//! carried_milli)` where `total_km = end_km - start_km`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelLog {
    pub id: Uuid,
    pub vehicle_id: String,
    pub bank_id: String,
    pub start_km: i64,
    pub end_km: i64,
    /// Purchased this fill-up, millilitres.
    pub quantity_milli: i64,
    /// Carry-forward received from the previous fill-up, millilitres.
    pub carried_milli: i64,
    /// Still unconsumed by trips, millilitres.
    pub remaining_milli: i64,
    /// Price per litre, minor units.
    pub rate_minor: i64,
    /// Cost of the purchased portion only.
    pub total_amount_minor: i64,
    /// km/L over purchased + carried fuel, scaled by 1000.
    pub average_milli: i64,
    pub carried_from_id: Option<String>,
    pub transaction_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "fuel_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vehicle_id: String,
    pub bank_id: String,
    pub start_km: i64,
    pub end_km: i64,
    pub quantity_milli: i64,
    pub carried_milli: i64,
    pub remaining_milli: i64,
    pub rate_minor: i64,
    pub total_amount_minor: i64,
    pub average_milli: i64,
    pub carried_from_id: Option<String>,
    pub transaction_id: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&FuelLog> for ActiveModel {
    fn from(log: &FuelLog) -> Self {
        Self {
            id: ActiveValue::Set(log.id.to_string()),
            vehicle_id: ActiveValue::Set(log.vehicle_id.clone()),
            bank_id: ActiveValue::Set(log.bank_id.clone()),
            start_km: ActiveValue::Set(log.start_km),
            end_km: ActiveValue::Set(log.end_km),
            quantity_milli: ActiveValue::Set(log.quantity_milli),
            carried_milli: ActiveValue::Set(log.carried_milli),
            remaining_milli: ActiveValue::Set(log.remaining_milli),
            rate_minor: ActiveValue::Set(log.rate_minor),
            total_amount_minor: ActiveValue::Set(log.total_amount_minor),
            average_milli: ActiveValue::Set(log.average_milli),
            carried_from_id: ActiveValue::Set(log.carried_from_id.clone()),
            transaction_id: ActiveValue::Set(log.transaction_id.clone()),
            occurred_at: ActiveValue::Set(log.occurred_at),
            created_by: ActiveValue::Set(log.created_by.clone()),
        }
    }
}

impl TryFrom<Model> for FuelLog {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("fuel log".to_string()))?,
            vehicle_id: model.vehicle_id,
            bank_id: model.bank_id,
            start_km: model.start_km,
            end_km: model.end_km,
            quantity_milli: model.quantity_milli,
            carried_milli: model.carried_milli,
            remaining_milli: model.remaining_milli,
            rate_minor: model.rate_minor,
            total_amount_minor: model.total_amount_minor,
            average_milli: model.average_milli,
            carried_from_id: model.carried_from_id,
            transaction_id: model.transaction_id,
            occurred_at: model.occurred_at,
            created_by: model.created_by,
        })
    }
}
