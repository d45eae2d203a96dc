//! Trips.
//!
//! The trip row stores the derived cost breakdown computed at creation:
//! `remaining_minor = route_cost - expenses - diesel_cost`. `fuel_used_milli`
//! records how much was drawn from the fuel ledger so reversals cannot
//! double-restore.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Draft,
    InProgress,
    Completed,
}

impl TripStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TripStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(Self::Draft),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::Validation(format!(
                "invalid trip status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vehicle_id: String,
    pub driver_id: String,
    pub start_km: i64,
    pub end_km: i64,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub route_cost_minor: i64,
    pub expenses_minor: i64,
    pub diesel_cost_minor: i64,
    pub remaining_minor: i64,
    pub fuel_used_milli: i64,
    /// Fuel log the diesel was drawn from.
    pub fuel_log_id: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::trip_routes::Entity")]
    Routes,
}

impl Related<super::trip_routes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Routes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
