//! Maintenance alerts.
//!
//! The notification object spawned when a schedule first turns due. Kept as
//! its own entity so the accumulator row is never duplicated; at most one
//! open alert exists per schedule.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "maintenance_alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub schedule_id: String,
    pub vehicle_id: String,
    /// Accumulated kilometres at the moment the alert fired.
    pub total_km: i64,
    pub open: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
