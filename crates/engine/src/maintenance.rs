//! Maintenance schedules.
//!
//! One row per vehicle/category accumulates kilometres since the last
//! service. The sweep recomputes `total_km` from the vehicle's latest known
//! odometer reading and flips the status; money only moves on accept.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pending,
    Due,
    Overdue,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Due => "due",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
        }
    }

    /// Status derived from accumulated kilometres. Overdue kicks in at 10%
    /// past the target (inclusive).
    pub fn for_km(total_km: i64, target_km: i64) -> Self {
        if total_km * 10 >= target_km * 11 {
            Self::Overdue
        } else if total_km >= target_km {
            Self::Due
        } else {
            Self::Pending
        }
    }
}

impl TryFrom<&str> for MaintenanceStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "due" => Ok(Self::Due),
            "overdue" => Ok(Self::Overdue),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::Validation(format!(
                "invalid maintenance status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "maintenance_schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub vehicle_id: String,
    pub category: String,
    /// Charged to a bank when the service is accepted.
    pub amount_minor: i64,
    pub start_km: i64,
    pub target_km: i64,
    pub end_km: Option<i64>,
    pub total_km: i64,
    pub status: String,
    pub expense_id: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds() {
        // start 1000, target 500: due at 1500, overdue at 1550.
        assert_eq!(MaintenanceStatus::for_km(499, 500), MaintenanceStatus::Pending);
        assert_eq!(MaintenanceStatus::for_km(500, 500), MaintenanceStatus::Due);
        assert_eq!(MaintenanceStatus::for_km(549, 500), MaintenanceStatus::Due);
        assert_eq!(MaintenanceStatus::for_km(550, 500), MaintenanceStatus::Overdue);
    }
}
