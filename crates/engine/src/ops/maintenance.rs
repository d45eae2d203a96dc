//! Maintenance schedules, the km sweep, and accept/decline.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, MaintenanceStatus, RelatedKind, ResultEngine, TransactionKind, expenses,
    fuel_logs, maintenance, maintenance_alerts, trips, vehicles,
};

use super::{Engine, normalize_required, now_or, positive_amount, with_tx};

pub const MAINTENANCE_EXPENSE_CATEGORY: &str = "Maintenance";

pub struct ScheduleCmd {
    pub vehicle_id: String,
    pub category: String,
    pub amount_minor: i64,
    pub start_km: i64,
    pub target_km: i64,
}

/// What one sweep pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub checked: usize,
    pub due: usize,
    pub overdue: usize,
    pub alerts_opened: usize,
}

impl Engine {
    /// Latest odometer reading known for a vehicle, over fuel logs and trips.
    async fn latest_vehicle_km(
        &self,
        db_tx: &DatabaseTransaction,
        vehicle_id: &str,
    ) -> ResultEngine<Option<i64>> {
        let fuel = fuel_logs::Entity::find()
            .filter(fuel_logs::Column::VehicleId.eq(vehicle_id.to_string()))
            .order_by_desc(fuel_logs::Column::EndKm)
            .one(db_tx)
            .await?
            .map(|log| log.end_km);
        let trip = trips::Entity::find()
            .filter(trips::Column::VehicleId.eq(vehicle_id.to_string()))
            .order_by_desc(trips::Column::EndKm)
            .one(db_tx)
            .await?
            .map(|trip| trip.end_km);
        Ok(match (fuel, trip) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (reading, None) | (None, reading) => reading,
        })
    }

    async fn open_alert(
        &self,
        db_tx: &DatabaseTransaction,
        schedule_id: &str,
    ) -> ResultEngine<Option<maintenance_alerts::Model>> {
        Ok(maintenance_alerts::Entity::find()
            .filter(
                Condition::all()
                    .add(maintenance_alerts::Column::ScheduleId.eq(schedule_id.to_string()))
                    .add(maintenance_alerts::Column::Open.eq(true)),
            )
            .one(db_tx)
            .await?)
    }

    async fn close_alert(
        &self,
        db_tx: &DatabaseTransaction,
        schedule_id: &str,
    ) -> ResultEngine<()> {
        if let Some(alert) = self.open_alert(db_tx, schedule_id).await? {
            let mut model: maintenance_alerts::ActiveModel = alert.into();
            model.open = ActiveValue::Set(false);
            model.update(db_tx).await?;
        }
        Ok(())
    }

    pub async fn new_maintenance_schedule(&self, cmd: ScheduleCmd) -> ResultEngine<String> {
        let category = normalize_required(&cmd.category, "maintenance category")?;
        positive_amount(cmd.amount_minor, "maintenance amount")?;
        if cmd.start_km < 0 || cmd.target_km <= 0 {
            return Err(EngineError::Validation(
                "start_km must be >= 0 and target_km > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            vehicles::Entity::find_by_id(cmd.vehicle_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("vehicle {}", cmd.vehicle_id)))?;

            let total_km = self
                .latest_vehicle_km(&db_tx, &cmd.vehicle_id)
                .await?
                .map_or(0, |latest| (latest - cmd.start_km).max(0));

            let id = Uuid::new_v4().to_string();
            let model = maintenance::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                vehicle_id: ActiveValue::Set(cmd.vehicle_id.clone()),
                category: ActiveValue::Set(category),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                start_km: ActiveValue::Set(cmd.start_km),
                target_km: ActiveValue::Set(cmd.target_km),
                end_km: ActiveValue::Set(None),
                total_km: ActiveValue::Set(total_km),
                status: ActiveValue::Set(
                    MaintenanceStatus::for_km(total_km, cmd.target_km)
                        .as_str()
                        .to_string(),
                ),
                expense_id: ActiveValue::Set(None),
                transaction_id: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now()),
            };
            model.insert(&db_tx).await?;
            Ok(id)
        })
    }

    pub async fn maintenance_schedule(&self, id: &str) -> ResultEngine<maintenance::Model> {
        maintenance::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("maintenance schedule {id}")))
    }

    pub async fn list_maintenance_schedules(
        &self,
        vehicle_id: Option<&str>,
    ) -> ResultEngine<Vec<maintenance::Model>> {
        let mut condition = Condition::all();
        if let Some(vehicle_id) = vehicle_id {
            condition = condition.add(maintenance::Column::VehicleId.eq(vehicle_id.to_string()));
        }
        Ok(maintenance::Entity::find()
            .filter(condition)
            .order_by_desc(maintenance::Column::CreatedAt)
            .all(&self.database)
            .await?)
    }

    pub async fn delete_maintenance_schedule(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let schedule = maintenance::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("maintenance schedule {id}")))?;
            if schedule.status == MaintenanceStatus::Completed.as_str() {
                return Err(EngineError::InvalidTransition(
                    "completed maintenance cannot be deleted".to_string(),
                ));
            }
            maintenance_alerts::Entity::delete_many()
                .filter(maintenance_alerts::Column::ScheduleId.eq(id.to_string()))
                .exec(&db_tx)
                .await?;
            schedule.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Recompute every non-completed schedule from the vehicles' latest
    /// odometer readings, flip statuses and open alerts.
    pub async fn run_maintenance_sweep(&self) -> ResultEngine<SweepSummary> {
        with_tx!(self, |db_tx| self.sweep_inner(&db_tx).await)
    }

    pub(super) async fn sweep_inner(
        &self,
        db_tx: &DatabaseTransaction,
    ) -> ResultEngine<SweepSummary> {
        let schedules = maintenance::Entity::find()
            .filter(maintenance::Column::Status.ne(MaintenanceStatus::Completed.as_str()))
            .all(db_tx)
            .await?;

        let mut summary = SweepSummary {
            checked: schedules.len(),
            ..SweepSummary::default()
        };

        for schedule in schedules {
            let total_km = match self.latest_vehicle_km(db_tx, &schedule.vehicle_id).await? {
                Some(latest) => (latest - schedule.start_km).max(0),
                None => schedule.total_km,
            };
            let status = MaintenanceStatus::for_km(total_km, schedule.target_km);
            match status {
                MaintenanceStatus::Due => summary.due += 1,
                MaintenanceStatus::Overdue => summary.overdue += 1,
                _ => {}
            }

            if total_km != schedule.total_km || status.as_str() != schedule.status {
                let mut model: maintenance::ActiveModel = schedule.clone().into();
                model.total_km = ActiveValue::Set(total_km);
                model.status = ActiveValue::Set(status.as_str().to_string());
                model.update(db_tx).await?;
            }

            if matches!(status, MaintenanceStatus::Due | MaintenanceStatus::Overdue)
                && self.open_alert(db_tx, &schedule.id).await?.is_none()
            {
                let alert = maintenance_alerts::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4().to_string()),
                    schedule_id: ActiveValue::Set(schedule.id.clone()),
                    vehicle_id: ActiveValue::Set(schedule.vehicle_id.clone()),
                    total_km: ActiveValue::Set(total_km),
                    open: ActiveValue::Set(true),
                    created_at: ActiveValue::Set(Utc::now()),
                };
                alert.insert(db_tx).await?;
                summary.alerts_opened += 1;
                tracing::info!(
                    schedule = %schedule.id,
                    vehicle = %schedule.vehicle_id,
                    total_km,
                    status = status.as_str(),
                    "maintenance alert opened"
                );
            }
        }

        Ok(summary)
    }

    /// Accept a due service: debit the bank, record the expense, complete
    /// the schedule and close its alert. Terminal.
    pub async fn accept_maintenance(
        &self,
        id: &str,
        bank_id: &str,
        occurred_at: Option<DateTime<Utc>>,
        created_by: &str,
    ) -> ResultEngine<()> {
        let occurred_at = now_or(occurred_at);

        with_tx!(self, |db_tx| {
            let schedule = maintenance::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("maintenance schedule {id}")))?;
            let status = MaintenanceStatus::try_from(schedule.status.as_str())?;
            if !matches!(status, MaintenanceStatus::Due | MaintenanceStatus::Overdue) {
                return Err(EngineError::InvalidTransition(format!(
                    "maintenance is {}, only due or overdue can be accepted",
                    schedule.status
                )));
            }

            let tx_id = self
                .post(
                    &db_tx,
                    bank_id,
                    -schedule.amount_minor,
                    TransactionKind::Maintenance,
                    id,
                    RelatedKind::Maintenance,
                    occurred_at,
                    created_by,
                )
                .await?;

            let expense_id = Uuid::new_v4().to_string();
            let expense = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.clone()),
                bank_id: ActiveValue::Set(Some(bank_id.to_string())),
                amount_minor: ActiveValue::Set(schedule.amount_minor),
                category: ActiveValue::Set(MAINTENANCE_EXPENSE_CATEGORY.to_string()),
                note: ActiveValue::Set(Some(schedule.category.clone())),
                trip_id: ActiveValue::Set(None),
                route_id: ActiveValue::Set(None),
                maintenance_id: ActiveValue::Set(Some(id.to_string())),
                transaction_id: ActiveValue::Set(Some(tx_id.clone())),
                occurred_at: ActiveValue::Set(occurred_at),
                created_by: ActiveValue::Set(created_by.to_string()),
            };
            expense.insert(&db_tx).await?;

            let end_km = schedule.start_km + schedule.total_km;
            let mut model: maintenance::ActiveModel = schedule.into();
            model.status = ActiveValue::Set(MaintenanceStatus::Completed.as_str().to_string());
            model.end_km = ActiveValue::Set(Some(end_km));
            model.expense_id = ActiveValue::Set(Some(expense_id));
            model.transaction_id = ActiveValue::Set(Some(tx_id));
            model.update(&db_tx).await?;

            self.close_alert(&db_tx, id).await?;
            Ok(())
        })
    }

    /// Dismiss the alert without spending; the schedule goes back to
    /// pending until the next sweep re-evaluates it.
    pub async fn decline_maintenance(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let schedule = maintenance::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("maintenance schedule {id}")))?;
            if schedule.status == MaintenanceStatus::Completed.as_str() {
                return Err(EngineError::InvalidTransition(
                    "completed maintenance cannot be declined".to_string(),
                ));
            }
            self.close_alert(&db_tx, id).await?;
            let mut model: maintenance::ActiveModel = schedule.into();
            model.status = ActiveValue::Set(MaintenanceStatus::Pending.as_str().to_string());
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn list_open_alerts(&self) -> ResultEngine<Vec<maintenance_alerts::Model>> {
        Ok(maintenance_alerts::Entity::find()
            .filter(maintenance_alerts::Column::Open.eq(true))
            .order_by_desc(maintenance_alerts::Column::CreatedAt)
            .all(&self.database)
            .await?)
    }
}
