//! Fuel fill-ups and the per-vehicle carry-forward chain.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, FuelLog, RelatedKind, ResultEngine, TransactionKind, fuel_logs, trips, vehicles,
};

use super::{Engine, now_or, with_tx};

pub struct FillUpCmd {
    pub vehicle_id: String,
    pub bank_id: String,
    pub start_km: i64,
    pub end_km: i64,
    pub quantity_milli: i64,
    pub rate_minor: i64,
    pub occurred_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

#[derive(Default)]
pub struct FillUpUpdate {
    pub vehicle_id: Option<String>,
    pub bank_id: Option<String>,
    pub start_km: Option<i64>,
    pub end_km: Option<i64>,
    pub quantity_milli: Option<i64>,
    pub rate_minor: Option<i64>,
}

fn check_readings(start_km: i64, end_km: i64) -> ResultEngine<i64> {
    if start_km < 0 || end_km <= start_km {
        return Err(EngineError::Validation(
            "end_km must be greater than start_km".to_string(),
        ));
    }
    Ok(end_km - start_km)
}

fn check_purchase(quantity_milli: i64, rate_minor: i64) -> ResultEngine<()> {
    if quantity_milli <= 0 {
        return Err(EngineError::InvalidAmount(
            "fuel quantity must be > 0".to_string(),
        ));
    }
    if rate_minor <= 0 {
        return Err(EngineError::InvalidAmount(
            "fuel rate must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// km/L scaled by 1000, over purchased + carried fuel.
fn mileage_milli(total_km: i64, total_milli: i64) -> i64 {
    total_km * 1_000_000 / total_milli
}

impl Engine {
    pub(super) async fn latest_fuel_log(
        &self,
        db_tx: &DatabaseTransaction,
        vehicle_id: &str,
        exclude_id: Option<&str>,
    ) -> ResultEngine<Option<fuel_logs::Model>> {
        let mut query = fuel_logs::Entity::find()
            .filter(fuel_logs::Column::VehicleId.eq(vehicle_id.to_string()))
            .order_by_desc(fuel_logs::Column::OccurredAt)
            .order_by_desc(fuel_logs::Column::Id);
        if let Some(id) = exclude_id {
            query = query.filter(fuel_logs::Column::Id.ne(id.to_string()));
        }
        Ok(query.one(db_tx).await?)
    }

    async fn require_fuel_log(
        &self,
        db_tx: &DatabaseTransaction,
        id: &str,
    ) -> ResultEngine<fuel_logs::Model> {
        fuel_logs::Entity::find_by_id(id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("fuel log {id}")))
    }

    /// Give a zeroed predecessor its carried remainder back.
    async fn restore_carry(
        &self,
        db_tx: &DatabaseTransaction,
        carried_from_id: Option<&str>,
        carried_milli: i64,
    ) -> ResultEngine<()> {
        let Some(prev_id) = carried_from_id else {
            return Ok(());
        };
        if carried_milli == 0 {
            return Ok(());
        }
        if let Some(prev) = fuel_logs::Entity::find_by_id(prev_id.to_string())
            .one(db_tx)
            .await?
        {
            let mut model: fuel_logs::ActiveModel = prev.clone().into();
            model.remaining_milli = ActiveValue::Set(prev.remaining_milli + carried_milli);
            model.update(db_tx).await?;
        }
        Ok(())
    }

    /// A log is locked once trips draw from it or a newer fill-up carries
    /// its remainder forward.
    async fn fuel_log_locked(
        &self,
        db_tx: &DatabaseTransaction,
        log: &fuel_logs::Model,
    ) -> ResultEngine<Option<&'static str>> {
        if log.remaining_milli < log.quantity_milli + log.carried_milli {
            return Ok(Some("trips have drawn fuel from this fill-up"));
        }
        let drawn_by_trip = trips::Entity::find()
            .filter(trips::Column::FuelLogId.eq(log.id.clone()))
            .one(db_tx)
            .await?;
        if drawn_by_trip.is_some() {
            return Ok(Some("a trip references this fill-up"));
        }
        let successor = fuel_logs::Entity::find()
            .filter(fuel_logs::Column::CarriedFromId.eq(log.id.clone()))
            .one(db_tx)
            .await?;
        if successor.is_some() {
            return Ok(Some("a later fill-up carries from this one"));
        }
        Ok(None)
    }

    pub async fn record_fill_up(&self, cmd: FillUpCmd) -> ResultEngine<String> {
        let total_km = check_readings(cmd.start_km, cmd.end_km)?;
        check_purchase(cmd.quantity_milli, cmd.rate_minor)?;
        let occurred_at = now_or(cmd.occurred_at);

        with_tx!(self, |db_tx| {
            let vehicle = vehicles::Entity::find_by_id(cmd.vehicle_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("vehicle {}", cmd.vehicle_id)))?;

            let previous = self.latest_fuel_log(&db_tx, &vehicle.id, None).await?;
            let (carried_milli, carried_from_id) = match &previous {
                Some(prev) if prev.remaining_milli > 0 => {
                    let mut model: fuel_logs::ActiveModel = prev.clone().into();
                    model.remaining_milli = ActiveValue::Set(0);
                    model.update(&db_tx).await?;
                    (prev.remaining_milli, Some(prev.id.clone()))
                }
                _ => (0, None),
            };

            let total_milli = cmd.quantity_milli + carried_milli;
            let total_amount_minor = cmd.quantity_milli * cmd.rate_minor / 1000;

            let log = FuelLog {
                id: Uuid::new_v4(),
                vehicle_id: vehicle.id,
                bank_id: cmd.bank_id.clone(),
                start_km: cmd.start_km,
                end_km: cmd.end_km,
                quantity_milli: cmd.quantity_milli,
                carried_milli,
                remaining_milli: total_milli,
                rate_minor: cmd.rate_minor,
                total_amount_minor,
                average_milli: mileage_milli(total_km, total_milli),
                carried_from_id,
                transaction_id: None,
                occurred_at,
                created_by: cmd.created_by.clone(),
            };
            let id = log.id.to_string();
            fuel_logs::ActiveModel::from(&log).insert(&db_tx).await?;

            let tx_id = self
                .post(
                    &db_tx,
                    &cmd.bank_id,
                    -total_amount_minor,
                    TransactionKind::Fuel,
                    &id,
                    RelatedKind::FuelLog,
                    occurred_at,
                    &cmd.created_by,
                )
                .await?;
            let link = fuel_logs::ActiveModel {
                id: ActiveValue::Set(id.clone()),
                transaction_id: ActiveValue::Set(Some(tx_id)),
                ..Default::default()
            };
            link.update(&db_tx).await?;

            Ok(id)
        })
    }

    pub async fn fill_up(&self, id: &str) -> ResultEngine<fuel_logs::Model> {
        fuel_logs::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("fuel log {id}")))
    }

    pub async fn list_fill_ups(
        &self,
        vehicle_id: Option<&str>,
    ) -> ResultEngine<Vec<fuel_logs::Model>> {
        let mut condition = Condition::all();
        if let Some(vehicle_id) = vehicle_id {
            condition = condition.add(fuel_logs::Column::VehicleId.eq(vehicle_id.to_string()));
        }
        Ok(fuel_logs::Entity::find()
            .filter(condition)
            .order_by_desc(fuel_logs::Column::OccurredAt)
            .order_by_desc(fuel_logs::Column::Id)
            .all(&self.database)
            .await?)
    }

    /// Edit a fill-up that nothing has consumed yet. Changing the vehicle
    /// reattaches the carry chain: the old predecessor gets its remainder
    /// back and the new vehicle's open remainder is absorbed instead.
    pub async fn update_fill_up(&self, id: &str, update: FillUpUpdate) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let log = self.require_fuel_log(&db_tx, id).await?;
            if let Some(reason) = self.fuel_log_locked(&db_tx, &log).await? {
                return Err(EngineError::InvalidTransition(reason.to_string()));
            }

            let start_km = update.start_km.unwrap_or(log.start_km);
            let end_km = update.end_km.unwrap_or(log.end_km);
            let quantity_milli = update.quantity_milli.unwrap_or(log.quantity_milli);
            let rate_minor = update.rate_minor.unwrap_or(log.rate_minor);
            let total_km = check_readings(start_km, end_km)?;
            check_purchase(quantity_milli, rate_minor)?;

            let vehicle_id = update.vehicle_id.unwrap_or_else(|| log.vehicle_id.clone());
            let bank_id = update.bank_id.unwrap_or_else(|| log.bank_id.clone());

            let (carried_milli, carried_from_id) = if vehicle_id == log.vehicle_id {
                (log.carried_milli, log.carried_from_id.clone())
            } else {
                vehicles::Entity::find_by_id(vehicle_id.clone())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound(format!("vehicle {vehicle_id}")))?;
                self.restore_carry(&db_tx, log.carried_from_id.as_deref(), log.carried_milli)
                    .await?;
                match self.latest_fuel_log(&db_tx, &vehicle_id, Some(id)).await? {
                    Some(prev) if prev.remaining_milli > 0 => {
                        let remainder = prev.remaining_milli;
                        let mut model: fuel_logs::ActiveModel = prev.clone().into();
                        model.remaining_milli = ActiveValue::Set(0);
                        model.update(&db_tx).await?;
                        (remainder, Some(prev.id))
                    }
                    _ => (0, None),
                }
            };

            let total_milli = quantity_milli + carried_milli;
            let total_amount_minor = quantity_milli * rate_minor / 1000;

            let mut tx_id = log.transaction_id.clone();
            if total_amount_minor != log.total_amount_minor || bank_id != log.bank_id {
                if let Some(old_tx) = log.transaction_id.as_deref() {
                    self.reverse_posting(&db_tx, old_tx).await?;
                }
                tx_id = Some(
                    self.post(
                        &db_tx,
                        &bank_id,
                        -total_amount_minor,
                        TransactionKind::Fuel,
                        id,
                        RelatedKind::FuelLog,
                        log.occurred_at,
                        &log.created_by,
                    )
                    .await?,
                );
            }

            let mut model: fuel_logs::ActiveModel = log.into();
            model.vehicle_id = ActiveValue::Set(vehicle_id);
            model.bank_id = ActiveValue::Set(bank_id);
            model.start_km = ActiveValue::Set(start_km);
            model.end_km = ActiveValue::Set(end_km);
            model.quantity_milli = ActiveValue::Set(quantity_milli);
            model.carried_milli = ActiveValue::Set(carried_milli);
            model.remaining_milli = ActiveValue::Set(total_milli);
            model.rate_minor = ActiveValue::Set(rate_minor);
            model.total_amount_minor = ActiveValue::Set(total_amount_minor);
            model.average_milli = ActiveValue::Set(mileage_milli(total_km, total_milli));
            model.carried_from_id = ActiveValue::Set(carried_from_id);
            model.transaction_id = ActiveValue::Set(tx_id);
            model.update(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn delete_fill_up(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let log = self.require_fuel_log(&db_tx, id).await?;
            if let Some(reason) = self.fuel_log_locked(&db_tx, &log).await? {
                return Err(EngineError::InvalidTransition(reason.to_string()));
            }
            self.restore_carry(&db_tx, log.carried_from_id.as_deref(), log.carried_milli)
                .await?;
            if let Some(tx_id) = log.transaction_id.as_deref() {
                self.reverse_posting(&db_tx, tx_id).await?;
            }
            log.delete(&db_tx).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::mileage_milli;

    #[test]
    fn mileage_over_purchased_and_carried_fuel() {
        // 100 km on 10 L -> 10.000 km/L
        assert_eq!(mileage_milli(100, 10_000), 10_000);
        // 150 km on 22 L -> 6.818 km/L, truncated
        assert_eq!(mileage_milli(150, 22_000), 6_818);
    }
}
