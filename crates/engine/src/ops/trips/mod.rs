//! Trip lifecycle: creation with the full cost breakdown, status
//! transitions, and deletion with reversal of everything the trip touched.
//!
//! Completion fan-out lives in [`cascade`].

mod cascade;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, RouteStatus, TripStatus, attendance, driver_budgets, drivers,
    fuel_logs, trip_routes, trips, vehicles,
};

use super::{Engine, normalize_required, now_or, with_tx};

pub struct RouteExpenseCmd {
    pub description: String,
    pub amount_minor: i64,
}

pub struct RouteCmd {
    pub customer_id: String,
    pub bank_id: String,
    /// Rate per tonne, minor units.
    pub rate_minor: i64,
    /// Load in milli-tonnes.
    pub weight_milli: i64,
    /// Overrides `rate * weight / 1000` when supplied.
    pub amount_minor: Option<i64>,
    pub advance_minor: i64,
    pub expenses: Vec<RouteExpenseCmd>,
    pub status: RouteStatus,
}

pub struct TripCmd {
    pub vehicle_id: String,
    pub driver_id: String,
    pub start_km: i64,
    pub end_km: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub routes: Vec<RouteCmd>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

#[derive(Default)]
pub struct TripUpdateCmd {
    pub status: Option<TripStatus>,
    pub end_km: Option<i64>,
    /// `(route_no, status)` pairs.
    pub route_statuses: Vec<(i32, RouteStatus)>,
}

pub(super) fn fuel_needed_milli(total_km: i64, average_milli: i64) -> ResultEngine<i64> {
    if average_milli <= 0 {
        return Err(EngineError::Validation(
            "fuel record has no mileage".to_string(),
        ));
    }
    Ok(total_km * 1_000_000 / average_milli)
}

impl Engine {
    pub async fn new_trip(&self, cmd: TripCmd) -> ResultEngine<String> {
        let created_by = normalize_required(&cmd.created_by, "created_by")?;
        if cmd.routes.is_empty() {
            return Err(EngineError::Validation(
                "a trip needs at least one route".to_string(),
            ));
        }
        if cmd.start_km < 0 || cmd.end_km <= cmd.start_km {
            return Err(EngineError::Validation(
                "end_km must be greater than start_km".to_string(),
            ));
        }
        if cmd.end_date < cmd.start_date {
            return Err(EngineError::Validation(
                "end_date must not precede start_date".to_string(),
            ));
        }
        let total_km = cmd.end_km - cmd.start_km;
        let occurred_at = now_or(cmd.occurred_at);

        with_tx!(self, |db_tx| {
            let vehicle = vehicles::Entity::find_by_id(cmd.vehicle_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("vehicle {}", cmd.vehicle_id)))?;
            drivers::Entity::find_by_id(cmd.driver_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("driver {}", cmd.driver_id)))?;

            let fuel_log = self
                .latest_fuel_log(&db_tx, &vehicle.id, None)
                .await?
                .ok_or_else(|| {
                    EngineError::Validation(format!("no fuel record for vehicle {}", vehicle.id))
                })?;

            let fuel_used_milli = fuel_needed_milli(total_km, fuel_log.average_milli)?;
            let diesel_cost_minor = fuel_used_milli * fuel_log.rate_minor / 1000;

            let trip_id = Uuid::new_v4().to_string();
            let mut route_cost_minor = 0;
            let mut expenses_minor = 0;
            let mut routes = Vec::with_capacity(cmd.routes.len());
            for (index, route) in cmd.routes.iter().enumerate() {
                if route.rate_minor < 0 || route.weight_milli < 0 {
                    return Err(EngineError::InvalidAmount(
                        "route rate and weight must be >= 0".to_string(),
                    ));
                }
                let amount_minor = route
                    .amount_minor
                    .unwrap_or(route.rate_minor * route.weight_milli / 1000);
                if amount_minor <= 0 {
                    return Err(EngineError::InvalidAmount(
                        "route amount must be > 0".to_string(),
                    ));
                }
                if route.advance_minor < 0 || route.advance_minor > amount_minor {
                    return Err(EngineError::InvalidAmount(
                        "route advance must be between 0 and the route amount".to_string(),
                    ));
                }
                let route_expenses: i64 = route.expenses.iter().map(|e| e.amount_minor).sum();
                if route.expenses.iter().any(|e| e.amount_minor < 0) {
                    return Err(EngineError::InvalidAmount(
                        "route expenses must be >= 0".to_string(),
                    ));
                }
                route_cost_minor += amount_minor;
                expenses_minor += route_expenses;

                routes.push(trip_routes::Model {
                    id: Uuid::new_v4().to_string(),
                    trip_id: trip_id.clone(),
                    route_no: i32::try_from(index + 1)
                        .map_err(|_| EngineError::Validation("too many routes".to_string()))?,
                    customer_id: route.customer_id.clone(),
                    bank_id: route.bank_id.clone(),
                    rate_minor: route.rate_minor,
                    weight_milli: route.weight_milli,
                    amount_minor,
                    advance_minor: route.advance_minor,
                    expenses_minor: route_expenses,
                    status: route.status.as_str().to_string(),
                });
            }

            let completed_routes = routes
                .iter()
                .filter(|r| r.status == RouteStatus::Completed.as_str())
                .count();
            let status = if completed_routes == routes.len() {
                TripStatus::Completed
            } else if completed_routes > 0 {
                TripStatus::InProgress
            } else {
                TripStatus::Draft
            };

            let remaining_minor = route_cost_minor - expenses_minor - diesel_cost_minor;
            let trip = trips::Model {
                id: trip_id.clone(),
                vehicle_id: vehicle.id,
                driver_id: cmd.driver_id.clone(),
                start_km: cmd.start_km,
                end_km: cmd.end_km,
                start_date: cmd.start_date,
                end_date: cmd.end_date,
                status: status.as_str().to_string(),
                route_cost_minor,
                expenses_minor,
                diesel_cost_minor,
                remaining_minor,
                fuel_used_milli: 0,
                fuel_log_id: fuel_log.id.clone(),
                created_by: created_by.clone(),
                created_at: occurred_at,
            };
            let active: trips::ActiveModel = trip.clone().into();
            active.insert(&db_tx).await?;
            for route in &routes {
                let active: trip_routes::ActiveModel = route.clone().into();
                active.insert(&db_tx).await?;
            }

            self.charge_driver_budget(&db_tx, &cmd.driver_id, expenses_minor)
                .await?;
            let trip = self.draw_trip_fuel(&db_tx, trip).await?;

            if completed_routes > 0 {
                self.settle_completed_routes(&db_tx, &trip, &routes).await?;
                self.upsert_trip_attendance(&db_tx, &trip).await?;
            }
            self.sweep_inner(&db_tx).await?;

            tracing::info!(
                trip = %trip_id,
                routes = routes.len(),
                route_cost_minor,
                diesel_cost_minor,
                "trip created"
            );
            Ok(trip_id)
        })
    }

    pub async fn trip(
        &self,
        id: &str,
    ) -> ResultEngine<(trips::Model, Vec<trip_routes::Model>)> {
        let trip = trips::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("trip {id}")))?;
        let routes = trip_routes::Entity::find()
            .filter(trip_routes::Column::TripId.eq(id.to_string()))
            .order_by_asc(trip_routes::Column::RouteNo)
            .all(&self.database)
            .await?;
        Ok((trip, routes))
    }

    pub async fn list_trips(
        &self,
    ) -> ResultEngine<Vec<(trips::Model, Vec<trip_routes::Model>)>> {
        Ok(trips::Entity::find()
            .find_with_related(trip_routes::Entity)
            .order_by_desc(trips::Column::CreatedAt)
            .all(&self.database)
            .await?)
    }

    pub async fn update_trip(&self, id: &str, update: TripUpdateCmd) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let trip = trips::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("trip {id}")))?;
            let old_status = TripStatus::try_from(trip.status.as_str())?;
            let mut new_status = update.status.unwrap_or(old_status);
            let route_went_completed = update
                .route_statuses
                .iter()
                .any(|(_, status)| *status == RouteStatus::Completed);

            let mut trip = trip;
            if let Some(end_km) = update.end_km {
                if old_status == TripStatus::Completed {
                    return Err(EngineError::InvalidTransition(
                        "completed trips cannot be re-measured".to_string(),
                    ));
                }
                if end_km <= trip.start_km {
                    return Err(EngineError::Validation(
                        "end_km must be greater than start_km".to_string(),
                    ));
                }
                trip = self.remeasure_trip(&db_tx, trip, end_km).await?;
            }

            for (route_no, status) in &update.route_statuses {
                let route = trip_routes::Entity::find()
                    .filter(trip_routes::Column::TripId.eq(id.to_string()))
                    .filter(trip_routes::Column::RouteNo.eq(*route_no))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        EngineError::KeyNotFound(format!("route {route_no} of trip {id}"))
                    })?;
                let mut model: trip_routes::ActiveModel = route.into();
                model.status = ActiveValue::Set(status.as_str().to_string());
                model.update(&db_tx).await?;
            }

            match (old_status, new_status) {
                (TripStatus::Completed, TripStatus::Completed) => {}
                (_, TripStatus::Completed) => {
                    // Completing the trip completes every route.
                    let pending = trip_routes::Entity::find()
                        .filter(trip_routes::Column::TripId.eq(id.to_string()))
                        .filter(trip_routes::Column::Status.ne(RouteStatus::Completed.as_str()))
                        .all(&db_tx)
                        .await?;
                    for route in pending {
                        let mut model: trip_routes::ActiveModel = route.into();
                        model.status =
                            ActiveValue::Set(RouteStatus::Completed.as_str().to_string());
                        model.update(&db_tx).await?;
                    }
                    trip = self.draw_trip_fuel(&db_tx, trip).await?;
                    let routes = trip_routes::Entity::find()
                        .filter(trip_routes::Column::TripId.eq(id.to_string()))
                        .order_by_asc(trip_routes::Column::RouteNo)
                        .all(&db_tx)
                        .await?;
                    self.settle_completed_routes(&db_tx, &trip, &routes).await?;
                    self.upsert_trip_attendance(&db_tx, &trip).await?;
                }
                (TripStatus::Completed, _) => {
                    self.unsettle_trip(&db_tx, &trip).await?;
                    trip = self.restore_trip_fuel(&db_tx, trip).await?;
                }
                _ => {
                    // Route-level completion settles that route right away;
                    // the keyed fan-out leaves already-settled routes alone.
                    if route_went_completed {
                        let routes = trip_routes::Entity::find()
                            .filter(trip_routes::Column::TripId.eq(id.to_string()))
                            .order_by_asc(trip_routes::Column::RouteNo)
                            .all(&db_tx)
                            .await?;
                        self.settle_completed_routes(&db_tx, &trip, &routes).await?;
                        self.upsert_trip_attendance(&db_tx, &trip).await?;
                        if new_status == TripStatus::Draft && update.status.is_none() {
                            new_status = TripStatus::InProgress;
                        }
                    }
                }
            }

            if new_status != old_status {
                let mut model: trips::ActiveModel = trip.into();
                model.status = ActiveValue::Set(new_status.as_str().to_string());
                model.update(&db_tx).await?;
            }
            self.sweep_inner(&db_tx).await?;
            Ok(())
        })
    }

    pub async fn list_attendance(
        &self,
        driver_id: Option<&str>,
    ) -> ResultEngine<Vec<attendance::Model>> {
        let mut query = attendance::Entity::find().order_by_asc(attendance::Column::Date);
        if let Some(driver_id) = driver_id {
            query = query.filter(attendance::Column::DriverId.eq(driver_id.to_string()));
        }
        Ok(query.all(&self.database).await?)
    }

    pub async fn delete_trip(&self, id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let trip = trips::Entity::find_by_id(id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("trip {id}")))?;

            self.unsettle_trip(&db_tx, &trip).await?;
            let trip = self.restore_trip_fuel(&db_tx, trip).await?;
            self.restore_driver_budget(&db_tx, &trip.driver_id, trip.expenses_minor)
                .await?;
            self.remove_trip_attendance(&db_tx, &trip.id).await?;

            trip_routes::Entity::delete_many()
                .filter(trip_routes::Column::TripId.eq(id.to_string()))
                .exec(&db_tx)
                .await?;
            trip.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// End-km edit on a non-completed trip: put the old fuel draw back,
    /// recompute the distance-derived figures, draw again.
    async fn remeasure_trip(
        &self,
        db_tx: &DatabaseTransaction,
        trip: trips::Model,
        end_km: i64,
    ) -> ResultEngine<trips::Model> {
        let trip = self.restore_trip_fuel(db_tx, trip).await?;
        let fuel_log = fuel_logs::Entity::find_by_id(trip.fuel_log_id.clone())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("fuel log {}", trip.fuel_log_id)))?;

        let total_km = end_km - trip.start_km;
        let needed_milli = fuel_needed_milli(total_km, fuel_log.average_milli)?;
        let diesel_cost_minor = needed_milli * fuel_log.rate_minor / 1000;
        let remaining_minor = trip.route_cost_minor - trip.expenses_minor - diesel_cost_minor;

        let mut model: trips::ActiveModel = trip.clone().into();
        model.end_km = ActiveValue::Set(end_km);
        model.diesel_cost_minor = ActiveValue::Set(diesel_cost_minor);
        model.remaining_minor = ActiveValue::Set(remaining_minor);
        let trip = model.update(db_tx).await?;
        self.draw_trip_fuel(db_tx, trip).await
    }

    async fn charge_driver_budget(
        &self,
        db_tx: &DatabaseTransaction,
        driver_id: &str,
        amount_minor: i64,
    ) -> ResultEngine<()> {
        if amount_minor == 0 {
            return Ok(());
        }
        if let Some(budget) = self.latest_budget(db_tx, driver_id, None).await? {
            let mut model: driver_budgets::ActiveModel = budget.clone().into();
            model.remaining_minor = ActiveValue::Set(budget.remaining_minor - amount_minor);
            model.update(db_tx).await?;
        }
        Ok(())
    }

    async fn restore_driver_budget(
        &self,
        db_tx: &DatabaseTransaction,
        driver_id: &str,
        amount_minor: i64,
    ) -> ResultEngine<()> {
        if amount_minor == 0 {
            return Ok(());
        }
        if let Some(budget) = self.latest_budget(db_tx, driver_id, None).await? {
            let mut model: driver_budgets::ActiveModel = budget.clone().into();
            model.remaining_minor = ActiveValue::Set(budget.remaining_minor + amount_minor);
            model.update(db_tx).await?;
        }
        Ok(())
    }
}
