//! Completion fan-out: invoices, incomes, expenses, attendance and the
//! fuel draw. Every step is keyed so a re-run settles only what is missing.

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    AttendanceStatus, EngineError, InvoiceStatus, RelatedKind, ResultEngine, RouteStatus,
    Transaction, TransactionKind, attendance, fuel_logs, incomes, invoice_rows, invoices,
    transactions, trip_routes, trips,
};

use super::super::Engine;
use super::fuel_needed_milli;

pub(crate) const TRIP_INCOME_CATEGORY: &str = "Trip Income";
pub(crate) const TRIP_EXPENSE_CATEGORY: &str = "Trip Expense";

/// Lorry-receipt number, deterministic per trip and route.
pub(crate) fn lr_no(trip_id: &str, route_no: i32) -> String {
    format!("LR-{trip_id}-{route_no}")
}

impl Engine {
    /// Steps run for every completed route. Each is guarded by its natural
    /// key (LR number, route income, route expense) so repeating the pass
    /// after a partial completion settles only the new routes.
    pub(in crate::ops) async fn settle_completed_routes(
        &self,
        db_tx: &DatabaseTransaction,
        trip: &trips::Model,
        routes: &[trip_routes::Model],
    ) -> ResultEngine<()> {
        for route in routes {
            if route.status != RouteStatus::Completed.as_str() {
                continue;
            }
            self.upsert_route_invoice(db_tx, trip, route).await?;
            self.record_route_income(db_tx, trip, route).await?;
            self.record_route_expense(db_tx, trip, route).await?;
        }
        Ok(())
    }

    async fn upsert_route_invoice(
        &self,
        db_tx: &DatabaseTransaction,
        trip: &trips::Model,
        route: &trip_routes::Model,
    ) -> ResultEngine<()> {
        let lr = lr_no(&trip.id, route.route_no);
        let existing = invoices::Entity::find()
            .filter(invoices::Column::LrNo.eq(lr.clone()))
            .one(db_tx)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let status = if route.advance_minor >= route.amount_minor {
            InvoiceStatus::Paid
        } else if route.advance_minor > 0 {
            InvoiceStatus::Pending
        } else {
            InvoiceStatus::Unpaid
        };
        let invoice_id = Uuid::new_v4().to_string();
        let invoice = invoices::ActiveModel {
            id: ActiveValue::Set(invoice_id.clone()),
            lr_no: ActiveValue::Set(lr),
            customer_id: ActiveValue::Set(route.customer_id.clone()),
            trip_id: ActiveValue::Set(Some(trip.id.clone())),
            route_id: ActiveValue::Set(Some(route.id.clone())),
            tax_permille: ActiveValue::Set(0),
            tax_amount_minor: ActiveValue::Set(0),
            total_minor: ActiveValue::Set(route.amount_minor),
            advance_minor: ActiveValue::Set(route.advance_minor),
            remaining_minor: ActiveValue::Set(
                (route.amount_minor - route.advance_minor).max(0),
            ),
            status: ActiveValue::Set(status.as_str().to_string()),
            occurred_at: ActiveValue::Set(trip.created_at),
        };
        invoice.insert(db_tx).await?;

        let row = invoice_rows::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            invoice_id: ActiveValue::Set(invoice_id),
            description: ActiveValue::Set(format!("Freight, route {}", route.route_no)),
            amount_minor: ActiveValue::Set(route.amount_minor),
        };
        row.insert(db_tx).await?;
        Ok(())
    }

    /// Credit the route's bank with the realized amount: the advance when
    /// the customer part-paid, the full amount otherwise. Two transaction
    /// rows are written, the mechanical posting against the income entry
    /// and a trip-keyed one so the trip's ledger trail is self-contained.
    async fn record_route_income(
        &self,
        db_tx: &DatabaseTransaction,
        trip: &trips::Model,
        route: &trip_routes::Model,
    ) -> ResultEngine<()> {
        let existing = incomes::Entity::find()
            .filter(incomes::Column::RouteId.eq(route.id.clone()))
            .one(db_tx)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let amount_minor = if route.advance_minor > 0 && route.advance_minor < route.amount_minor {
            route.advance_minor
        } else {
            route.amount_minor
        };

        let income_id = Uuid::new_v4().to_string();
        let income = incomes::ActiveModel {
            id: ActiveValue::Set(income_id.clone()),
            bank_id: ActiveValue::Set(Some(route.bank_id.clone())),
            amount_minor: ActiveValue::Set(amount_minor),
            category: ActiveValue::Set(TRIP_INCOME_CATEGORY.to_string()),
            note: ActiveValue::Set(Some(lr_no(&trip.id, route.route_no))),
            trip_id: ActiveValue::Set(Some(trip.id.clone())),
            route_id: ActiveValue::Set(Some(route.id.clone())),
            transaction_id: ActiveValue::Set(None),
            occurred_at: ActiveValue::Set(trip.created_at),
            created_by: ActiveValue::Set(trip.created_by.clone()),
        };
        income.insert(db_tx).await?;

        let tx_id = self
            .post(
                db_tx,
                &route.bank_id,
                amount_minor,
                TransactionKind::Income,
                &income_id,
                RelatedKind::Income,
                trip.created_at,
                &trip.created_by,
            )
            .await?;
        let link = incomes::ActiveModel {
            id: ActiveValue::Set(income_id),
            transaction_id: ActiveValue::Set(Some(tx_id)),
            ..Default::default()
        };
        link.update(db_tx).await?;

        // Trip-keyed mirror row; carries no balance change of its own.
        let bank = self.require_bank(db_tx, &route.bank_id).await?;
        let mirror = Transaction {
            id: Uuid::new_v4(),
            kind: TransactionKind::TripIncome,
            amount_minor,
            from_bank_id: None,
            to_bank_id: Some(route.bank_id.clone()),
            related_id: trip.id.clone(),
            related_kind: RelatedKind::Trip,
            balance_after_minor: bank.balance_minor,
            occurred_at: trip.created_at,
            created_by: trip.created_by.clone(),
        };
        transactions::ActiveModel::from(&mirror).insert(db_tx).await?;
        Ok(())
    }

    /// Route running costs land in the cashbook without moving a bank;
    /// they were spent from the driver's budget pool.
    async fn record_route_expense(
        &self,
        db_tx: &DatabaseTransaction,
        trip: &trips::Model,
        route: &trip_routes::Model,
    ) -> ResultEngine<()> {
        if route.expenses_minor == 0 {
            return Ok(());
        }
        let existing = crate::expenses::Entity::find()
            .filter(crate::expenses::Column::RouteId.eq(route.id.clone()))
            .one(db_tx)
            .await?;
        if existing.is_some() {
            return Ok(());
        }
        let expense = crate::expenses::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            bank_id: ActiveValue::Set(None),
            amount_minor: ActiveValue::Set(route.expenses_minor),
            category: ActiveValue::Set(TRIP_EXPENSE_CATEGORY.to_string()),
            note: ActiveValue::Set(Some(lr_no(&trip.id, route.route_no))),
            trip_id: ActiveValue::Set(Some(trip.id.clone())),
            route_id: ActiveValue::Set(Some(route.id.clone())),
            maintenance_id: ActiveValue::Set(None),
            transaction_id: ActiveValue::Set(None),
            occurred_at: ActiveValue::Set(trip.created_at),
            created_by: ActiveValue::Set(trip.created_by.clone()),
        };
        expense.insert(db_tx).await?;
        Ok(())
    }

    /// Undo the settlement fan-out: reverse the bank credits, then drop
    /// every row the trip spawned.
    pub(in crate::ops) async fn unsettle_trip(
        &self,
        db_tx: &DatabaseTransaction,
        trip: &trips::Model,
    ) -> ResultEngine<()> {
        let trip_incomes = incomes::Entity::find()
            .filter(incomes::Column::TripId.eq(trip.id.clone()))
            .all(db_tx)
            .await?;
        for income in trip_incomes {
            if let Some(tx_id) = income.transaction_id.as_deref() {
                self.reverse_posting(db_tx, tx_id).await?;
            }
            income.delete(db_tx).await?;
        }

        // Mirror rows never moved a balance, so they are dropped directly.
        transactions::Entity::delete_many()
            .filter(transactions::Column::Kind.eq(TransactionKind::TripIncome.as_str()))
            .filter(transactions::Column::RelatedId.eq(trip.id.clone()))
            .exec(db_tx)
            .await?;

        let trip_expenses = crate::expenses::Entity::find()
            .filter(crate::expenses::Column::TripId.eq(trip.id.clone()))
            .all(db_tx)
            .await?;
        for expense in trip_expenses {
            if let Some(tx_id) = expense.transaction_id.as_deref() {
                self.reverse_posting(db_tx, tx_id).await?;
            }
            expense.delete(db_tx).await?;
        }

        let trip_invoices = invoices::Entity::find()
            .filter(invoices::Column::TripId.eq(trip.id.clone()))
            .all(db_tx)
            .await?;
        for invoice in trip_invoices {
            invoice_rows::Entity::delete_many()
                .filter(invoice_rows::Column::InvoiceId.eq(invoice.id.clone()))
                .exec(db_tx)
                .await?;
            invoice.delete(db_tx).await?;
        }
        Ok(())
    }

    /// Take the trip's diesel out of the fuel ledger. No-op when the trip
    /// already holds a draw, so transitions cannot double-draw.
    pub(in crate::ops) async fn draw_trip_fuel(
        &self,
        db_tx: &DatabaseTransaction,
        trip: trips::Model,
    ) -> ResultEngine<trips::Model> {
        if trip.fuel_used_milli > 0 {
            return Ok(trip);
        }
        let log = fuel_logs::Entity::find_by_id(trip.fuel_log_id.clone())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("fuel log {}", trip.fuel_log_id)))?;
        let needed_milli = fuel_needed_milli(trip.end_km - trip.start_km, log.average_milli)?;

        let mut log_model: fuel_logs::ActiveModel = log.clone().into();
        log_model.remaining_milli = ActiveValue::Set(log.remaining_milli - needed_milli);
        log_model.update(db_tx).await?;

        let mut trip_model: trips::ActiveModel = trip.into();
        trip_model.fuel_used_milli = ActiveValue::Set(needed_milli);
        Ok(trip_model.update(db_tx).await?)
    }

    /// Put the drawn diesel back. Guarded by `fuel_used_milli` so a delete
    /// after an un-complete cannot restore twice.
    pub(in crate::ops) async fn restore_trip_fuel(
        &self,
        db_tx: &DatabaseTransaction,
        trip: trips::Model,
    ) -> ResultEngine<trips::Model> {
        if trip.fuel_used_milli == 0 {
            return Ok(trip);
        }
        if let Some(log) = fuel_logs::Entity::find_by_id(trip.fuel_log_id.clone())
            .one(db_tx)
            .await?
        {
            let mut log_model: fuel_logs::ActiveModel = log.clone().into();
            log_model.remaining_milli =
                ActiveValue::Set(log.remaining_milli + trip.fuel_used_milli);
            log_model.update(db_tx).await?;
        }
        let mut trip_model: trips::ActiveModel = trip.into();
        trip_model.fuel_used_milli = ActiveValue::Set(0);
        Ok(trip_model.update(db_tx).await?)
    }

    /// One attendance row per trip day, `(driver, date)` unique.
    pub(in crate::ops) async fn upsert_trip_attendance(
        &self,
        db_tx: &DatabaseTransaction,
        trip: &trips::Model,
    ) -> ResultEngine<()> {
        for date in trip.start_date.iter_days() {
            if date > trip.end_date {
                break;
            }
            let existing = attendance::Entity::find()
                .filter(attendance::Column::DriverId.eq(trip.driver_id.clone()))
                .filter(attendance::Column::Date.eq(date))
                .one(db_tx)
                .await?;
            match existing {
                Some(row) => {
                    let mut model: attendance::ActiveModel = row.into();
                    model.status =
                        ActiveValue::Set(AttendanceStatus::OnTrip.as_str().to_string());
                    model.trip_id = ActiveValue::Set(Some(trip.id.clone()));
                    model.update(db_tx).await?;
                }
                None => {
                    let model = attendance::ActiveModel {
                        id: ActiveValue::Set(Uuid::new_v4().to_string()),
                        driver_id: ActiveValue::Set(trip.driver_id.clone()),
                        date: ActiveValue::Set(date),
                        status: ActiveValue::Set(
                            AttendanceStatus::OnTrip.as_str().to_string(),
                        ),
                        trip_id: ActiveValue::Set(Some(trip.id.clone())),
                    };
                    model.insert(db_tx).await?;
                }
            }
        }
        Ok(())
    }

    pub(in crate::ops) async fn remove_trip_attendance(
        &self,
        db_tx: &DatabaseTransaction,
        trip_id: &str,
    ) -> ResultEngine<()> {
        attendance::Entity::delete_many()
            .filter(attendance::Column::TripId.eq(trip_id.to_string()))
            .exec(db_tx)
            .await?;
        Ok(())
    }
}
