//! Tabular report projections over a date range. The server renders these
//! as CSV; the engine only produces headers and stringified rows.

use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine, driver_budgets, fuel_logs, transactions};

use super::Engine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportModule {
    Transactions,
    Incomes,
    Expenses,
    Fuel,
    Budgets,
}

impl TryFrom<&str> for ReportModule {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "transactions" => Ok(Self::Transactions),
            "incomes" => Ok(Self::Incomes),
            "expenses" => Ok(Self::Expenses),
            "fuel" => Ok(Self::Fuel),
            "budgets" => Ok(Self::Budgets),
            other => Err(EngineError::Validation(format!(
                "invalid report module: {other}"
            ))),
        }
    }
}

pub struct ReportTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

fn litres(milli: i64) -> String {
    format!("{}.{:03}", milli / 1000, (milli % 1000).abs())
}

impl Engine {
    pub async fn report(
        &self,
        module: ReportModule,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<ReportTable> {
        match module {
            ReportModule::Transactions => self.transactions_report(from, to).await,
            ReportModule::Incomes => self.incomes_report(from, to).await,
            ReportModule::Expenses => self.expenses_report(from, to).await,
            ReportModule::Fuel => self.fuel_report(from, to).await,
            ReportModule::Budgets => self.budgets_report(from, to).await,
        }
    }

    async fn transactions_report(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<ReportTable> {
        let mut query = transactions::Entity::find()
            .order_by_asc(transactions::Column::OccurredAt)
            .order_by_asc(transactions::Column::Id);
        if let Some(from) = from {
            query = query.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(transactions::Column::OccurredAt.lte(to));
        }
        let rows = query
            .all(&self.database)
            .await?
            .into_iter()
            .map(|tx| {
                vec![
                    tx.occurred_at.to_rfc3339(),
                    tx.kind,
                    MoneyCents::new(tx.amount_minor).to_string(),
                    tx.from_bank_id.unwrap_or_default(),
                    tx.to_bank_id.unwrap_or_default(),
                    tx.related_kind,
                    tx.related_id,
                    MoneyCents::new(tx.balance_after_minor).to_string(),
                    tx.created_by,
                ]
            })
            .collect();
        Ok(ReportTable {
            headers: vec![
                "occurred_at",
                "kind",
                "amount",
                "from_bank",
                "to_bank",
                "related_kind",
                "related_id",
                "balance_after",
                "created_by",
            ],
            rows,
        })
    }

    async fn incomes_report(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<ReportTable> {
        let rows = self
            .list_incomes(from, to)
            .await?
            .into_iter()
            .map(|row| {
                vec![
                    row.occurred_at.to_rfc3339(),
                    row.category,
                    MoneyCents::new(row.amount_minor).to_string(),
                    row.bank_id.unwrap_or_default(),
                    row.trip_id.unwrap_or_default(),
                    row.note.unwrap_or_default(),
                ]
            })
            .collect();
        Ok(ReportTable {
            headers: vec!["occurred_at", "category", "amount", "bank", "trip", "note"],
            rows,
        })
    }

    async fn expenses_report(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<ReportTable> {
        let rows = self
            .list_expenses(from, to)
            .await?
            .into_iter()
            .map(|row| {
                vec![
                    row.occurred_at.to_rfc3339(),
                    row.category,
                    MoneyCents::new(row.amount_minor).to_string(),
                    row.bank_id.unwrap_or_default(),
                    row.trip_id.unwrap_or_default(),
                    row.maintenance_id.unwrap_or_default(),
                    row.note.unwrap_or_default(),
                ]
            })
            .collect();
        Ok(ReportTable {
            headers: vec![
                "occurred_at",
                "category",
                "amount",
                "bank",
                "trip",
                "maintenance",
                "note",
            ],
            rows,
        })
    }

    async fn fuel_report(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<ReportTable> {
        let mut query = fuel_logs::Entity::find().order_by_asc(fuel_logs::Column::OccurredAt);
        if let Some(from) = from {
            query = query.filter(fuel_logs::Column::OccurredAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(fuel_logs::Column::OccurredAt.lte(to));
        }
        let rows = query
            .all(&self.database)
            .await?
            .into_iter()
            .map(|log| {
                vec![
                    log.occurred_at.to_rfc3339(),
                    log.vehicle_id,
                    log.start_km.to_string(),
                    log.end_km.to_string(),
                    litres(log.quantity_milli),
                    litres(log.carried_milli),
                    litres(log.remaining_milli),
                    MoneyCents::new(log.rate_minor).to_string(),
                    MoneyCents::new(log.total_amount_minor).to_string(),
                    format!("{}.{:03}", log.average_milli / 1000, log.average_milli % 1000),
                ]
            })
            .collect();
        Ok(ReportTable {
            headers: vec![
                "occurred_at",
                "vehicle",
                "start_km",
                "end_km",
                "quantity_l",
                "carried_l",
                "remaining_l",
                "rate",
                "total",
                "mileage_kmpl",
            ],
            rows,
        })
    }

    async fn budgets_report(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ResultEngine<ReportTable> {
        let mut query =
            driver_budgets::Entity::find().order_by_asc(driver_budgets::Column::OccurredAt);
        if let Some(from) = from {
            query = query.filter(driver_budgets::Column::OccurredAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(driver_budgets::Column::OccurredAt.lte(to));
        }
        let rows = query
            .all(&self.database)
            .await?
            .into_iter()
            .map(|row| {
                vec![
                    row.occurred_at.to_rfc3339(),
                    row.driver_id,
                    MoneyCents::new(row.allocated_minor).to_string(),
                    MoneyCents::new(row.daily_budget_minor).to_string(),
                    MoneyCents::new(row.remaining_minor).to_string(),
                    row.bank_id,
                ]
            })
            .collect();
        Ok(ReportTable {
            headers: vec![
                "occurred_at",
                "driver",
                "allocated",
                "daily_budget",
                "remaining",
                "bank",
            ],
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::litres;

    #[test]
    fn litre_formatting() {
        assert_eq!(litres(10_000), "10.000");
        assert_eq!(litres(6_500), "6.500");
        assert_eq!(litres(42), "0.042");
    }
}
