use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod banks;
mod budgets;
mod cashbook;
mod fleet;
mod fuel;
mod invoices;
mod maintenance;
mod postings;
mod reports;
mod transactions;
mod trips;

pub use banks::{BankCmd, TransferCmd};
pub use budgets::BudgetCmd;
pub use cashbook::{EntryCmd, EntryUpdate};
pub use fleet::{CustomerCmd, DriverCmd, VehicleCmd};
pub use fuel::{FillUpCmd, FillUpUpdate};
pub use invoices::{InvoiceCmd, InvoiceRowCmd, InvoiceUpdate};
pub use maintenance::{ScheduleCmd, SweepSummary};
pub use reports::{ReportModule, ReportTable};
pub use transactions::TransactionListFilter;
pub use trips::{RouteCmd, RouteExpenseCmd, TripCmd, TripUpdateCmd};

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error. Every multi-write operation goes through this so a failing
/// step can never leave a cascade half-applied.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn positive_amount(amount_minor: i64, label: &str) -> ResultEngine<i64> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(amount_minor)
}

fn now_or(occurred_at: Option<DateTime<Utc>>) -> DateTime<Utc> {
    occurred_at.unwrap_or_else(Utc::now)
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
