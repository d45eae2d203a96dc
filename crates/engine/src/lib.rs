//! Domain engine for the fleet back office.
//!
//! Entities are sea-orm models, one module each; every mutation lives in
//! [`ops`] behind [`Engine`] and runs inside a single database transaction.

pub use attendance::AttendanceStatus;
pub use banks::Bank;
pub use error::EngineError;
pub use fuel_logs::FuelLog;
pub use invoices::InvoiceStatus;
pub use maintenance::MaintenanceStatus;
pub use money::MoneyCents;
pub use ops::{
    BankCmd, BudgetCmd, CustomerCmd, DriverCmd, Engine, EngineBuilder, EntryCmd, EntryUpdate,
    FillUpCmd, FillUpUpdate, InvoiceCmd, InvoiceRowCmd, InvoiceUpdate, ReportModule, ReportTable,
    RouteCmd, RouteExpenseCmd, ScheduleCmd, SweepSummary, TransactionListFilter, TransferCmd,
    TripCmd, TripUpdateCmd, VehicleCmd,
};
pub use transactions::{RelatedKind, Transaction, TransactionKind};
pub use trip_routes::RouteStatus;
pub use trips::TripStatus;

pub mod attendance;
pub mod banks;
pub mod customers;
pub mod driver_budgets;
pub mod drivers;
mod error;
pub mod expenses;
pub mod fuel_logs;
pub mod incomes;
pub mod invoice_rows;
pub mod invoices;
pub mod maintenance;
pub mod maintenance_alerts;
mod money;
pub mod ops;
pub mod transactions;
pub mod trip_routes;
pub mod trips;
pub mod users;
pub mod vehicles;

pub type ResultEngine<T> = Result<T, EngineError>;
