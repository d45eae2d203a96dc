//! Request/response types shared by the fleetledger server and its clients.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod bank {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankNew {
        pub name: String,
        /// Human-facing account number, unique across banks.
        pub account_no: String,
        pub opening_balance_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankUpdate {
        pub name: Option<String>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankView {
        pub id: String,
        pub name: String,
        pub account_no: String,
        pub balance_minor: i64,
        pub owner: String,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankCreated {
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_bank_id: String,
        pub to_bank_id: String,
        pub amount_minor: i64,
        pub occurred_at: Option<DateTime<Utc>>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
        Transfer,
        Fuel,
        DriverBudget,
        Maintenance,
        TripIncome,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub bank_id: Option<String>,
        pub kind: Option<TransactionKind>,
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
        pub offset: Option<u64>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: String,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub from_bank_id: Option<String>,
        pub to_bank_id: Option<String>,
        pub related_id: String,
        pub related_kind: String,
        pub balance_after_minor: i64,
        pub occurred_at: DateTime<Utc>,
        pub created_by: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: String,
    }
}

pub mod cashbook {
    use super::*;

    /// Body for both income and expense creation; the route decides the side.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryNew {
        pub bank_id: String,
        pub amount_minor: i64,
        pub category: String,
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryUpdate {
        pub amount_minor: Option<i64>,
        pub category: Option<String>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryView {
        pub id: String,
        pub bank_id: Option<String>,
        pub amount_minor: i64,
        pub category: String,
        pub note: Option<String>,
        pub trip_id: Option<String>,
        pub transaction_id: Option<String>,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryCreated {
        pub id: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EntryList {
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
    }
}

pub mod fleet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleNew {
        pub name: String,
        pub registration_no: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VehicleView {
        pub id: String,
        pub name: String,
        pub registration_no: String,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverNew {
        pub name: String,
        pub phone: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DriverView {
        pub id: String,
        pub name: String,
        pub phone: Option<String>,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        pub contact: Option<String>,
        pub gst_no: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        pub id: String,
        pub name: String,
        pub contact: Option<String>,
        pub gst_no: Option<String>,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Created {
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ActiveUpdate {
        pub name: Option<String>,
        pub active: Option<bool>,
    }
}

pub mod fuel {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FillUpNew {
        pub vehicle_id: String,
        pub bank_id: String,
        pub start_km: i64,
        pub end_km: i64,
        /// Purchased fuel in millilitres.
        pub quantity_milli: i64,
        /// Price per litre in minor units.
        pub rate_minor: i64,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FillUpView {
        pub id: String,
        pub vehicle_id: String,
        pub bank_id: String,
        pub start_km: i64,
        pub end_km: i64,
        pub quantity_milli: i64,
        pub carried_milli: i64,
        pub remaining_milli: i64,
        pub rate_minor: i64,
        pub total_amount_minor: i64,
        /// Mileage over purchased + carried fuel, km/L scaled by 1000.
        pub average_milli: i64,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FillUpCreated {
        pub id: String,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub driver_id: String,
        pub bank_id: String,
        /// Freshly allocated amount; carry-forward is added by the server.
        pub amount_minor: i64,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: String,
        pub driver_id: String,
        pub bank_id: String,
        pub allocated_minor: i64,
        pub daily_budget_minor: i64,
        pub remaining_minor: i64,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreated {
        pub id: String,
    }
}

pub mod maintenance {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MaintenanceStatus {
        Pending,
        Due,
        Overdue,
        Completed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleNew {
        pub vehicle_id: String,
        pub category: String,
        /// Cost charged to a bank when the service is accepted.
        pub amount_minor: i64,
        pub start_km: i64,
        pub target_km: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleView {
        pub id: String,
        pub vehicle_id: String,
        pub category: String,
        pub amount_minor: i64,
        pub start_km: i64,
        pub target_km: i64,
        pub total_km: i64,
        pub status: MaintenanceStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduleCreated {
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AcceptBody {
        pub bank_id: String,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SweepSummary {
        pub checked: u64,
        pub due: u64,
        pub overdue: u64,
        pub alerts_opened: u64,
    }
}

pub mod trip {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TripStatus {
        Draft,
        InProgress,
        Completed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RouteStatus {
        Pending,
        Completed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RouteExpenseNew {
        pub description: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RouteNew {
        pub customer_id: String,
        pub bank_id: String,
        /// Rate per tonne in minor units.
        pub rate_minor: i64,
        /// Load in milli-tonnes.
        pub weight_milli: i64,
        /// Overrides `rate * weight` when supplied.
        pub amount_minor: Option<i64>,
        pub advance_minor: Option<i64>,
        pub status: Option<RouteStatus>,
        pub expenses: Option<Vec<RouteExpenseNew>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub vehicle_id: String,
        pub driver_id: String,
        pub start_km: i64,
        pub end_km: i64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub routes: Vec<RouteNew>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RouteStatusUpdate {
        pub route_no: i32,
        pub status: RouteStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripUpdate {
        pub status: Option<TripStatus>,
        pub end_km: Option<i64>,
        pub route_statuses: Option<Vec<RouteStatusUpdate>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RouteView {
        pub id: String,
        pub route_no: i32,
        pub customer_id: String,
        pub bank_id: String,
        pub rate_minor: i64,
        pub weight_milli: i64,
        pub amount_minor: i64,
        pub advance_minor: i64,
        pub expenses_minor: i64,
        pub status: RouteStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: String,
        pub vehicle_id: String,
        pub driver_id: String,
        pub start_km: i64,
        pub end_km: i64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub status: TripStatus,
        pub route_cost_minor: i64,
        pub expenses_minor: i64,
        pub diesel_cost_minor: i64,
        pub remaining_minor: i64,
        pub fuel_used_milli: i64,
        pub routes: Vec<RouteView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripCreated {
        pub id: String,
    }
}

pub mod invoice {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvoiceStatus {
        Paid,
        Unpaid,
        Pending,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceRowNew {
        pub description: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceNew {
        /// Lorry-receipt number, unique across invoices.
        pub lr_no: String,
        pub customer_id: String,
        pub rows: Vec<InvoiceRowNew>,
        /// Tax in permille of the row total (e.g. 50 = 5%).
        pub tax_permille: Option<i64>,
        pub advance_minor: Option<i64>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceUpdate {
        pub status: Option<InvoiceStatus>,
        pub advance_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceRowView {
        pub description: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceView {
        pub id: String,
        pub lr_no: String,
        pub customer_id: String,
        pub trip_id: Option<String>,
        pub rows: Vec<InvoiceRowView>,
        pub tax_permille: i64,
        pub tax_amount_minor: i64,
        pub total_minor: i64,
        pub advance_minor: i64,
        pub remaining_minor: i64,
        pub status: InvoiceStatus,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceCreated {
        pub id: String,
    }
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportQuery {
        pub module: String,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub format: Option<String>,
    }
}
