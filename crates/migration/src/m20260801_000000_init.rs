//! Initial schema - creates every table from scratch.
//!
//! - `users`: authentication
//! - `banks`: accounts holding the money
//! - `transactions`: append-only ledger of balance changes
//! - `incomes` / `expenses`: cashbook entries
//! - `vehicles` / `drivers` / `customers`: the fleet registry
//! - `fuel_logs`: fill-ups with the carry-forward chain
//! - `driver_budgets`: daily allocations with carry-forward
//! - `maintenance_schedules`: km accumulators per vehicle service
//! - `trips` / `trip_routes`: trips and their per-customer legs
//! - `invoices` / `invoice_rows`: billing
//! - `attendance`: one row per driver per day

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Banks {
    Table,
    Id,
    Name,
    AccountNo,
    BalanceMinor,
    Owner,
    Active,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    Kind,
    AmountMinor,
    FromBankId,
    ToBankId,
    RelatedId,
    RelatedKind,
    BalanceAfterMinor,
    OccurredAt,
    CreatedBy,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    BankId,
    AmountMinor,
    Category,
    Note,
    TripId,
    RouteId,
    TransactionId,
    OccurredAt,
    CreatedBy,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    BankId,
    AmountMinor,
    Category,
    Note,
    TripId,
    RouteId,
    MaintenanceId,
    TransactionId,
    OccurredAt,
    CreatedBy,
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
    Name,
    RegistrationNo,
    Active,
}

#[derive(Iden)]
enum Drivers {
    Table,
    Id,
    Name,
    Phone,
    Active,
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    Name,
    Contact,
    GstNo,
    Active,
}

#[derive(Iden)]
enum FuelLogs {
    Table,
    Id,
    VehicleId,
    BankId,
    StartKm,
    EndKm,
    QuantityMilli,
    CarriedMilli,
    RemainingMilli,
    RateMinor,
    TotalAmountMinor,
    AverageMilli,
    CarriedFromId,
    TransactionId,
    OccurredAt,
    CreatedBy,
}

#[derive(Iden)]
enum DriverBudgets {
    Table,
    Id,
    DriverId,
    BankId,
    AllocatedMinor,
    DailyBudgetMinor,
    RemainingMinor,
    CarriedFromId,
    TransactionId,
    ExpenseId,
    OccurredAt,
    CreatedBy,
}

#[derive(Iden)]
enum MaintenanceSchedules {
    Table,
    Id,
    VehicleId,
    Category,
    AmountMinor,
    StartKm,
    TargetKm,
    EndKm,
    TotalKm,
    Status,
    ExpenseId,
    TransactionId,
    CreatedAt,
}

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    VehicleId,
    DriverId,
    StartKm,
    EndKm,
    StartDate,
    EndDate,
    Status,
    RouteCostMinor,
    ExpensesMinor,
    DieselCostMinor,
    RemainingMinor,
    FuelUsedMilli,
    FuelLogId,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum TripRoutes {
    Table,
    Id,
    TripId,
    RouteNo,
    CustomerId,
    BankId,
    RateMinor,
    WeightMilli,
    AmountMinor,
    AdvanceMinor,
    ExpensesMinor,
    Status,
}

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    LrNo,
    CustomerId,
    TripId,
    RouteId,
    TaxPermille,
    TaxAmountMinor,
    TotalMinor,
    AdvanceMinor,
    RemainingMinor,
    Status,
    OccurredAt,
}

#[derive(Iden)]
enum InvoiceRows {
    Table,
    Id,
    InvoiceId,
    Description,
    AmountMinor,
}

#[derive(Iden)]
enum Attendance {
    Table,
    Id,
    DriverId,
    Date,
    Status,
    TripId,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Banks
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Banks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Banks::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Banks::Name).string().not_null())
                    .col(ColumnDef::new(Banks::AccountNo).string().not_null())
                    .col(ColumnDef::new(Banks::BalanceMinor).big_integer().not_null())
                    .col(ColumnDef::new(Banks::Owner).string().not_null())
                    .col(ColumnDef::new(Banks::Active).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-banks-owner")
                            .from(Banks::Table, Banks::Owner)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-banks-account_no-unique")
                    .table(Banks::Table)
                    .col(Banks::AccountNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::FromBankId).string())
                    .col(ColumnDef::new(Transactions::ToBankId).string())
                    .col(ColumnDef::new(Transactions::RelatedId).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::RelatedKind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::BalanceAfterMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::CreatedBy).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-occurred_at")
                    .table(Transactions::Table)
                    .col(Transactions::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-related")
                    .table(Transactions::Table)
                    .col(Transactions::RelatedKind)
                    .col(Transactions::RelatedId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::BankId).string())
                    .col(
                        ColumnDef::new(Incomes::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::Category).string().not_null())
                    .col(ColumnDef::new(Incomes::Note).string())
                    .col(ColumnDef::new(Incomes::TripId).string())
                    .col(ColumnDef::new(Incomes::RouteId).string())
                    .col(ColumnDef::new(Incomes::TransactionId).string())
                    .col(ColumnDef::new(Incomes::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(Incomes::CreatedBy).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-occurred_at")
                    .table(Incomes::Table)
                    .col(Incomes::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::BankId).string())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::Note).string())
                    .col(ColumnDef::new(Expenses::TripId).string())
                    .col(ColumnDef::new(Expenses::RouteId).string())
                    .col(ColumnDef::new(Expenses::MaintenanceId).string())
                    .col(ColumnDef::new(Expenses::TransactionId).string())
                    .col(ColumnDef::new(Expenses::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(Expenses::CreatedBy).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-occurred_at")
                    .table(Expenses::Table)
                    .col(Expenses::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Fleet registry
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Name).string().not_null())
                    .col(
                        ColumnDef::new(Vehicles::RegistrationNo)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Vehicles::Active).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vehicles-registration_no-unique")
                    .table(Vehicles::Table)
                    .col(Vehicles::RegistrationNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Drivers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Drivers::Name).string().not_null())
                    .col(ColumnDef::new(Drivers::Phone).string())
                    .col(ColumnDef::new(Drivers::Active).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Contact).string())
                    .col(ColumnDef::new(Customers::GstNo).string())
                    .col(ColumnDef::new(Customers::Active).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Fuel logs
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FuelLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FuelLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FuelLogs::VehicleId).string().not_null())
                    .col(ColumnDef::new(FuelLogs::BankId).string().not_null())
                    .col(ColumnDef::new(FuelLogs::StartKm).big_integer().not_null())
                    .col(ColumnDef::new(FuelLogs::EndKm).big_integer().not_null())
                    .col(
                        ColumnDef::new(FuelLogs::QuantityMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FuelLogs::CarriedMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FuelLogs::RemainingMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FuelLogs::RateMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(FuelLogs::TotalAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FuelLogs::AverageMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FuelLogs::CarriedFromId).string())
                    .col(ColumnDef::new(FuelLogs::TransactionId).string())
                    .col(ColumnDef::new(FuelLogs::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(FuelLogs::CreatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fuel_logs-vehicle_id")
                            .from(FuelLogs::Table, FuelLogs::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fuel_logs-vehicle_id-occurred_at")
                    .table(FuelLogs::Table)
                    .col(FuelLogs::VehicleId)
                    .col(FuelLogs::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Driver budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DriverBudgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DriverBudgets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DriverBudgets::DriverId).string().not_null())
                    .col(ColumnDef::new(DriverBudgets::BankId).string().not_null())
                    .col(
                        ColumnDef::new(DriverBudgets::AllocatedMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverBudgets::DailyBudgetMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverBudgets::RemainingMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DriverBudgets::CarriedFromId).string())
                    .col(ColumnDef::new(DriverBudgets::TransactionId).string())
                    .col(ColumnDef::new(DriverBudgets::ExpenseId).string())
                    .col(
                        ColumnDef::new(DriverBudgets::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DriverBudgets::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-driver_budgets-driver_id")
                            .from(DriverBudgets::Table, DriverBudgets::DriverId)
                            .to(Drivers::Table, Drivers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-driver_budgets-driver_id-occurred_at")
                    .table(DriverBudgets::Table)
                    .col(DriverBudgets::DriverId)
                    .col(DriverBudgets::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Maintenance schedules
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceSchedules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceSchedules::VehicleId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceSchedules::Category)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceSchedules::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceSchedules::StartKm)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceSchedules::TargetKm)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceSchedules::EndKm).big_integer())
                    .col(
                        ColumnDef::new(MaintenanceSchedules::TotalKm)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceSchedules::Status)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceSchedules::ExpenseId).string())
                    .col(ColumnDef::new(MaintenanceSchedules::TransactionId).string())
                    .col(
                        ColumnDef::new(MaintenanceSchedules::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-maintenance_schedules-vehicle_id")
                            .from(
                                MaintenanceSchedules::Table,
                                MaintenanceSchedules::VehicleId,
                            )
                            .to(Vehicles::Table, Vehicles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 10. Trips and routes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::VehicleId).string().not_null())
                    .col(ColumnDef::new(Trips::DriverId).string().not_null())
                    .col(ColumnDef::new(Trips::StartKm).big_integer().not_null())
                    .col(ColumnDef::new(Trips::EndKm).big_integer().not_null())
                    .col(ColumnDef::new(Trips::StartDate).date().not_null())
                    .col(ColumnDef::new(Trips::EndDate).date().not_null())
                    .col(ColumnDef::new(Trips::Status).string().not_null())
                    .col(
                        ColumnDef::new(Trips::RouteCostMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::ExpensesMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::DieselCostMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::RemainingMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::FuelUsedMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trips::FuelLogId).string().not_null())
                    .col(ColumnDef::new(Trips::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Trips::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-vehicle_id")
                            .from(Trips::Table, Trips::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-driver_id")
                            .from(Trips::Table, Trips::DriverId)
                            .to(Drivers::Table, Drivers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripRoutes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TripRoutes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TripRoutes::TripId).string().not_null())
                    .col(ColumnDef::new(TripRoutes::RouteNo).integer().not_null())
                    .col(ColumnDef::new(TripRoutes::CustomerId).string().not_null())
                    .col(ColumnDef::new(TripRoutes::BankId).string().not_null())
                    .col(
                        ColumnDef::new(TripRoutes::RateMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TripRoutes::WeightMilli)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TripRoutes::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TripRoutes::AdvanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TripRoutes::ExpensesMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TripRoutes::Status).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_routes-trip_id")
                            .from(TripRoutes::Table, TripRoutes::TripId)
                            .to(Trips::Table, Trips::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trip_routes-trip_id-route_no-unique")
                    .table(TripRoutes::Table)
                    .col(TripRoutes::TripId)
                    .col(TripRoutes::RouteNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 11. Invoices
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::LrNo).string().not_null())
                    .col(ColumnDef::new(Invoices::CustomerId).string().not_null())
                    .col(ColumnDef::new(Invoices::TripId).string())
                    .col(ColumnDef::new(Invoices::RouteId).string())
                    .col(
                        ColumnDef::new(Invoices::TaxPermille)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::TaxAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::TotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::AdvanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::RemainingMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::Status).string().not_null())
                    .col(ColumnDef::new(Invoices::OccurredAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-lr_no-unique")
                    .table(Invoices::Table)
                    .col(Invoices::LrNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvoiceRows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvoiceRows::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvoiceRows::InvoiceId).string().not_null())
                    .col(
                        ColumnDef::new(InvoiceRows::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvoiceRows::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-invoice_rows-invoice_id")
                            .from(InvoiceRows::Table, InvoiceRows::InvoiceId)
                            .to(Invoices::Table, Invoices::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 12. Attendance
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::DriverId).string().not_null())
                    .col(ColumnDef::new(Attendance::Date).date().not_null())
                    .col(ColumnDef::new(Attendance::Status).string().not_null())
                    .col(ColumnDef::new(Attendance::TripId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-attendance-driver_id-date-unique")
                    .table(Attendance::Table)
                    .col(Attendance::DriverId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "attendance",
            "invoice_rows",
            "invoices",
            "trip_routes",
            "trips",
            "maintenance_schedules",
            "driver_budgets",
            "fuel_logs",
            "customers",
            "drivers",
            "vehicles",
            "expenses",
            "incomes",
            "transactions",
            "banks",
            "users",
        ] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
