//! Maintenance alerts split out of the schedule rows: at most one open
//! alert per schedule, closed on accept or decline.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum MaintenanceAlerts {
    Table,
    Id,
    ScheduleId,
    VehicleId,
    TotalKm,
    Open,
    CreatedAt,
}

#[derive(Iden)]
enum MaintenanceSchedules {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaintenanceAlerts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceAlerts::ScheduleId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceAlerts::VehicleId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaintenanceAlerts::TotalKm)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MaintenanceAlerts::Open).boolean().not_null())
                    .col(
                        ColumnDef::new(MaintenanceAlerts::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-maintenance_alerts-schedule_id")
                            .from(MaintenanceAlerts::Table, MaintenanceAlerts::ScheduleId)
                            .to(MaintenanceSchedules::Table, MaintenanceSchedules::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-maintenance_alerts-schedule_id")
                    .table(MaintenanceAlerts::Table)
                    .col(MaintenanceAlerts::ScheduleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceAlerts::Table).to_owned())
            .await
    }
}
