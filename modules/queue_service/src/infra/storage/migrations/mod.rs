//! Database migrations for the queue service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_tenants::Migration),
            Box::new(m20250601_000002_create_counters::Migration),
            Box::new(m20250601_000003_create_counter_pause_logs::Migration),
            Box::new(m20250601_000004_create_seats::Migration),
            Box::new(m20250601_000005_create_seat_logs::Migration),
            Box::new(m20250601_000006_create_tickets::Migration),
        ]
    }
}

mod m20250601_000001_create_tenants {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tenants::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tenants::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Tenants::Slug)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Tenants::Name).string().not_null())
                        .col(ColumnDef::new(Tenants::Timezone).string().not_null())
                        .col(ColumnDef::new(Tenants::AllowedTimeRanges).json())
                        .col(
                            ColumnDef::new(Tenants::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tenants::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Tenants {
        Table,
        Id,
        Slug,
        Name,
        Timezone,
        AllowedTimeRanges,
        CreatedAt,
    }
}

mod m20250601_000002_create_counters {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Counters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Counters::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Counters::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Counters::Name).string().not_null())
                        .col(
                            ColumnDef::new(Counters::Status)
                                .string_len(16)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_counters_tenant")
                                .from(Counters::Table, Counters::TenantId)
                                .to(
                                    super::m20250601_000001_create_tenants::Tenants::Table,
                                    super::m20250601_000001_create_tenants::Tenants::Id,
                                )
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_counters_tenant")
                        .table(Counters::Table)
                        .col(Counters::TenantId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Counters::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Counters {
        Table,
        Id,
        TenantId,
        Name,
        Status,
    }
}

mod m20250601_000003_create_counter_pause_logs {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CounterPauseLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CounterPauseLogs::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CounterPauseLogs::TenantId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CounterPauseLogs::CounterId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CounterPauseLogs::Reason).text().not_null())
                        .col(
                            ColumnDef::new(CounterPauseLogs::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_counter_pause_logs_counter")
                                .from(CounterPauseLogs::Table, CounterPauseLogs::CounterId)
                                .to(
                                    super::m20250601_000002_create_counters::Counters::Table,
                                    super::m20250601_000002_create_counters::Counters::Id,
                                )
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_counter_pause_logs_counter")
                        .table(CounterPauseLogs::Table)
                        .col(CounterPauseLogs::CounterId)
                        .col(CounterPauseLogs::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CounterPauseLogs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum CounterPauseLogs {
        Table,
        Id,
        TenantId,
        CounterId,
        Reason,
        CreatedAt,
    }
}

mod m20250601_000004_create_seats {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Seats::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Seats::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Seats::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Seats::CounterId).big_integer().not_null())
                        .col(ColumnDef::new(Seats::Name).string().not_null())
                        .col(ColumnDef::new(Seats::Kind).string_len(16).not_null())
                        .col(
                            ColumnDef::new(Seats::Occupied)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Seats::LastEmptyTime).timestamp_with_time_zone())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_seats_counter")
                                .from(Seats::Table, Seats::CounterId)
                                .to(
                                    super::m20250601_000002_create_counters::Counters::Table,
                                    super::m20250601_000002_create_counters::Counters::Id,
                                )
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_seats_counter")
                        .table(Seats::Table)
                        .col(Seats::TenantId)
                        .col(Seats::CounterId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Seats::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Seats {
        Table,
        Id,
        TenantId,
        CounterId,
        Name,
        Kind,
        Occupied,
        LastEmptyTime,
    }
}

mod m20250601_000005_create_seat_logs {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SeatLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SeatLogs::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(SeatLogs::TenantId).uuid().not_null())
                        .col(ColumnDef::new(SeatLogs::SeatId).big_integer().not_null())
                        .col(ColumnDef::new(SeatLogs::OldStatus).boolean().not_null())
                        .col(ColumnDef::new(SeatLogs::NewStatus).boolean().not_null())
                        .col(
                            ColumnDef::new(SeatLogs::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_seat_logs_seat")
                                .from(SeatLogs::Table, SeatLogs::SeatId)
                                .to(
                                    super::m20250601_000004_create_seats::Seats::Table,
                                    super::m20250601_000004_create_seats::Seats::Id,
                                )
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_seat_logs_seat_ts")
                        .table(SeatLogs::Table)
                        .col(SeatLogs::SeatId)
                        .col(SeatLogs::Timestamp)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SeatLogs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SeatLogs {
        Table,
        Id,
        TenantId,
        SeatId,
        OldStatus,
        NewStatus,
        Timestamp,
    }
}

mod m20250601_000006_create_tickets {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tickets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tickets::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Tickets::TenantId).uuid().not_null())
                        .col(ColumnDef::new(Tickets::CounterId).big_integer().not_null())
                        .col(ColumnDef::new(Tickets::Number).integer().not_null())
                        .col(ColumnDef::new(Tickets::Status).string_len(16).not_null())
                        .col(
                            ColumnDef::new(Tickets::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Tickets::CalledAt).timestamp_with_time_zone())
                        .col(ColumnDef::new(Tickets::FinishedAt).timestamp_with_time_zone())
                        .col(ColumnDef::new(Tickets::Rating).small_integer())
                        .col(ColumnDef::new(Tickets::Feedback).text())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tickets_counter")
                                .from(Tickets::Table, Tickets::CounterId)
                                .to(
                                    super::m20250601_000002_create_counters::Counters::Table,
                                    super::m20250601_000002_create_counters::Counters::Id,
                                )
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Waiting-queue scans: status + created_at inside one counter.
            manager
                .create_index(
                    Index::create()
                        .name("idx_tickets_counter_status")
                        .table(Tickets::Table)
                        .col(Tickets::TenantId)
                        .col(Tickets::CounterId)
                        .col(Tickets::Status)
                        .to_owned(),
                )
                .await?;

            // Per-day numbering scans.
            manager
                .create_index(
                    Index::create()
                        .name("idx_tickets_counter_created")
                        .table(Tickets::Table)
                        .col(Tickets::TenantId)
                        .col(Tickets::CounterId)
                        .col(Tickets::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tickets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tickets {
        Table,
        Id,
        TenantId,
        CounterId,
        Number,
        Status,
        CreatedAt,
        CalledAt,
        FinishedAt,
        Rating,
        Feedback,
    }
}
