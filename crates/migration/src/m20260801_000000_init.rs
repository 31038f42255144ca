//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for Daybook:
//!
//! - `users`: authentication and roles
//! - `services`: the sellable-services catalog
//! - `pc_sessions`: durable mirror of PC session line items
//! - `service_logs`: durable mirror of service sale line items
//! - `expense_logs`: durable mirror of expense line items
//! - `daily_logs`: immutable end-of-day archive documents
//!
//! The live open-day snapshot is a JSON file, not a table; the mirror tables
//! carry one row per line item the snapshot ever held.

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
    Role,
    TelegramId,
}

#[derive(Iden)]
enum Services {
    Table,
    Name,
    Cost,
    Emoji,
    Available,
    CustomCost,
}

#[derive(Iden)]
enum PcSessions {
    Table,
    SessionId,
    Pc,
    Amount,
    Staff,
    Time,
    Notes,
    Period,
    Date,
    Timestamp,
}

#[derive(Iden)]
enum ServiceLogs {
    Table,
    LogId,
    Service,
    Amount,
    Staff,
    Time,
    Period,
    Date,
    Timestamp,
}

#[derive(Iden)]
enum ExpenseLogs {
    Table,
    LogId,
    Name,
    Amount,
    Staff,
    Time,
    Period,
    Date,
    Timestamp,
}

#[derive(Iden)]
enum DailyLogs {
    Table,
    Id,
    Date,
    Document,
    CreatedAt,
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
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("worker"),
                    )
                    .col(ColumnDef::new(Users::TelegramId).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Services catalog
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Services::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Services::Cost).big_integer().not_null())
                    .col(
                        ColumnDef::new(Services::Emoji)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Services::Available)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Services::CustomCost)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. PC sessions mirror
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PcSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PcSessions::SessionId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PcSessions::Pc).string().not_null())
                    .col(ColumnDef::new(PcSessions::Amount).big_integer().not_null())
                    .col(ColumnDef::new(PcSessions::Staff).string().not_null())
                    .col(ColumnDef::new(PcSessions::Time).string().not_null())
                    .col(ColumnDef::new(PcSessions::Notes).string())
                    .col(ColumnDef::new(PcSessions::Period).string())
                    .col(ColumnDef::new(PcSessions::Date).string().not_null())
                    .col(
                        ColumnDef::new(PcSessions::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-pc_sessions-date")
                    .table(PcSessions::Table)
                    .col(PcSessions::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Service logs mirror
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ServiceLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceLogs::LogId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceLogs::Service).string().not_null())
                    .col(ColumnDef::new(ServiceLogs::Amount).big_integer().not_null())
                    .col(ColumnDef::new(ServiceLogs::Staff).string().not_null())
                    .col(ColumnDef::new(ServiceLogs::Time).string().not_null())
                    .col(ColumnDef::new(ServiceLogs::Period).string())
                    .col(ColumnDef::new(ServiceLogs::Date).string().not_null())
                    .col(
                        ColumnDef::new(ServiceLogs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-service_logs-date")
                    .table(ServiceLogs::Table)
                    .col(ServiceLogs::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Expense logs mirror
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenseLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseLogs::LogId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseLogs::Name).string().not_null())
                    .col(ColumnDef::new(ExpenseLogs::Amount).big_integer().not_null())
                    .col(ColumnDef::new(ExpenseLogs::Staff).string().not_null())
                    .col(ColumnDef::new(ExpenseLogs::Time).string().not_null())
                    .col(ColumnDef::new(ExpenseLogs::Period).string())
                    .col(ColumnDef::new(ExpenseLogs::Date).string().not_null())
                    .col(
                        ColumnDef::new(ExpenseLogs::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_logs-date")
                    .table(ExpenseLogs::Table)
                    .col(ExpenseLogs::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Daily archive
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DailyLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyLogs::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DailyLogs::Date).string().not_null())
                    .col(ColumnDef::new(DailyLogs::Document).text().not_null())
                    .col(
                        ColumnDef::new(DailyLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-daily_logs-date")
                    .table(DailyLogs::Table)
                    .col(DailyLogs::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PcSessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
