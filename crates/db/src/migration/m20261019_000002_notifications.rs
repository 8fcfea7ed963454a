//! Notification table.

use sea_orm_migration::prelude::*;

use super::m20261019_000001_ledger::Account;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notification::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notification::AccountId).uuid().not_null())
                    .col(ColumnDef::new(Notification::Text).text().not_null())
                    .col(ColumnDef::new(Notification::Kind).string_len(32).not_null())
                    .col(ColumnDef::new(Notification::Reference).string_len(64).not_null())
                    .col(ColumnDef::new(Notification::IsSent).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Notification::IsAcknowledged)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notification::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_account")
                            .from(Notification::Table, Notification::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notification_account_reference")
                    .table(Notification::Table)
                    .col(Notification::AccountId)
                    .col(Notification::Reference)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Notification {
    Table,
    Id,
    AccountId,
    Text,
    Kind,
    Reference,
    IsSent,
    IsAcknowledged,
    Timestamp,
}
