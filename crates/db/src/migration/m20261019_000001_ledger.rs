//! Ledger schema.
//!
//! Creates the account, group, article, transaction and credit transfer
//! tables. Money columns are BIGINT minor units.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountGroup::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccountGroup::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AccountGroup::Name).string_len(64).not_null())
                    .col(ColumnDef::new(AccountGroup::Weight).integer().not_null().default(0))
                    .col(ColumnDef::new(AccountGroup::Active).boolean().not_null().default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Account::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Account::FirstName).string_len(64).not_null())
                    .col(ColumnDef::new(Account::LastName).string_len(64).not_null())
                    .col(ColumnDef::new(Account::Nickname).string_len(64).null())
                    .col(ColumnDef::new(Account::Email).string_len(254).not_null().unique_key())
                    .col(ColumnDef::new(Account::Balance).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Account::IsAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Account::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Account::BodyMass).integer().null())
                    .col(
                        ColumnDef::new(Account::BacSex)
                            .string_len(16)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(Account::GroupId).uuid().null())
                    .col(
                        ColumnDef::new(Account::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_group")
                            .from(Account::Table, Account::GroupId)
                            .to(AccountGroup::Table, AccountGroup::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Article::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Article::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Article::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Article::Description).text().null())
                    .col(ColumnDef::new(Article::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Article::StandardUnits)
                            .decimal_len(10, 3)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Article::Weight).integer().not_null().default(0))
                    .col(ColumnDef::new(Article::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Article::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transaction::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Transaction::AccountId).uuid().not_null())
                    .col(ColumnDef::new(Transaction::PerformedById).uuid().not_null())
                    .col(ColumnDef::new(Transaction::Kind).string_len(32).not_null())
                    .col(ColumnDef::new(Transaction::Value).big_integer().not_null())
                    .col(ColumnDef::new(Transaction::Label).string_len(255).not_null())
                    .col(ColumnDef::new(Transaction::StandardUnits).decimal_len(10, 3).null())
                    .col(ColumnDef::new(Transaction::Voided).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Transaction::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_account")
                            .from(Transaction::Table, Transaction::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_performed_by")
                            .from(Transaction::Table, Transaction::PerformedById)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transaction_account_timestamp")
                    .table(Transaction::Table)
                    .col(Transaction::AccountId)
                    .col(Transaction::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditTransfer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CreditTransfer::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(CreditTransfer::PayerTransactionId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CreditTransfer::PayeeTransactionId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CreditTransfer::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_transfer_payer")
                            .from(CreditTransfer::Table, CreditTransfer::PayerTransactionId)
                            .to(Transaction::Table, Transaction::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_transfer_payee")
                            .from(CreditTransfer::Table, CreditTransfer::PayeeTransactionId)
                            .to(Transaction::Table, Transaction::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditTransfer::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Article::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountGroup::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AccountGroup {
    Table,
    Id,
    Name,
    Weight,
    Active,
}

#[derive(DeriveIden)]
pub(super) enum Account {
    Table,
    Id,
    FirstName,
    LastName,
    Nickname,
    Email,
    Balance,
    IsAdmin,
    Active,
    BodyMass,
    BacSex,
    GroupId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Article {
    Table,
    Id,
    Name,
    Description,
    Price,
    StandardUnits,
    Weight,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Transaction {
    Table,
    Id,
    AccountId,
    PerformedById,
    Kind,
    Value,
    Label,
    StandardUnits,
    Voided,
    Timestamp,
}

#[derive(DeriveIden)]
enum CreditTransfer {
    Table,
    Id,
    PayerTransactionId,
    PayeeTransactionId,
    CreatedAt,
}
