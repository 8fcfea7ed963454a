//! `SeaORM` active enums and their mapping to the core domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strequelistan_core::bac::BacSex as CoreBacSex;
use strequelistan_core::ledger::TransactionKind as CoreTransactionKind;
use strequelistan_core::notification::NotificationKind as CoreNotificationKind;

/// Discriminator column of the `transaction` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum TransactionKind {
    /// Purchase of an article.
    #[sea_orm(string_value = "streque")]
    Streque,
    /// Manual admin adjustment.
    #[sea_orm(string_value = "admin_transaction")]
    AdminTransaction,
    /// Credit transfer leg.
    #[sea_orm(string_value = "user_transaction")]
    UserTransaction,
}

/// Kind column of the `notification` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum NotificationKind {
    /// Admin deposit or withdrawal.
    #[sea_orm(string_value = "admin_transaction")]
    AdminTransaction,
    /// Streque made by someone else.
    #[sea_orm(string_value = "streque")]
    Streque,
    /// Streque voided by someone else.
    #[sea_orm(string_value = "streque_void")]
    StrequeVoid,
    /// Incoming credit transfer.
    #[sea_orm(string_value = "streque_pay")]
    StrequePay,
}

/// BAC sex column of the `account` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BacSex {
    /// Female.
    #[sea_orm(string_value = "female")]
    Female,
    /// Male.
    #[sea_orm(string_value = "male")]
    Male,
    /// Unknown.
    #[sea_orm(string_value = "unknown")]
    Unknown,
}

impl From<TransactionKind> for CoreTransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Streque => Self::Streque,
            TransactionKind::AdminTransaction => Self::AdminTransaction,
            TransactionKind::UserTransaction => Self::UserTransaction,
        }
    }
}

impl From<CoreTransactionKind> for TransactionKind {
    fn from(kind: CoreTransactionKind) -> Self {
        match kind {
            CoreTransactionKind::Streque => Self::Streque,
            CoreTransactionKind::AdminTransaction => Self::AdminTransaction,
            CoreTransactionKind::UserTransaction => Self::UserTransaction,
        }
    }
}

impl From<NotificationKind> for CoreNotificationKind {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::AdminTransaction => Self::AdminTransaction,
            NotificationKind::Streque => Self::Streque,
            NotificationKind::StrequeVoid => Self::StrequeVoid,
            NotificationKind::StrequePay => Self::StrequePay,
        }
    }
}

impl From<CoreNotificationKind> for NotificationKind {
    fn from(kind: CoreNotificationKind) -> Self {
        match kind {
            CoreNotificationKind::AdminTransaction => Self::AdminTransaction,
            CoreNotificationKind::Streque => Self::Streque,
            CoreNotificationKind::StrequeVoid => Self::StrequeVoid,
            CoreNotificationKind::StrequePay => Self::StrequePay,
        }
    }
}

impl From<BacSex> for CoreBacSex {
    fn from(sex: BacSex) -> Self {
        match sex {
            BacSex::Female => Self::Female,
            BacSex::Male => Self::Male,
            BacSex::Unknown => Self::Unknown,
        }
    }
}

impl From<CoreBacSex> for BacSex {
    fn from(sex: CoreBacSex) -> Self {
        match sex {
            CoreBacSex::Female => Self::Female,
            CoreBacSex::Male => Self::Male,
            CoreBacSex::Unknown => Self::Unknown,
        }
    }
}
