//! Member ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Transaction kinds and the shared transaction record
//! - Balance rules and reconciliation
//! - Streque self-void rules
//! - Credit transfer legs
//! - Date-range reports
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod report;
pub mod service;
pub mod streque;
pub mod transfer;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{BalanceChange, Reconciliation};
pub use error::LedgerError;
pub use report::StrequeCount;
pub use service::{AdminEntry, LedgerService, DEFAULT_ADMIN_LABEL};
pub use streque::{check_self_void, too_old};
pub use transfer::{TransferDesync, TransferLegs};
pub use types::{
    AccountInfo, AdminVoidOutcome, ArticleInfo, CreditTransfer, NewTransaction, Transaction,
    TransactionKind, TransferVoidOutcome, VoidOutcome,
};
