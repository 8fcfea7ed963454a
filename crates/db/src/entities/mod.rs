//! `SeaORM` entity definitions.

pub mod account_groups;
pub mod accounts;
pub mod articles;
pub mod credit_transfers;
pub mod notifications;
pub mod sea_orm_active_enums;
pub mod transactions;
