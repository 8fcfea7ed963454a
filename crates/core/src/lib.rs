//! Core ledger logic for Strequelistan.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, balance rules, and calculations live here; the `db` crate
//! wraps them in units of work.
//!
//! # Modules
//!
//! - `ledger` - Transactions, voids, credit transfers and balance rules
//! - `bac` - Blood alcohol concentration estimate from purchase history
//! - `events` - Post-commit events and the sink they are published to
//! - `notification` - Notification texts produced by ledger mutations

pub mod bac;
pub mod events;
pub mod ledger;
pub mod notification;
