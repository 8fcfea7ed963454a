//! Shared types, errors, and configuration for Strequelistan.
//!
//! This crate provides common types used across all other crates:
//! - Money type in integer minor units (öre)
//! - Typed IDs for type-safe entity references
//! - Pagination types for history listings
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LedgerConfig};
pub use error::{AppError, AppResult};
