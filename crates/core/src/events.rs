//! Post-commit ledger events.
//!
//! Events are published after the unit of work has committed. Publishing is
//! best-effort: a failing sink never undoes a committed mutation, so callers
//! log the error and move on.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use strequelistan_shared::types::{AccountId, Money, NotificationId};
use thiserror::Error;

use crate::ledger::BalanceChange;
use crate::notification::NotificationKind;

/// An event emitted once per committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// An account balance changed.
    BalanceChanged {
        /// The account.
        account_id: AccountId,
        /// Balance before the mutation.
        old_balance: Money,
        /// Balance after the mutation.
        new_balance: Money,
    },
    /// A notification was stored for an account.
    NotificationCreated {
        /// Recipient.
        account_id: AccountId,
        /// The stored notification.
        notification_id: NotificationId,
        /// Display text.
        text: String,
        /// Kind.
        kind: NotificationKind,
        /// Referenced transaction or transfer id.
        reference: String,
    },
}

impl LedgerEvent {
    /// Returns the account the event concerns.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        match self {
            Self::BalanceChanged { account_id, .. } | Self::NotificationCreated { account_id, .. } => {
                *account_id
            }
        }
    }

    /// Serializes the event to a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `EventSinkError::Encode` if serialization fails.
    pub fn to_payload(&self) -> Result<serde_json::Value, EventSinkError> {
        serde_json::to_value(self).map_err(|e| EventSinkError::Encode(e.to_string()))
    }
}

impl From<BalanceChange> for LedgerEvent {
    fn from(change: BalanceChange) -> Self {
        Self::BalanceChanged {
            account_id: change.account_id,
            old_balance: change.old_balance,
            new_balance: change.new_balance,
        }
    }
}

/// Errors returned by an event sink.
#[derive(Debug, Error)]
pub enum EventSinkError {
    /// The event could not be encoded.
    #[error("Failed to encode event: {0}")]
    Encode(String),

    /// The transport rejected the event.
    #[error("Event delivery failed: {0}")]
    Delivery(String),
}

/// Receiver of post-commit events.
///
/// Implementations must not block on slow consumers.
pub trait EventSink: Send + Sync {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be handed off.
    fn publish(&self, event: &LedgerEvent) -> Result<(), EventSinkError>;
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn publish(&self, _event: &LedgerEvent) -> Result<(), EventSinkError> {
        Ok(())
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<LedgerEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the events received so far.
    pub fn drain(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for MemoryEventSink {
    fn publish(&self, event: &LedgerEvent) -> Result<(), EventSinkError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}
