//! Shared fixtures for the ledger integration tests.
//!
//! Every test gets its own in-memory SQLite database with the full schema.
//! The pool holds exactly one connection so the database lives as long as
//! the pool does.

#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use strequelistan_core::events::{EventSink, EventSinkError, LedgerEvent, MemoryEventSink};
use strequelistan_db::migration::{Migrator, MigratorTrait};
use strequelistan_db::{
    AccountRepository, ArticleRepository, LedgerRepository,
    repositories::{CreateAccountInput, CreateArticleInput},
};
use strequelistan_shared::LedgerConfig;
use strequelistan_shared::types::{AccountId, ArticleId, Money};
use uuid::Uuid;

pub struct TestLedger {
    pub db: DatabaseConnection,
    pub ledger: LedgerRepository,
    pub events: Arc<MemoryEventSink>,
    pub accounts: AccountRepository,
    pub articles: ArticleRepository,
}

pub async fn setup() -> TestLedger {
    setup_with(LedgerConfig::default()).await
}

/// Sink whose transport is always down.
#[derive(Debug, Default)]
pub struct FailingEventSink;

impl EventSink for FailingEventSink {
    fn publish(&self, _event: &LedgerEvent) -> Result<(), EventSinkError> {
        Err(EventSinkError::Delivery("broker unreachable".to_string()))
    }
}

pub async fn setup_with(config: LedgerConfig) -> TestLedger {
    let events = Arc::new(MemoryEventSink::new());
    build(config, events.clone(), events).await
}

/// Ledger whose events go to `sink`; `events` stays empty.
pub async fn setup_with_sink(sink: Arc<dyn EventSink>) -> TestLedger {
    build(LedgerConfig::default(), sink, Arc::new(MemoryEventSink::new())).await
}

async fn build(
    config: LedgerConfig,
    sink: Arc<dyn EventSink>,
    events: Arc<MemoryEventSink>,
) -> TestLedger {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    TestLedger {
        ledger: LedgerRepository::new(db.clone(), sink, config),
        accounts: AccountRepository::new(db.clone()),
        articles: ArticleRepository::new(db.clone()),
        events,
        db,
    }
}

impl TestLedger {
    pub async fn member(&self, first_name: &str) -> AccountId {
        self.account(first_name, false).await
    }

    pub async fn admin(&self, first_name: &str) -> AccountId {
        self.account(first_name, true).await
    }

    async fn account(&self, first_name: &str, is_admin: bool) -> AccountId {
        let account = self
            .accounts
            .create_account(CreateAccountInput {
                first_name: first_name.to_string(),
                last_name: "Testsson".to_string(),
                nickname: None,
                email: format!("{first_name}-{}@example.com", Uuid::new_v4()),
                is_admin,
                group_id: None,
            })
            .await
            .unwrap();
        AccountId::from_uuid(account.id)
    }

    pub async fn article(&self, name: &str, price: i64, units: Decimal) -> ArticleId {
        self.weighted_article(name, price, units, 0).await
    }

    pub async fn weighted_article(
        &self,
        name: &str,
        price: i64,
        units: Decimal,
        weight: i32,
    ) -> ArticleId {
        let article = self
            .articles
            .create_article(CreateArticleInput {
                name: name.to_string(),
                description: None,
                price: Money::from_minor(price),
                standard_units: units,
                weight,
            })
            .await
            .unwrap();
        ArticleId::from_uuid(article.id)
    }

    pub async fn balance(&self, account_id: AccountId) -> Money {
        self.ledger.balance(account_id).await.unwrap()
    }

    pub async fn assert_consistent(&self, account_id: AccountId) {
        let reconciliation = self.ledger.reconcile_account(account_id).await.unwrap();
        assert!(
            reconciliation.is_consistent(),
            "stored {} != ledger {}",
            reconciliation.stored_balance,
            reconciliation.ledger_sum
        );
    }
}
