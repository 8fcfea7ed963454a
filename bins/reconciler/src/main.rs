//! Strequelistan ledger reconciler.
//!
//! Recomputes every account balance from its unvoided transactions and lists
//! credit transfers whose legs disagree. Exits non-zero when anything drifted.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strequelistan_core::events::NoopEventSink;
use strequelistan_db::{LedgerRepository, connect_with};
use strequelistan_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "strequelistan=info,reconciler=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let ledger = LedgerRepository::new(db, Arc::new(NoopEventSink), config.ledger);

    let reconciliations = ledger.reconcile_all().await?;
    let drifted: Vec<_> = reconciliations
        .iter()
        .filter(|r| !r.is_consistent())
        .collect();
    for r in &drifted {
        error!(
            account_id = %r.account_id,
            stored = %r.stored_balance,
            ledger = %r.ledger_sum,
            drift = %r.drift(),
            "Account balance drifted"
        );
    }

    let desyncs = ledger.find_transfer_desyncs().await?;

    info!(
        accounts = reconciliations.len(),
        drifted = drifted.len(),
        transfer_desyncs = desyncs.len(),
        "Reconciliation finished"
    );

    if drifted.is_empty() && desyncs.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
