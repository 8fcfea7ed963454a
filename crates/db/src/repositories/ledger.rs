//! Ledger repository: the units of work behind every balance mutation.
//!
//! Each mutation opens one database transaction, applies the balance deltas
//! as in-database increments, writes the transaction rows, and commits.
//! Events and notifications are produced only after the commit; failures
//! there are logged and never undo the mutation.
//!
//! Reads inside a unit of work go through the open transaction, never the
//! pool.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use strequelistan_core::bac::{BacEstimator, LOOKBACK_DAYS};
use strequelistan_core::events::{EventSink, LedgerEvent, NoopEventSink};
use strequelistan_core::ledger::{
    check_self_void, report, transfer, AdminEntry, AdminVoidOutcome, BalanceChange,
    CreditTransfer, LedgerError, LedgerService, NewTransaction, Reconciliation, StrequeCount,
    Transaction, TransactionKind,
    TransferDesync, TransferVoidOutcome, VoidOutcome,
};
use strequelistan_core::notification::{NewNotification, NotificationKind};
use strequelistan_shared::types::{
    AccountId, ArticleId, CreditTransferId, Money, NotificationId, PageRequest, PageResponse,
    TransactionId,
};
use strequelistan_shared::LedgerConfig;

use super::error::RepositoryError;
use super::notification;
use crate::entities::{accounts, articles, credit_transfers, sea_orm_active_enums, transactions};

/// Maximum number of bound ids per `IN (...)` query.
const ID_CHUNK: usize = 500;

/// Ledger repository for every balance-changing operation.
#[derive(Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    events: Arc<dyn EventSink>,
    config: LedgerConfig,
}

impl std::fmt::Debug for LedgerRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerRepository")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, events: Arc<dyn EventSink>, config: LedgerConfig) -> Self {
        Self { db, events, config }
    }

    /// Creates a repository that drops events and uses the default policy.
    #[must_use]
    pub fn with_defaults(db: DatabaseConnection) -> Self {
        Self::new(db, Arc::new(NoopEventSink), LedgerConfig::default())
    }

    /// Returns the ledger policy in use.
    #[must_use]
    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Records a purchase of `article_id` on `account_id`.
    ///
    /// The article price is debited from the account. When someone else made
    /// the purchase the owner is notified.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`/`ArticleNotFound` or a database error.
    pub async fn strequa(
        &self,
        account_id: AccountId,
        article_id: ArticleId,
        performed_by: AccountId,
    ) -> Result<Transaction, RepositoryError> {
        let txn = self.db.begin().await?;

        let article = articles::Entity::find_by_id(article_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(LedgerError::ArticleNotFound(article_id))?;
        let performer = load_account(&txn, performed_by).await?;

        let planned = LedgerService::plan_streque(account_id, &article.info(), performed_by)?;
        let change = apply_delta(&txn, account_id, planned.value).await?;
        let streque = insert_transaction(&txn, planned, Utc::now()).await?;

        txn.commit().await?;

        info!(
            transaction_id = %streque.id,
            account_id = %account_id,
            performed_by = %performed_by,
            value = %streque.value,
            "Streque recorded"
        );
        self.publish(&change.into());

        if performed_by != account_id {
            self.notify(NewNotification::streque(&streque, &performer.info()))
                .await;
        }

        Ok(streque)
    }

    /// Records a manual admin adjustment of either sign.
    ///
    /// # Errors
    ///
    /// Returns `AmountOutOfRange` when the amount could never be voided,
    /// `AccountNotFound`, or a database error.
    pub async fn admin_transaction(
        &self,
        account_id: AccountId,
        amount: Money,
        label: &str,
        performed_by: AccountId,
    ) -> Result<Transaction, RepositoryError> {
        let planned =
            LedgerService::plan_admin_transaction(account_id, amount, label, performed_by)?;

        let txn = self.db.begin().await?;
        load_account(&txn, performed_by).await?;

        let change = apply_delta(&txn, account_id, planned.value).await?;
        let transaction = insert_transaction(&txn, planned, Utc::now()).await?;

        txn.commit().await?;

        info!(
            transaction_id = %transaction.id,
            account_id = %account_id,
            performed_by = %performed_by,
            value = %transaction.value,
            "Admin transaction recorded"
        );
        self.publish(&change.into());

        if self.config.notify_admin_transactions {
            self.notify(NewNotification::admin_transaction(&transaction))
                .await;
        }

        Ok(transaction)
    }

    /// Records several admin transactions in one unit of work.
    ///
    /// Zero amounts are skipped. Either every entry is recorded or none. Bulk
    /// entries never produce notifications.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for the first missing account, or a database
    /// error; nothing is written in either case.
    pub async fn bulk_admin_transactions(
        &self,
        entries: &[AdminEntry],
        performed_by: AccountId,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let planned = LedgerService::plan_bulk_admin_transactions(entries, performed_by)?;
        if planned.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self.db.begin().await?;
        load_account(&txn, performed_by).await?;

        let mut deltas: Vec<(AccountId, Money)> = planned
            .iter()
            .map(|entry| (entry.account_id, entry.value))
            .collect();
        deltas.sort_by_key(|(account_id, _)| *account_id);

        let mut changes = Vec::with_capacity(deltas.len());
        for (account_id, delta) in deltas {
            changes.push(apply_delta(&txn, account_id, delta).await?);
        }

        let now = Utc::now();
        let mut created = Vec::with_capacity(planned.len());
        for entry in planned {
            created.push(insert_transaction(&txn, entry, now).await?);
        }

        txn.commit().await?;

        info!(
            count = created.len(),
            performed_by = %performed_by,
            "Bulk admin transactions recorded"
        );
        for change in changes {
            self.publish(&change.into());
        }

        Ok(created)
    }

    /// Voids a transaction and reverses its effect on the owner's balance.
    ///
    /// Voiding is idempotent: a second call reports `AlreadyVoided` and
    /// changes nothing. This does not look at transfer legs; use
    /// [`Self::void_transaction`] to keep both legs of a transfer together.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or a database error.
    pub async fn void_and_refund(
        &self,
        transaction_id: TransactionId,
    ) -> Result<VoidOutcome, RepositoryError> {
        let txn = self.db.begin().await?;
        let transaction = load_transaction(&txn, transaction_id).await?;
        let outcome = void_in(&txn, &transaction).await?;

        self.finish_void(txn, outcome.balance_change().into_iter().collect())
            .await?;
        if outcome.success() {
            info!(transaction_id = %transaction_id, kind = %transaction.kind, "Transaction voided");
        } else {
            debug!(transaction_id = %transaction_id, "Transaction already voided");
        }

        Ok(outcome)
    }

    /// Moves `amount` from `payer` to `payee` as two linked legs.
    ///
    /// Overdrafts are allowed. The payee is notified.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` before touching the database when `amount` is
    /// not positive, `AccountNotFound`, or a database error.
    pub async fn create_credit_transfer(
        &self,
        payer_id: AccountId,
        payee_id: AccountId,
        initiator: AccountId,
        amount: Money,
        message: &str,
    ) -> Result<CreditTransfer, RepositoryError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount).into());
        }

        let txn = self.db.begin().await?;
        let payer = load_account(&txn, payer_id).await?.info();
        let payee = load_account(&txn, payee_id).await?.info();
        load_account(&txn, initiator).await?;

        let legs = LedgerService::plan_credit_transfer(&payer, &payee, initiator, amount, message)?;

        let mut changes = Vec::with_capacity(2);
        for (account_id, delta) in legs.lock_order() {
            changes.push(apply_delta(&txn, account_id, delta).await?);
        }

        let now = Utc::now();
        let payer_leg = insert_transaction(&txn, legs.payer, now).await?;
        let payee_leg = insert_transaction(&txn, legs.payee, now).await?;
        let transfer: CreditTransfer = credit_transfers::ActiveModel {
            id: Set(CreditTransferId::new().into_inner()),
            payer_transaction_id: Set(payer_leg.id.into_inner()),
            payee_transaction_id: Set(payee_leg.id.into_inner()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?
        .into();

        txn.commit().await?;

        info!(
            transfer_id = %transfer.id,
            payer_id = %payer_id,
            payee_id = %payee_id,
            amount = %amount,
            "Credit transfer recorded"
        );
        for change in changes {
            self.publish(&change.into());
        }

        self.notify(NewNotification::streque_pay(
            transfer.id,
            payee_id,
            amount,
            &payer,
            message,
        ))
        .await;

        Ok(transfer)
    }

    /// Voids both legs of a credit transfer.
    ///
    /// Each leg is idempotent on its own, so a transfer with one leg already
    /// voided is repaired by voiding the other.
    ///
    /// # Errors
    ///
    /// Returns `CreditTransferNotFound`, `TransactionNotFound` for a missing
    /// leg, or a database error.
    pub async fn void_credit_transfer(
        &self,
        transfer_id: CreditTransferId,
    ) -> Result<TransferVoidOutcome, RepositoryError> {
        let txn = self.db.begin().await?;
        let transfer: CreditTransfer = credit_transfers::Entity::find_by_id(transfer_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(LedgerError::CreditTransferNotFound(transfer_id))?
            .into();

        let outcome = void_transfer_in(&txn, transfer).await?;
        self.finish_void(txn, outcome.balance_changes()).await?;

        if outcome.any_reversed() {
            info!(
                transfer_id = %transfer_id,
                fully_reversed = outcome.fully_reversed(),
                "Credit transfer voided"
            );
        } else {
            debug!(transfer_id = %transfer_id, "Credit transfer already voided");
        }

        Ok(outcome)
    }

    /// Admin void of any transaction.
    ///
    /// A transfer leg is voided together with its sibling through the owning
    /// credit transfer; anything else is voided on its own.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `OrphanTransferLeg` for a leg without a
    /// transfer, or a database error.
    pub async fn void_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<AdminVoidOutcome, RepositoryError> {
        let txn = self.db.begin().await?;
        let transaction = load_transaction(&txn, transaction_id).await?;

        let outcome = if transaction.kind == TransactionKind::UserTransaction {
            let transfer = find_owning_transfer(&txn, transaction_id)
                .await?
                .ok_or(LedgerError::OrphanTransferLeg(transaction_id))?;
            AdminVoidOutcome::CreditTransfer(void_transfer_in(&txn, transfer).await?)
        } else {
            AdminVoidOutcome::Transaction(void_in(&txn, &transaction).await?)
        };

        self.finish_void(txn, outcome.balance_changes()).await?;
        info!(
            transaction_id = %transaction_id,
            kind = %transaction.kind,
            reversed = outcome.any_reversed(),
            "Admin void processed"
        );

        Ok(outcome)
    }

    /// Self-service void of a streque.
    ///
    /// Non-admins may only void inside the grace window. Afterwards an unsent
    /// purchase notification is retracted; if it had already gone out and
    /// someone other than the owner voided, the owner is told.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound`, `AccountNotFound`, `NotAStreque`,
    /// `TooOldToVoid`, or a database error.
    pub async fn void_streque(
        &self,
        transaction_id: TransactionId,
        requested_by: AccountId,
    ) -> Result<VoidOutcome, RepositoryError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        let streque = load_transaction(&txn, transaction_id).await?;
        let requester = load_account(&txn, requested_by).await?.info();

        check_self_void(
            &streque,
            requester.is_admin,
            now,
            self.config.self_void_grace(),
        )?;

        let outcome = void_in(&txn, &streque).await?;
        self.finish_void(txn, outcome.balance_change().into_iter().collect())
            .await?;

        if !outcome.success() {
            debug!(transaction_id = %transaction_id, "Streque already voided");
            return Ok(outcome);
        }

        info!(
            transaction_id = %transaction_id,
            account_id = %streque.account_id,
            requested_by = %requested_by,
            "Streque voided"
        );

        let reference = streque.id.to_string();
        match notification::retract_unsent(
            &self.db,
            streque.account_id,
            NotificationKind::Streque,
            &reference,
        )
        .await
        {
            Ok(true) => debug!(transaction_id = %transaction_id, "Unsent streque notification retracted"),
            Ok(false) if streque.account_id != requested_by => {
                self.notify(NewNotification::streque_void(&streque, &requester))
                    .await;
            }
            Ok(false) => {}
            Err(error) => warn!(
                error = %error,
                transaction_id = %transaction_id,
                "Failed to retract streque notification"
            ),
        }

        Ok(outcome)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Gets a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or a database error.
    pub async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Transaction, RepositoryError> {
        load_transaction(&self.db, transaction_id).await
    }

    /// Gets a credit transfer by ID.
    ///
    /// # Errors
    ///
    /// Returns `CreditTransferNotFound` or a database error.
    pub async fn get_credit_transfer(
        &self,
        transfer_id: CreditTransferId,
    ) -> Result<CreditTransfer, RepositoryError> {
        let transfer = credit_transfers::Entity::find_by_id(transfer_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::CreditTransferNotFound(transfer_id))?;
        Ok(transfer.into())
    }

    /// Gets the current balance of an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a database error.
    pub async fn balance(&self, account_id: AccountId) -> Result<Money, RepositoryError> {
        Ok(load_account(&self.db, account_id).await?.balance())
    }

    /// Estimated blood alcohol concentration of an account, in permille.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a database error.
    pub async fn estimated_bac(&self, account_id: AccountId) -> Result<Decimal, RepositoryError> {
        self.estimated_bac_at(account_id, Utc::now()).await
    }

    /// Estimated blood alcohol concentration at a given instant.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a database error.
    pub async fn estimated_bac_at(
        &self,
        account_id: AccountId,
        now: DateTime<Utc>,
    ) -> Result<Decimal, RepositoryError> {
        let account = load_account(&self.db, account_id).await?;
        let cutoff = now - Duration::days(LOOKBACK_DAYS);

        let streques: Vec<Transaction> = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.into_inner()))
            .filter(transactions::Column::Kind.eq(sea_orm_active_enums::TransactionKind::Streque))
            .filter(transactions::Column::Voided.eq(false))
            .filter(transactions::Column::Timestamp.gte(cutoff))
            .order_by_asc(transactions::Column::Timestamp)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Transaction::from)
            .collect();

        Ok(BacEstimator::estimate_from_history(
            &streques,
            account.bac_profile(),
            now,
        ))
    }

    /// Transaction history of an account, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a database error.
    pub async fn history(
        &self,
        account_id: AccountId,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, RepositoryError> {
        load_account(&self.db, account_id).await?;
        let query = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.into_inner()));
        self.page_newest_first(query, page).await
    }

    /// Unvoided streques still inside the self-void window, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a database error.
    pub async fn recent_streques(
        &self,
        account_id: AccountId,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, RepositoryError> {
        load_account(&self.db, account_id).await?;
        let cutoff = Utc::now() - self.config.self_void_grace();
        let query = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.into_inner()))
            .filter(transactions::Column::Kind.eq(sea_orm_active_enums::TransactionKind::Streque))
            .filter(transactions::Column::Voided.eq(false))
            .filter(transactions::Column::Timestamp.gte(cutoff));
        self.page_newest_first(query, page).await
    }

    /// Lists every entry timestamped within the given days, newest first.
    ///
    /// Voided entries are included. Credit transfers appear once, through
    /// the payee leg.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn transactions_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let (start, end) = report::day_window(from, to);
        let rows = transactions::Entity::find()
            .filter(transactions::Column::Timestamp.gte(start))
            .filter(transactions::Column::Timestamp.lt(end))
            .filter(
                Condition::any()
                    .add(
                        transactions::Column::Kind
                            .ne(sea_orm_active_enums::TransactionKind::UserTransaction),
                    )
                    .add(transactions::Column::Value.gte(0)),
            )
            .order_by_desc(transactions::Column::Timestamp)
            .order_by_desc(transactions::Column::Id)
            .all(&self.db)
            .await?;
        debug!(from = %from, to = %to, count = rows.len(), "Listed transactions in range");
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// Counts unvoided streques per account within the given days, most
    /// first.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn streque_counts_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<StrequeCount>, RepositoryError> {
        let (start, end) = report::day_window(from, to);
        let owners: Vec<Uuid> = transactions::Entity::find()
            .filter(transactions::Column::Kind.eq(sea_orm_active_enums::TransactionKind::Streque))
            .filter(transactions::Column::Voided.eq(false))
            .filter(transactions::Column::Timestamp.gte(start))
            .filter(transactions::Column::Timestamp.lt(end))
            .select_only()
            .column(transactions::Column::AccountId)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(report::rank_streque_counts(
            owners.into_iter().map(AccountId::from_uuid),
        ))
    }

    /// Compares the stored balance with the sum of unvoided transactions.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or a database error.
    pub async fn reconcile_account(
        &self,
        account_id: AccountId,
    ) -> Result<Reconciliation, RepositoryError> {
        let txn = self.db.begin().await?;
        let account = load_account(&txn, account_id).await?;
        let owned: Vec<Transaction> = transactions::Entity::find()
            .filter(transactions::Column::AccountId.eq(account_id.into_inner()))
            .all(&txn)
            .await?
            .into_iter()
            .map(Transaction::from)
            .collect();
        txn.commit().await?;

        let reconciliation = Reconciliation::compute(account_id, account.balance(), &owned);
        if !reconciliation.is_consistent() {
            warn!(
                account_id = %account_id,
                stored = %reconciliation.stored_balance,
                ledger = %reconciliation.ledger_sum,
                "Balance does not match ledger"
            );
        }
        Ok(reconciliation)
    }

    /// Reconciles every account.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn reconcile_all(&self) -> Result<Vec<Reconciliation>, RepositoryError> {
        let ids: Vec<AccountId> = accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|account| AccountId::from_uuid(account.id))
            .collect();

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            results.push(self.reconcile_account(id).await?);
        }
        Ok(results)
    }

    /// Lists credit transfers whose legs disagree on `voided`.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn find_transfer_desyncs(&self) -> Result<Vec<TransferDesync>, RepositoryError> {
        let transfers = credit_transfers::Entity::find()
            .order_by_asc(credit_transfers::Column::Id)
            .all(&self.db)
            .await?;
        if transfers.is_empty() {
            return Ok(Vec::new());
        }

        let leg_ids: Vec<Uuid> = transfers
            .iter()
            .flat_map(|t| [t.payer_transaction_id, t.payee_transaction_id])
            .collect();
        let mut voided: HashMap<Uuid, bool> = HashMap::with_capacity(leg_ids.len());
        for chunk in leg_ids.chunks(ID_CHUNK) {
            let legs = transactions::Entity::find()
                .filter(transactions::Column::Id.is_in(chunk.iter().copied()))
                .all(&self.db)
                .await?;
            voided.extend(legs.into_iter().map(|leg| (leg.id, leg.voided)));
        }

        let desyncs: Vec<TransferDesync> = transfers
            .iter()
            .filter_map(|t| {
                transfer::check_legs(
                    CreditTransferId::from_uuid(t.id),
                    voided.get(&t.payer_transaction_id).copied().unwrap_or(false),
                    voided.get(&t.payee_transaction_id).copied().unwrap_or(false),
                )
            })
            .collect();

        for desync in &desyncs {
            warn!(
                transfer_id = %desync.transfer_id,
                payer_voided = desync.payer_voided,
                payee_voided = desync.payee_voided,
                "Credit transfer legs out of sync"
            );
        }
        Ok(desyncs)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn page_newest_first(
        &self,
        query: sea_orm::Select<transactions::Entity>,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, RepositoryError> {
        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(transactions::Column::Timestamp)
            .order_by_desc(transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok(PageResponse::new(
            rows.into_iter().map(Transaction::from).collect(),
            page,
            total,
        ))
    }

    /// Commits a void unit of work if it changed anything, then publishes.
    async fn finish_void(
        &self,
        txn: DatabaseTransaction,
        changes: Vec<BalanceChange>,
    ) -> Result<(), RepositoryError> {
        if changes.is_empty() {
            txn.rollback().await?;
            return Ok(());
        }
        txn.commit().await?;
        for change in changes {
            self.publish(&change.into());
        }
        Ok(())
    }

    fn publish(&self, event: &LedgerEvent) {
        if let Err(error) = self.events.publish(event) {
            warn!(
                error = %error,
                account_id = %event.account_id(),
                "Failed to publish ledger event"
            );
        }
    }

    async fn notify(&self, new: NewNotification) {
        let account_id = new.account_id;
        match notification::insert(&self.db, new).await {
            Ok(model) => self.publish(&LedgerEvent::NotificationCreated {
                account_id,
                notification_id: NotificationId::from_uuid(model.id),
                text: model.text,
                kind: model.kind.into(),
                reference: model.reference,
            }),
            Err(error) => warn!(
                error = %error,
                account_id = %account_id,
                "Failed to store notification"
            ),
        }
    }
}

// ============================================================================
// Unit-of-work helpers
// ============================================================================

async fn load_account<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<accounts::Model, RepositoryError> {
    let account = accounts::Entity::find_by_id(account_id.into_inner())
        .one(conn)
        .await?
        .ok_or(LedgerError::AccountNotFound(account_id))?;
    Ok(account)
}

async fn load_transaction<C: ConnectionTrait>(
    conn: &C,
    transaction_id: TransactionId,
) -> Result<Transaction, RepositoryError> {
    let model = transactions::Entity::find_by_id(transaction_id.into_inner())
        .one(conn)
        .await?
        .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
    Ok(model.into())
}

async fn find_owning_transfer<C: ConnectionTrait>(
    conn: &C,
    leg_id: TransactionId,
) -> Result<Option<CreditTransfer>, RepositoryError> {
    let transfer = credit_transfers::Entity::find()
        .filter(
            Condition::any()
                .add(credit_transfers::Column::PayerTransactionId.eq(leg_id.into_inner()))
                .add(credit_transfers::Column::PayeeTransactionId.eq(leg_id.into_inner())),
        )
        .one(conn)
        .await?;
    Ok(transfer.map(CreditTransfer::from))
}

/// Adds `delta` to the stored balance in the database and reads it back.
async fn apply_delta(
    txn: &DatabaseTransaction,
    account_id: AccountId,
    delta: Money,
) -> Result<BalanceChange, RepositoryError> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Balance,
            Expr::col(accounts::Column::Balance).add(delta.minor_units()),
        )
        .filter(accounts::Column::Id.eq(account_id.into_inner()))
        .exec(txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(LedgerError::AccountNotFound(account_id).into());
    }

    let account = load_account(txn, account_id).await?;
    Ok(BalanceChange::from_new_balance(
        account_id,
        account.balance(),
        delta,
    ))
}

async fn insert_transaction(
    txn: &DatabaseTransaction,
    planned: NewTransaction,
    timestamp: DateTime<Utc>,
) -> Result<Transaction, RepositoryError> {
    let model = transactions::ActiveModel {
        id: Set(TransactionId::new().into_inner()),
        account_id: Set(planned.account_id.into_inner()),
        performed_by_id: Set(planned.performed_by.into_inner()),
        kind: Set(planned.kind.into()),
        value: Set(planned.value.minor_units()),
        label: Set(planned.label),
        standard_units: Set(planned.standard_units),
        voided: Set(false),
        timestamp: Set(timestamp),
    }
    .insert(txn)
    .await?;
    Ok(model.into())
}

/// Flips `voided` and reverses the balance, at most once per transaction.
async fn void_in(
    txn: &DatabaseTransaction,
    transaction: &Transaction,
) -> Result<VoidOutcome, RepositoryError> {
    let Some(delta) = LedgerService::plan_void(transaction)? else {
        return Ok(VoidOutcome::AlreadyVoided);
    };

    let result = transactions::Entity::update_many()
        .col_expr(transactions::Column::Voided, Expr::value(true))
        .filter(transactions::Column::Id.eq(transaction.id.into_inner()))
        .filter(transactions::Column::Voided.eq(false))
        .exec(txn)
        .await?;
    if result.rows_affected == 0 {
        return Ok(VoidOutcome::AlreadyVoided);
    }

    let change = apply_delta(txn, transaction.account_id, delta).await?;
    Ok(VoidOutcome::Voided(change))
}

/// Voids both legs of a transfer, locking accounts in ascending order.
async fn void_transfer_in(
    txn: &DatabaseTransaction,
    transfer: CreditTransfer,
) -> Result<TransferVoidOutcome, RepositoryError> {
    let payer_leg = load_transaction(txn, transfer.payer_transaction_id).await?;
    let payee_leg = load_transaction(txn, transfer.payee_transaction_id).await?;

    let (payer, payee) = if payee_leg.account_id < payer_leg.account_id {
        let payee = void_in(txn, &payee_leg).await?;
        let payer = void_in(txn, &payer_leg).await?;
        (payer, payee)
    } else {
        let payer = void_in(txn, &payer_leg).await?;
        let payee = void_in(txn, &payee_leg).await?;
        (payer, payee)
    };

    Ok(TransferVoidOutcome {
        transfer_id: transfer.id,
        payer,
        payee,
    })
}
