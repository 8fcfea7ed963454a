//! Property-based tests for LedgerService.
//!
//! The plans are applied to a small in-memory book so the balance rules can
//! be checked over arbitrary operation sequences:
//! - stored balance equals the sum of non-voided values
//! - voiding restores the previous balance
//! - transfers conserve money
//! - voiding twice changes nothing

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use strequelistan_shared::types::{AccountId, ArticleId, Money, TransactionId};

use super::balance::ledger_sum;
use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{AccountInfo, ArticleInfo, NewTransaction, Transaction};

const ACCOUNTS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Streque { account: usize, price: i64 },
    Admin { account: usize, amount: i64 },
    Transfer { payer: usize, payee: usize, amount: i64 },
    Void { index: usize },
}

/// In-memory stand-in for the account and transaction tables.
struct Book {
    accounts: Vec<AccountInfo>,
    balances: Vec<Money>,
    transactions: Vec<Transaction>,
}

impl Book {
    fn new() -> Self {
        let accounts = (0..ACCOUNTS)
            .map(|i| AccountInfo {
                id: AccountId::new(),
                first_name: format!("Member{i}"),
                last_name: "Test".to_string(),
                nickname: None,
                is_admin: false,
            })
            .collect();
        Self {
            accounts,
            balances: vec![Money::ZERO; ACCOUNTS],
            transactions: Vec::new(),
        }
    }

    fn slot(&self, account_id: AccountId) -> usize {
        self.accounts
            .iter()
            .position(|a| a.id == account_id)
            .unwrap()
    }

    fn persist(&mut self, planned: NewTransaction) {
        let slot = self.slot(planned.account_id);
        self.balances[slot] += planned.value;
        self.transactions
            .push(planned.into_transaction(TransactionId::new(), Utc::now()));
    }

    fn void(&mut self, index: usize) -> bool {
        let Some(tx) = self.transactions.get(index) else {
            return false;
        };
        let Ok(Some(delta)) = LedgerService::plan_void(tx) else {
            return false;
        };
        let slot = self.slot(tx.account_id);
        self.balances[slot] += delta;
        self.transactions[index].voided = true;
        true
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Streque { account, price } => {
                let article = ArticleInfo {
                    id: ArticleId::new(),
                    name: "Öl".to_string(),
                    price: Money::from_minor(price),
                    standard_units: Decimal::ONE,
                };
                let id = self.accounts[account].id;
                if let Ok(planned) = LedgerService::plan_streque(id, &article, id) {
                    self.persist(planned);
                }
            }
            Op::Admin { account, amount } => {
                let id = self.accounts[account].id;
                if let Ok(planned) =
                    LedgerService::plan_admin_transaction(id, Money::from_minor(amount), "", id)
                {
                    self.persist(planned);
                }
            }
            Op::Transfer { payer, payee, amount } => {
                let result = LedgerService::plan_credit_transfer(
                    &self.accounts[payer],
                    &self.accounts[payee],
                    self.accounts[payer].id,
                    Money::from_minor(amount),
                    "",
                );
                if let Ok(legs) = result {
                    self.persist(legs.payer);
                    self.persist(legs.payee);
                }
            }
            Op::Void { index } => {
                self.void(index);
            }
        }
    }

    fn total(&self) -> Money {
        self.balances.iter().copied().sum()
    }

    fn is_consistent(&self) -> bool {
        self.accounts.iter().enumerate().all(|(slot, account)| {
            let owned = self
                .transactions
                .iter()
                .filter(|tx| tx.account_id == account.id);
            ledger_sum(owned) == self.balances[slot]
        })
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACCOUNTS, 0i64..5_000).prop_map(|(account, price)| Op::Streque { account, price }),
        (0..ACCOUNTS, -10_000i64..10_000).prop_map(|(account, amount)| Op::Admin { account, amount }),
        (0..ACCOUNTS, 0..ACCOUNTS, -1_000i64..10_000)
            .prop_map(|(payer, payee, amount)| Op::Transfer { payer, payee, amount }),
        (0usize..40).prop_map(|index| Op::Void { index }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every stored balance equals the sum of its non-voided transactions.
    #[test]
    fn prop_balance_equals_ledger_sum(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut book = Book::new();
        for op in &ops {
            book.apply(op);
            prop_assert!(book.is_consistent(), "inconsistent after {:?}", op);
        }
    }

    /// Voiding a fresh transaction restores the balance it started from.
    #[test]
    fn prop_void_round_trip(amount in -10_000i64..10_000) {
        let mut book = Book::new();
        let before = book.balances[0];
        book.apply(&Op::Admin { account: 0, amount });
        prop_assert!(book.void(0));
        prop_assert_eq!(book.balances[0], before);
    }

    /// Voiding twice is a no-op the second time.
    #[test]
    fn prop_void_twice_idempotent(price in 1i64..5_000) {
        let mut book = Book::new();
        book.apply(&Op::Streque { account: 1, price });
        prop_assert!(book.void(0));
        let after_first = book.balances[1];
        prop_assert!(!book.void(0));
        prop_assert_eq!(book.balances[1], after_first);
    }

    /// Transfers never create or destroy money.
    #[test]
    fn prop_transfer_conserves_total(
        payer in 0..ACCOUNTS,
        payee in 0..ACCOUNTS,
        amount in 1i64..100_000,
    ) {
        let mut book = Book::new();
        let before = book.total();
        book.apply(&Op::Transfer { payer, payee, amount });
        prop_assert_eq!(book.total(), before);
        prop_assert_eq!(book.transactions.len(), 2);

        book.void(0);
        book.void(1);
        prop_assert_eq!(book.balances.clone(), vec![Money::ZERO; ACCOUNTS]);
    }

    /// Non-positive transfers are rejected.
    #[test]
    fn prop_non_positive_transfer_rejected(amount in -100_000i64..=0) {
        let book = Book::new();
        let result = LedgerService::plan_credit_transfer(
            &book.accounts[0],
            &book.accounts[1],
            book.accounts[0].id,
            Money::from_minor(amount),
            "",
        );
        prop_assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }
}
