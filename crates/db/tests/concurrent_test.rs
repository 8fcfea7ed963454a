//! Concurrent access tests for ledger mutations.
//!
//! Many purchases and transfers race on the same accounts; the stored
//! balances must still equal the ledger afterwards.

mod common;

use futures::future::join_all;
use rust_decimal_macros::dec;
use strequelistan_shared::types::Money;

use common::setup;

#[tokio::test]
async fn test_concurrent_streques_have_no_drift() {
    let t = setup().await;
    let member = t.member("Alva").await;
    let beer = t.article("Öl", 1000, dec!(1)).await;

    let results = join_all((0..50).map(|_| t.ledger.strequa(member, beer, member))).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(t.balance(member).await, Money::from_minor(-50_000));
    t.assert_consistent(member).await;
}

#[tokio::test]
async fn test_crossing_transfers_conserve_total() {
    let t = setup().await;
    let a = t.member("Alva").await;
    let b = t.member("Bo").await;

    let forward = (0..20).map(|_| {
        t.ledger
            .create_credit_transfer(a, b, a, Money::from_minor(300), "")
    });
    let backward = (0..20).map(|_| {
        t.ledger
            .create_credit_transfer(b, a, b, Money::from_minor(100), "")
    });
    let results = join_all(forward.chain(backward)).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(t.balance(a).await, Money::from_minor(-4_000));
    assert_eq!(t.balance(b).await, Money::from_minor(4_000));
    t.assert_consistent(a).await;
    t.assert_consistent(b).await;
}

#[tokio::test]
async fn test_concurrent_voids_refund_once() {
    let t = setup().await;
    let member = t.member("Alva").await;
    let beer = t.article("Öl", 1000, dec!(1)).await;
    let streque = t.ledger.strequa(member, beer, member).await.unwrap();

    let outcomes = join_all((0..10).map(|_| t.ledger.void_and_refund(streque.id))).await;

    let reversed = outcomes
        .into_iter()
        .map(Result::unwrap)
        .filter(|o| o.success())
        .count();
    assert_eq!(reversed, 1);
    assert_eq!(t.balance(member).await, Money::ZERO);
    t.assert_consistent(member).await;
}
