//! Integration tests for notifications produced by ledger mutations.

mod common;

use rust_decimal_macros::dec;
use strequelistan_core::events::LedgerEvent;
use strequelistan_core::ledger::AdminEntry;
use strequelistan_db::NotificationRepository;
use strequelistan_db::entities::sea_orm_active_enums::NotificationKind;
use strequelistan_shared::LedgerConfig;
use strequelistan_shared::types::{Money, NotificationId};

use common::{setup, setup_with};

#[tokio::test]
async fn test_streque_by_someone_else_notifies_owner() {
    let t = setup().await;
    let owner = t.member("Alva").await;
    let friend = t.member("Bo").await;
    let beer = t.article("Öl", 1000, dec!(1)).await;
    let notifications = NotificationRepository::new(t.db.clone());

    t.ledger.strequa(owner, beer, owner).await.unwrap();
    assert!(notifications.list_unsent(owner).await.unwrap().is_empty());

    let streque = t.ledger.strequa(owner, beer, friend).await.unwrap();

    let unsent = notifications.list_unsent(owner).await.unwrap();
    assert_eq!(unsent.len(), 1);
    assert_eq!(unsent[0].kind, NotificationKind::Streque);
    assert_eq!(unsent[0].text, "Bo Testsson strequade en Öl på dig.");
    assert_eq!(unsent[0].reference, streque.id.to_string());

    let created = t
        .events
        .events()
        .into_iter()
        .filter(|e| matches!(e, LedgerEvent::NotificationCreated { .. }))
        .count();
    assert_eq!(created, 1);
}

#[tokio::test]
async fn test_void_before_delivery_retracts_notification() {
    let t = setup().await;
    let owner = t.member("Alva").await;
    let friend = t.member("Bo").await;
    let beer = t.article("Öl", 1000, dec!(1)).await;
    let notifications = NotificationRepository::new(t.db.clone());

    let streque = t.ledger.strequa(owner, beer, friend).await.unwrap();
    t.ledger.void_streque(streque.id, friend).await.unwrap();

    assert!(notifications.list_unsent(owner).await.unwrap().is_empty());
    assert!(notifications.list_unacknowledged(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_void_after_delivery_tells_owner() {
    let t = setup().await;
    let owner = t.member("Alva").await;
    let friend = t.member("Bo").await;
    let beer = t.article("Öl", 1000, dec!(1)).await;
    let notifications = NotificationRepository::new(t.db.clone());

    let streque = t.ledger.strequa(owner, beer, friend).await.unwrap();
    let sent: Vec<NotificationId> = notifications
        .list_unsent(owner)
        .await
        .unwrap()
        .into_iter()
        .map(|n| NotificationId::from_uuid(n.id))
        .collect();
    assert_eq!(notifications.mark_sent(&sent).await.unwrap(), 1);

    t.ledger.void_streque(streque.id, friend).await.unwrap();

    let unsent = notifications.list_unsent(owner).await.unwrap();
    assert_eq!(unsent.len(), 1);
    assert_eq!(unsent[0].kind, NotificationKind::StrequeVoid);
    assert_eq!(unsent[0].text, "Bo Testsson ångrade ett av dina Öl-streque.");
}

#[tokio::test]
async fn test_owner_voiding_own_streque_is_silent() {
    let t = setup().await;
    let owner = t.member("Alva").await;
    let beer = t.article("Öl", 1000, dec!(1)).await;
    let notifications = NotificationRepository::new(t.db.clone());

    let streque = t.ledger.strequa(owner, beer, owner).await.unwrap();
    t.ledger.void_streque(streque.id, owner).await.unwrap();

    assert!(notifications.list_unacknowledged(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_transaction_notification_follows_config() {
    let t = setup().await;
    let member = t.member("Alva").await;
    let admin = t.admin("Bo").await;
    let notifications = NotificationRepository::new(t.db.clone());

    t.ledger
        .admin_transaction(member, Money::from_minor(-1_050), "Sittning", admin)
        .await
        .unwrap();

    let unsent = notifications.list_unsent(member).await.unwrap();
    assert_eq!(unsent.len(), 1);
    assert_eq!(unsent[0].kind, NotificationKind::AdminTransaction);
    assert_eq!(unsent[0].text, "Uttag!\n-10,50 kr: Sittning");

    let quiet = setup_with(LedgerConfig {
        notify_admin_transactions: false,
        ..LedgerConfig::default()
    })
    .await;
    let member = quiet.member("Alva").await;
    let admin = quiet.admin("Bo").await;
    quiet
        .ledger
        .admin_transaction(member, Money::from_minor(500), "Swish", admin)
        .await
        .unwrap();
    assert!(
        NotificationRepository::new(quiet.db.clone())
            .list_unsent(member)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_bulk_admin_transactions_are_silent() {
    let t = setup().await;
    let a = t.member("Alva").await;
    let b = t.member("Cecilia").await;
    let admin = t.admin("Bo").await;
    let notifications = NotificationRepository::new(t.db.clone());
    assert!(t.ledger.config().notify_admin_transactions);

    let created = t
        .ledger
        .bulk_admin_transactions(
            &[
                AdminEntry {
                    account_id: a,
                    amount: Money::from_minor(-2_500),
                    label: "Sittning".to_string(),
                },
                AdminEntry {
                    account_id: b,
                    amount: Money::from_minor(-2_500),
                    label: "Sittning".to_string(),
                },
            ],
            admin,
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    assert!(notifications.list_unsent(a).await.unwrap().is_empty());
    assert!(notifications.list_unsent(b).await.unwrap().is_empty());
    assert!(
        t.events
            .events()
            .iter()
            .all(|e| matches!(e, LedgerEvent::BalanceChanged { .. }))
    );
}

#[tokio::test]
async fn test_credit_transfer_notifies_payee() {
    let t = setup().await;
    let payer = t.member("Alva").await;
    let payee = t.member("Cecilia").await;
    let notifications = NotificationRepository::new(t.db.clone());

    let transfer = t
        .ledger
        .create_credit_transfer(payer, payee, payer, Money::from_minor(2_500), "pizza")
        .await
        .unwrap();

    let unsent = notifications.list_unsent(payee).await.unwrap();
    assert_eq!(unsent.len(), 1);
    assert_eq!(unsent[0].kind, NotificationKind::StrequePay);
    assert_eq!(unsent[0].text, "Streque Pay!\n25,00 kr från Alva Testsson: pizza");
    assert_eq!(unsent[0].reference, transfer.id.to_string());
    assert!(notifications.list_unsent(payer).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_acknowledge_keeps_unsent_pending() {
    let t = setup().await;
    let payer = t.member("Alva").await;
    let payee = t.member("Cecilia").await;
    let notifications = NotificationRepository::new(t.db.clone());

    for _ in 0..2 {
        t.ledger
            .create_credit_transfer(payer, payee, payer, Money::from_minor(100), "")
            .await
            .unwrap();
    }
    let first = notifications.list_unsent(payee).await.unwrap()[0].id;
    notifications
        .mark_sent(&[NotificationId::from_uuid(first)])
        .await
        .unwrap();

    assert_eq!(notifications.acknowledge_all(payee).await.unwrap(), 1);

    let pending = notifications.list_unacknowledged(payee).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert!(!pending[0].is_sent);
}
