//! PostgreSQL store adapter tests
//!
//! These start a PostgreSQL container and need a running Docker daemon:
//!
//! ```bash
//! cargo test -p test_utils -- --ignored
//! ```

use std::sync::Arc;

use chrono::Utc;

use core_kernel::{BillId, HealthCheckable};
use domain_billing::{
    AmountInput, BillFilter, BillLifecycleManager, BillStatus, BillStore, CreateBillRequest, ErrorKind,
    RecordingNotifier,
};
use infra_db::seed::seed_bills;
use test_utils::{
    assert_no_deleted, assert_paid_at_consistent, assert_public_fields_eq, BillBuilder,
    IdFixtures, TestDatabase,
};

async fn database() -> TestDatabase {
    TestDatabase::new().await.expect("Failed to start postgres container")
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_insert_and_find_active() {
    let db = database().await;
    let store = db.bill_store();

    let bill = BillBuilder::new().with_amount(250).build();
    let stored = store.insert(&bill).await.unwrap();
    assert_public_fields_eq(&stored, &bill);

    let found = store.find_active(bill.uuid).await.unwrap().unwrap();
    assert_public_fields_eq(&found, &bill);

    assert!(store.find_active(BillId::new()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_duplicate_uuid_is_conflict() {
    let db = database().await;
    let store = db.bill_store();

    let bill = BillBuilder::new().build();
    store.insert(&bill).await.unwrap();

    let result = store.insert(&bill).await;
    assert!(matches!(result, Err(core_kernel::PortError::Conflict { .. })));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_filters_and_order() {
    let db = database().await;
    let store = db.bill_store();

    let owner = IdFixtures::user_uuid();
    let first = BillBuilder::new().with_user(owner).build();
    let second = BillBuilder::new().with_user(owner).overdue().build();
    let other = BillBuilder::new().with_user(IdFixtures::other_user_uuid()).build();
    let gone = BillBuilder::new().with_user(owner).deleted().build();
    for bill in [&first, &second, &other, &gone] {
        store.insert(bill).await.unwrap();
    }

    let all = store.find_active_many(&BillFilter::all()).await.unwrap();
    assert_no_deleted(&all);
    assert_eq!(all.len(), 3);

    let mine = store.find_active_many(&BillFilter::for_user(owner)).await.unwrap();
    let ids: Vec<_> = mine.iter().map(|b| b.uuid).collect();
    assert_eq!(ids, vec![first.uuid, second.uuid]);

    let overdue = store
        .find_active_many(&BillFilter::for_user(owner).with_status(Some(BillStatus::Overdue)))
        .await
        .unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].uuid, second.uuid);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_update_status_and_soft_delete_skip_deleted_rows() {
    let db = database().await;
    let store = db.bill_store();

    let bill = BillBuilder::new().build();
    store.insert(&bill).await.unwrap();

    let now = Utc::now();
    let paid = store
        .update_status(bill.uuid, BillStatus::Paid, Some(now))
        .await
        .unwrap()
        .unwrap();
    assert_paid_at_consistent(&paid);

    // Paid bills are never soft-deleted
    assert!(!store.soft_delete(bill.uuid).await.unwrap());

    store.update_status(bill.uuid, BillStatus::Pending, None).await.unwrap();
    assert!(store.soft_delete(bill.uuid).await.unwrap());
    assert!(!store.soft_delete(bill.uuid).await.unwrap());

    assert!(store
        .update_status(bill.uuid, BillStatus::Overdue, None)
        .await
        .unwrap()
        .is_none());
    assert!(store.find_active(bill.uuid).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_lifecycle_walkthrough_against_postgres() {
    let db = database().await;
    let manager = BillLifecycleManager::new(
        Arc::new(db.bill_store()),
        Arc::new(RecordingNotifier::new()),
    );

    let created = manager
        .create_bill(CreateBillRequest {
            user_uuid: Some("u1".to_string()),
            bill_status: Some("Pending".to_string()),
            amount: Some(AmountInput::Whole(100)),
        })
        .await
        .unwrap()
        .bill;
    let id = created.uuid.to_string();

    let paid = manager
        .update_bill_status(domain_billing::UpdateBillStatusRequest {
            uuid: Some(id.clone()),
            bill_status: Some("Paid".to_string()),
        })
        .await
        .unwrap();
    assert!(paid.bill.paid_at.is_some());

    let refused = manager.delete_bill(Some(&id)).await.unwrap_err();
    assert_eq!(refused.kind(), ErrorKind::FailedPrecondition);

    manager
        .update_bill_status(domain_billing::UpdateBillStatusRequest {
            uuid: Some(id.clone()),
            bill_status: Some("Overdue".to_string()),
        })
        .await
        .unwrap();
    manager.delete_bill(Some(&id)).await.unwrap();

    let missing = manager.get_bill_by_id(Some(&id)).await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_seed_and_health() {
    let db = database().await;
    let store = db.bill_store();

    assert!(store.health_check().await.is_operational());

    let written = seed_bills(&store, 40).await.unwrap();
    assert_eq!(written, 40);

    let all = store.find_active_many(&BillFilter::all()).await.unwrap();
    assert_eq!(all.len(), 40);
    all.iter().for_each(assert_paid_at_consistent);

    db.clear_data().await.unwrap();
    assert!(store.find_active_many(&BillFilter::all()).await.unwrap().is_empty());
}
