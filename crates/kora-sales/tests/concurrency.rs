//! Overlapping sales against one file-backed database.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use common::{alerts_on, next_week, request, Fixture};
use kora_core::{CatalogEntry, CatalogRef, CoreError, StockStatus};
use kora_db::{Database, DbConfig, DbResult};
use kora_sales::{CatalogReader, ErrorKind, SaleEngine};

async fn file_fixture(dir: &tempfile::TempDir) -> Fixture {
    let db = Database::new(DbConfig::new(dir.path().join("kora.db")).max_connections(8))
        .await
        .unwrap();
    Fixture::with_db(db, alerts_on()).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_sales_for_the_last_unit() {
    let dir = tempfile::tempdir().unwrap();
    let fx = Arc::new(file_fixture(&dir).await);
    let product = fx.product(1, 1, 100, 150).await;

    let body = request(json!({
        "method": "CASH",
        "items": [{ "catalogId": product, "quantity": 1 }]
    }));

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let fx = fx.clone();
            let body = body.clone();
            tokio::spawn(async move { fx.sell(&body).await })
        })
        .collect();

    let mut committed = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => committed += 1,
            Err(err) => {
                // Depending on timing the loser sees the guard or an
                // already OUT-OF-STOCK catalog.
                assert_eq!(err.kind(), ErrorKind::Conflict, "{err}");
                assert!(matches!(
                    err.as_core(),
                    Some(CoreError::InsufficientStock { .. })
                        | Some(CoreError::LineItemUnavailable { .. })
                ));
            }
        }
    }

    assert_eq!(committed, 1);
    let stored = fx.product_row(&product).await;
    assert_eq!(stored.quantity, 0);
    assert_eq!(stored.sold, 1);
    assert_eq!(stored.status, StockStatus::OutOfStock);
    assert_eq!(fx.sale_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_never_sells_more_than_available() {
    let dir = tempfile::tempdir().unwrap();
    let fx = Arc::new(file_fixture(&dir).await);
    let product = fx.product(3, 1, 100, 150).await;

    let body = request(json!({
        "method": "CASH",
        "items": [{ "catalogId": product, "quantity": 1 }]
    }));

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let fx = fx.clone();
            let body = body.clone();
            tokio::spawn(async move { fx.sell(&body).await })
        })
        .collect();

    let mut committed = 0;
    for task in tasks {
        if task.await.unwrap().is_ok() {
            committed += 1;
        }
    }

    assert_eq!(committed, 3);
    assert_eq!(fx.product_row(&product).await.quantity, 0);
    assert_eq!(fx.sale_count().await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_advance_sales_never_overdraw_the_wallet() {
    let dir = tempfile::tempdir().unwrap();
    let fx = Arc::new(file_fixture(&dir).await);
    let service = fx.service(600).await;
    let customer = fx.customer(1_000).await;

    let body = request(json!({
        "method": "ADVANCE",
        "customerId": customer,
        "items": [{ "catalogId": service, "type": "SERVICE" }]
    }));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let fx = fx.clone();
            let body = body.clone();
            tokio::spawn(async move { fx.sell(&body).await })
        })
        .collect();

    let mut committed = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => committed += 1,
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::Unprocessable, "{err}");
                assert!(matches!(
                    err.as_core(),
                    Some(CoreError::InsufficientWalletBalance { .. })
                ));
            }
        }
    }

    assert_eq!(committed, 1);
    let stored = fx.customer_row(&customer).await;
    assert_eq!(stored.wallet, 400);
    assert_eq!(stored.purchase_value, 600);
    assert_eq!(fx.sale_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_credit_sales_lose_no_wallet_update() {
    let dir = tempfile::tempdir().unwrap();
    let fx = Arc::new(file_fixture(&dir).await);
    let service = fx.service(100).await;
    let customer = fx.customer(0).await;

    let body = request(json!({
        "method": "CREDIT",
        "customerId": customer,
        "dueDate": next_week(),
        "items": [{ "catalogId": service, "type": "SERVICE" }]
    }));

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let fx = fx.clone();
            let body = body.clone();
            tokio::spawn(async move { fx.sell(&body).await })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let stored = fx.customer_row(&customer).await;
    assert_eq!(stored.wallet, -1_000);
    assert_eq!(stored.purchase_value, 1_000);
    assert_eq!(fx.sale_count().await, 10);
}

/// Serves one frozen catalog read, whatever the live rows say.
struct StaleCatalog {
    entries: Vec<CatalogEntry>,
}

#[async_trait]
impl CatalogReader for StaleCatalog {
    async fn get_catalog_entries(
        &self,
        _business_id: &str,
        _refs: &[CatalogRef],
    ) -> DbResult<Vec<CatalogEntry>> {
        Ok(self.entries.clone())
    }
}

#[tokio::test]
async fn test_commit_rechecks_live_quantity() {
    let fx = common::Fixture::new().await;
    let product = fx.product(2, 1, 100, 150).await;
    let snapshot = fx.product_row(&product).await;

    fx.sell(&request(json!({
        "method": "CASH",
        "items": [{ "catalogId": product, "quantity": 2 }]
    })))
    .await
    .unwrap();

    let stale = SaleEngine::new(
        fx.db.clone(),
        fx.notifier.clone(),
        kora_sales::EngineConfig::default(),
    )
    .with_catalog(Arc::new(StaleCatalog {
        entries: vec![CatalogEntry::Product(snapshot)],
    }));

    let err = stale
        .create_sale_on(
            &fx.business_id,
            &fx.attendant_id,
            &request(json!({
                "method": "CASH",
                "items": [{ "catalogId": product, "quantity": 1 }]
            })),
            common::today(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_core(),
        Some(CoreError::InsufficientStock {
            requested: 1,
            available: 0,
            ..
        })
    ));
    assert_eq!(fx.sale_count().await, 1);
    assert_eq!(fx.product_row(&product).await.sold, 2);
}
