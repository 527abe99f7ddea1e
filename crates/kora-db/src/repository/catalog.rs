//! # Catalog Repository
//!
//! Read access to products and services, scoped to one business.
//!
//! ## Snapshot Reads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_entries(business, [(PRODUCT, p1), (SERVICE, s1), (PRODUCT, p2)])   │
//! │       │                                                                 │
//! │       ├── SELECT ... FROM products WHERE id IN (p1, p2)                 │
//! │       │        AND business_id = ? AND status <> 'OUT-OF-STOCK'         │
//! │       │                                                                 │
//! │       └── SELECT ... FROM services WHERE id IN (s1)                     │
//! │                AND business_id = ?                                      │
//! │                                                                         │
//! │  Missing IDs are simply absent from the result; the caller decides     │
//! │  they are unavailable. Quantities read here are an estimate: the unit  │
//! │  of work re-checks the live row before decrementing.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kora_core::inventory::derive_status;
use kora_core::{CatalogEntry, CatalogKind, CatalogRef, Product, Service};

/// Repository for catalog reads.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Resolves catalog references of one business.
    ///
    /// Products already OUT-OF-STOCK are excluded.
    pub async fn get_entries(
        &self,
        business_id: &str,
        refs: &[CatalogRef],
    ) -> DbResult<Vec<CatalogEntry>> {
        let product_ids: Vec<&str> = refs
            .iter()
            .filter(|r| r.kind == CatalogKind::Product)
            .map(|r| r.id.as_str())
            .collect();
        let service_ids: Vec<&str> = refs
            .iter()
            .filter(|r| r.kind == CatalogKind::Service)
            .map(|r| r.id.as_str())
            .collect();

        let mut entries = Vec::with_capacity(refs.len());

        if !product_ids.is_empty() {
            let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
                "SELECT id, business_id, name, quantity, low_stock_threshold, status, \
                 cost_price, selling_price, sold FROM products WHERE business_id = ",
            );
            query.push_bind(business_id);
            query.push(" AND status <> 'OUT-OF-STOCK' AND id IN (");
            let mut ids = query.separated(", ");
            for id in &product_ids {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");

            let products: Vec<Product> = query.build_query_as().fetch_all(&self.pool).await?;
            entries.extend(products.into_iter().map(CatalogEntry::Product));
        }

        if !service_ids.is_empty() {
            let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
                "SELECT id, business_id, name, selling_price FROM services WHERE business_id = ",
            );
            query.push_bind(business_id);
            query.push(" AND id IN (");
            let mut ids = query.separated(", ");
            for id in &service_ids {
                ids.push_bind(*id);
            }
            ids.push_unseparated(")");

            let services: Vec<Service> = query.build_query_as().fetch_all(&self.pool).await?;
            entries.extend(services.into_iter().map(CatalogEntry::Service));
        }

        debug!(
            business_id = %business_id,
            requested = refs.len(),
            found = entries.len(),
            "Catalog entries resolved"
        );

        Ok(entries)
    }

    /// Gets a product by ID, whatever its status.
    pub async fn get_product(&self, business_id: &str, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, business_id, name, quantity, low_stock_threshold, status,
                cost_price, selling_price, sold
            FROM products
            WHERE id = ?1 AND business_id = ?2
            "#,
        )
        .bind(id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    // =========================================================================
    // Seeding helpers
    // =========================================================================

    /// Inserts a product. Its status is derived from quantity and threshold,
    /// whatever `product.status` says.
    pub async fn insert_product(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let status = derive_status(product.quantity, product.low_stock_threshold);

        sqlx::query(
            r#"
            INSERT INTO products (
                id, business_id, name, quantity, low_stock_threshold, status,
                cost_price, selling_price, sold
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.business_id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(product.low_stock_threshold)
        .bind(status)
        .bind(product.cost_price)
        .bind(product.selling_price)
        .bind(product.sold)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            status,
            ..product.clone()
        })
    }

    /// Inserts a service.
    pub async fn insert_service(&self, service: &Service) -> DbResult<()> {
        debug!(id = %service.id, name = %service.name, "Inserting service");

        sqlx::query(
            "INSERT INTO services (id, business_id, name, selling_price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&service.id)
        .bind(&service.business_id)
        .bind(&service.name)
        .bind(service.selling_price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts products of a business (for diagnostics).
    pub async fn count_products(&self, business_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE business_id = ?1")
            .bind(business_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use kora_core::{AlertSettings, CatalogEntry, CatalogRef, Product, Service, StockStatus};

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let businesses = db.businesses();
        businesses
            .insert_user("owner", "Owner", &AlertSettings::default())
            .await
            .unwrap();
        businesses.insert_business("biz", "owner", "Shop").await.unwrap();
        businesses.insert_business("other", "owner", "Other").await.unwrap();
        db
    }

    fn product(id: &str, business_id: &str, quantity: i64) -> Product {
        Product {
            id: id.to_string(),
            business_id: business_id.to_string(),
            name: format!("Product {id}"),
            quantity,
            low_stock_threshold: 2,
            status: StockStatus::InStock,
            cost_price: 100,
            selling_price: 150,
            sold: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_derives_status() {
        let db = setup().await;
        let stored = db.catalog().insert_product(&product("p1", "biz", 2)).await.unwrap();
        assert_eq!(stored.status, StockStatus::Low);

        let fetched = db.catalog().get_product("biz", "p1").await.unwrap().unwrap();
        assert_eq!(fetched, stored);
    }

    #[tokio::test]
    async fn test_get_entries_scopes_and_filters() {
        let db = setup().await;
        let catalog = db.catalog();
        catalog.insert_product(&product("p1", "biz", 5)).await.unwrap();
        catalog.insert_product(&product("empty", "biz", 0)).await.unwrap();
        catalog.insert_product(&product("foreign", "other", 5)).await.unwrap();
        catalog
            .insert_service(&Service {
                id: "s1".to_string(),
                business_id: "biz".to_string(),
                name: "Delivery".to_string(),
                selling_price: 300,
            })
            .await
            .unwrap();

        let refs = vec![
            CatalogRef::product("p1"),
            CatalogRef::product("empty"),
            CatalogRef::product("foreign"),
            CatalogRef::service("s1"),
            CatalogRef::product("s1"),
        ];
        let entries = catalog.get_entries("biz", &refs).await.unwrap();

        let mut found: Vec<_> = entries.iter().map(CatalogEntry::catalog_ref).collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(found, vec![CatalogRef::product("p1"), CatalogRef::service("s1")]);
    }
}
