//! # Catalog Reader
//!
//! The engine's view of the catalog. The SQLite repository implements it;
//! tests and other storage backends can supply their own.

use async_trait::async_trait;

use kora_core::{CatalogEntry, CatalogRef};
use kora_db::{CatalogRepository, DbResult};

/// Resolves catalog references for pricing.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Returns the entries of `business_id` matching `refs`.
    ///
    /// Products already OUT-OF-STOCK are left out. References with no
    /// match are simply absent; the caller reports them unavailable.
    async fn get_catalog_entries(
        &self,
        business_id: &str,
        refs: &[CatalogRef],
    ) -> DbResult<Vec<CatalogEntry>>;
}

#[async_trait]
impl CatalogReader for CatalogRepository {
    async fn get_catalog_entries(
        &self,
        business_id: &str,
        refs: &[CatalogRef],
    ) -> DbResult<Vec<CatalogEntry>> {
        self.get_entries(business_id, refs).await
    }
}
