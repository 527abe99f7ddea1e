//! # Sale Repository
//!
//! Read-back of the sales ledger. Sales, line items and payment records are
//! written once by the [`crate::UnitOfWork`] and never updated, so this
//! repository only reads.
//!
//! ## Ledger Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales (1) ──< sale_line_items (1..100, ordered by position)           │
//! │    │                                                                    │
//! │    └──── payment_records (0..1)                                        │
//! │                                                                         │
//! │  get_recorded(id) = header + lines + record, as one RecordedSale       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use kora_core::{
    CatalogKind, PaymentRecord, ProductLine, RecordedSale, Sale, SaleLineItem, ServiceLine,
};

/// Repository for sale read operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

/// Flat storage shape of a line item.
#[derive(sqlx::FromRow)]
struct LineItemRow {
    id: String,
    sale_id: String,
    kind: CatalogKind,
    product_id: Option<String>,
    service_id: Option<String>,
    unit_price: i64,
    quantity: i64,
    discount: i64,
    price: i64,
    profit: Option<i64>,
}

impl TryFrom<LineItemRow> for SaleLineItem {
    type Error = DbError;

    fn try_from(row: LineItemRow) -> Result<Self, Self::Error> {
        let corrupt = || DbError::Internal(format!("line item {} has inconsistent columns", row.id));

        match row.kind {
            CatalogKind::Product => {
                let (Some(product_id), Some(profit)) = (row.product_id.clone(), row.profit) else {
                    return Err(corrupt());
                };
                Ok(SaleLineItem::Product(ProductLine {
                    id: row.id,
                    sale_id: row.sale_id,
                    product_id,
                    unit_price: row.unit_price,
                    quantity: row.quantity,
                    discount: row.discount,
                    price: row.price,
                    profit,
                }))
            }
            CatalogKind::Service => {
                let Some(service_id) = row.service_id.clone() else {
                    return Err(corrupt());
                };
                Ok(SaleLineItem::Service(ServiceLine {
                    id: row.id,
                    sale_id: row.sale_id,
                    service_id,
                    unit_price: row.unit_price,
                    quantity: row.quantity,
                    price: row.price,
                }))
            }
        }
    }
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT
                id, business_id, customer_id, attendant_id, bank_id,
                date, total_price, balance, payment_status, method,
                partial_method, due_date, description, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the line items of a sale, in cart order.
    pub async fn line_items(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        let rows = sqlx::query_as::<_, LineItemRow>(
            r#"
            SELECT
                id, sale_id, kind, product_id, service_id,
                unit_price, quantity, discount, price, profit
            FROM sale_line_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleLineItem::try_from).collect()
    }

    /// Gets the payment record of a sale, if one was written.
    pub async fn payment_record(&self, sale_id: &str) -> DbResult<Option<PaymentRecord>> {
        let record = sqlx::query_as::<_, PaymentRecord>(
            r#"
            SELECT id, sale_id, business_id, customer_id, amount, method, bank_id, created_at
            FROM payment_records
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets a sale with its line items and payment record.
    pub async fn get_recorded(&self, id: &str) -> DbResult<Option<RecordedSale>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let line_items = self.line_items(id).await?;
        let payment_record = self.payment_record(id).await?;

        Ok(Some(RecordedSale {
            sale,
            line_items,
            payment_record,
        }))
    }

    /// Counts sales of a business (for diagnostics and tests).
    pub async fn count_for_business(&self, business_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE business_id = ?1")
            .bind(business_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
