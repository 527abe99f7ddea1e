//! # Unit of Work
//!
//! The all-or-nothing boundary of one sale.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.begin()                                                             │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  take_stock(p1, 2) ─── guarded UPDATE ─┬── Some(adjustment)            │
//! │  take_stock(p2, 1)        (first write  └── None ─► live_quantity()    │
//! │     │                      takes the                 rollback()        │
//! │     │                      write lock)                                  │
//! │     ▼                                                                   │
//! │  post_wallet(posting) ─── read + CAS ──┬── Posted                      │
//! │     │                                  └── Insufficient ─► rollback()  │
//! │     ▼                                                                   │
//! │  insert_sale / insert_line_items / insert_payment_record               │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  commit()  ── all rows visible at once                                 │
//! │                                                                         │
//! │  Dropped without commit() ── everything rolled back                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Per-Row Exclusivity
//! Stock is decremented with `... WHERE quantity >= n`, so two sales can
//! never both take the last unit: the second one matches zero rows. The
//! wallet is read and then swapped with `... WHERE wallet = <read value>`.
//! SQLite lock contention surfaces as [`DbError::Conflict`].

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use kora_core::inventory::StockAdjustment;
use kora_core::wallet::WalletPosting;
use kora_core::{Money, PaymentRecord, Sale, SaleLineItem, StockStatus};

/// Result of applying a wallet posting inside the unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletOutcome {
    /// The posting applied; `wallet` is the new balance.
    Posted { wallet: Money },
    /// The ADVANCE guard rejected the posting; `wallet` is the live balance.
    Insufficient { wallet: Money },
}

/// An open SQLite transaction scoped to one sale.
#[derive(Debug)]
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub(crate) async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool.begin().await?;
        debug!("Unit of work opened");
        Ok(UnitOfWork { tx })
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Takes `quantity` units of a product if the live row still has them.
    ///
    /// Also bumps `sold` and rewrites `status` when it changes.
    ///
    /// ## Returns
    /// * `Some(adjustment)` - stock taken
    /// * `None` - fewer than `quantity` units left; nothing written
    pub async fn take_stock(
        &mut self,
        business_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> DbResult<Option<StockAdjustment>> {
        let row: Option<(String, i64, i64, StockStatus)> = sqlx::query_as(
            r#"
            UPDATE products
            SET
                quantity = quantity - ?1,
                sold = sold + ?1
            WHERE id = ?2 AND business_id = ?3 AND quantity >= ?1
            RETURNING name, quantity, low_stock_threshold, status
            "#,
        )
        .bind(quantity)
        .bind(product_id)
        .bind(business_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        let Some((name, quantity_after, threshold, previous_status)) = row else {
            debug!(product_id = %product_id, requested = quantity, "Stock guard rejected");
            return Ok(None);
        };

        let adjustment = StockAdjustment::compute(
            product_id,
            &name,
            quantity_after + quantity,
            threshold,
            previous_status,
            quantity,
        )
        .map_err(|e| DbError::Internal(e.to_string()))?;

        if adjustment.status_changed() {
            sqlx::query("UPDATE products SET status = ?1 WHERE id = ?2")
                .bind(adjustment.status)
                .bind(product_id)
                .execute(&mut *self.tx)
                .await?;
        }

        debug!(
            product_id = %product_id,
            quantity_before = adjustment.quantity_before,
            quantity_after = adjustment.quantity_after,
            status = adjustment.status.as_str(),
            "Stock taken"
        );

        Ok(Some(adjustment))
    }

    /// Reads a product's quantity as this transaction sees it.
    ///
    /// Used to report availability after `take_stock` returned `None`.
    pub async fn live_quantity(&mut self, business_id: &str, product_id: &str) -> DbResult<i64> {
        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1 AND business_id = ?2")
                .bind(product_id)
                .bind(business_id)
                .fetch_optional(&mut *self.tx)
                .await?;

        quantity.ok_or_else(|| DbError::not_found("Product", product_id))
    }

    // =========================================================================
    // Wallet
    // =========================================================================

    /// Applies a wallet posting with compare-and-swap on the wallet value.
    pub async fn post_wallet(
        &mut self,
        business_id: &str,
        posting: &WalletPosting,
    ) -> DbResult<WalletOutcome> {
        let current: Option<i64> =
            sqlx::query_scalar("SELECT wallet FROM customers WHERE id = ?1 AND business_id = ?2")
                .bind(&posting.customer_id)
                .bind(business_id)
                .fetch_optional(&mut *self.tx)
                .await?;
        let current = Money::from_minor(
            current.ok_or_else(|| DbError::not_found("Customer", &posting.customer_id))?,
        );

        let Some(next) = posting.apply_to(current) else {
            debug!(customer_id = %posting.customer_id, wallet = current.minor(), "Wallet guard rejected");
            return Ok(WalletOutcome::Insufficient { wallet: current });
        };

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET
                wallet = ?1,
                purchase_value = purchase_value + ?2,
                last_sale_on = ?3
            WHERE id = ?4 AND business_id = ?5 AND wallet = ?6
            "#,
        )
        .bind(next.minor())
        .bind(posting.purchase_value.minor())
        .bind(posting.last_sale_on)
        .bind(&posting.customer_id)
        .bind(business_id)
        .bind(current.minor())
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::Conflict(format!(
                "wallet of customer {} changed during sale",
                posting.customer_id
            )));
        }

        debug!(
            customer_id = %posting.customer_id,
            wallet_before = current.minor(),
            wallet_after = next.minor(),
            "Wallet posted"
        );

        Ok(WalletOutcome::Posted { wallet: next })
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Inserts the sale header.
    pub async fn insert_sale(&mut self, sale: &Sale) -> DbResult<()> {
        debug!(sale_id = %sale.id, total_price = sale.total_price, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, business_id, customer_id, attendant_id, bank_id,
                date, total_price, balance, payment_status, method,
                partial_method, due_date, description, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.business_id)
        .bind(&sale.customer_id)
        .bind(&sale.attendant_id)
        .bind(&sale.bank_id)
        .bind(sale.date)
        .bind(sale.total_price)
        .bind(sale.balance)
        .bind(sale.payment_status)
        .bind(sale.method)
        .bind(sale.partial_method)
        .bind(sale.due_date)
        .bind(&sale.description)
        .bind(sale.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Inserts line items, preserving cart order.
    pub async fn insert_line_items(&mut self, items: &[SaleLineItem]) -> DbResult<()> {
        for (position, item) in items.iter().enumerate() {
            let query = sqlx::query(
                r#"
                INSERT INTO sale_line_items (
                    id, sale_id, position, kind, product_id, service_id,
                    unit_price, quantity, discount, price, profit
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            );

            let query = match item {
                SaleLineItem::Product(line) => query
                    .bind(&line.id)
                    .bind(&line.sale_id)
                    .bind(position as i64)
                    .bind("PRODUCT")
                    .bind(Some(&line.product_id))
                    .bind(None::<String>)
                    .bind(line.unit_price)
                    .bind(line.quantity)
                    .bind(line.discount)
                    .bind(line.price)
                    .bind(Some(line.profit)),
                SaleLineItem::Service(line) => query
                    .bind(&line.id)
                    .bind(&line.sale_id)
                    .bind(position as i64)
                    .bind("SERVICE")
                    .bind(None::<String>)
                    .bind(Some(&line.service_id))
                    .bind(line.unit_price)
                    .bind(line.quantity)
                    .bind(0_i64)
                    .bind(line.price)
                    .bind(None::<i64>),
            };

            query.execute(&mut *self.tx).await?;
        }

        debug!(count = items.len(), "Line items inserted");
        Ok(())
    }

    /// Inserts the payment record.
    pub async fn insert_payment_record(&mut self, record: &PaymentRecord) -> DbResult<()> {
        debug!(sale_id = %record.sale_id, amount = record.amount, "Inserting payment record");

        sqlx::query(
            r#"
            INSERT INTO payment_records (
                id, sale_id, business_id, customer_id, amount, method, bank_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&record.id)
        .bind(&record.sale_id)
        .bind(&record.business_id)
        .bind(&record.customer_id)
        .bind(record.amount)
        .bind(record.method)
        .bind(&record.bank_id)
        .bind(record.created_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Boundaries
    // =========================================================================

    /// Makes every write of this unit of work visible at once.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every write of this unit of work.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx.rollback().await?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
