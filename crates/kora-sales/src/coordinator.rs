//! # Sale Coordinator
//!
//! [`SaleEngine::create_sale`] turns a checkout request into committed
//! ledger rows, or into an error with nothing written.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CreateSale Pipeline                                  │
//! │                                                                         │
//! │  PLAN (reads only, any failure returns before a write)                 │
//! │  ────────────────────────────────────────────────────                  │
//! │  1. BusinessContext ── authorize(attendant)                            │
//! │  2. request.validate(today) ── shape, duplicates, method fields        │
//! │  3. CatalogReader ── price_cart (snapshot stock pre-check)             │
//! │  4. customer / bank lookups ── payment::resolve ── WalletPosting       │
//! │                                                                         │
//! │  COMMIT (one UnitOfWork, retried on lock contention)                   │
//! │  ────────────────────────────────────────────────────                  │
//! │  5. take_stock per product ── None ─► InsufficientStock, rollback      │
//! │  6. post_wallet            ── Insufficient ─► rollback                 │
//! │  7. insert sale, line items, payment record                            │
//! │  8. commit                                                             │
//! │                                                                         │
//! │  AFTER COMMIT                                                          │
//! │  ────────────────────────────────────────────────────                  │
//! │  9. stock events ── alert_target ── Notifier::enqueue (never awaited)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use backoff::future::retry;
use backoff::ExponentialBackoffBuilder;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use kora_core::inventory::StockAdjustment;
use kora_core::payment::{self, PaymentResolution};
use kora_core::pricing::{price_cart, PricedCart};
use kora_core::wallet::WalletPosting;
use kora_core::{
    BusinessContext, CoreError, CreateSaleRequest, Customer, PaymentRecord, RecordedSale, Sale,
    SaleLineItem, StockNotification, ValidatedSale, ValidationError,
};
use kora_db::{Database, WalletOutcome};

use crate::catalog::CatalogReader;
use crate::config::EngineConfig;
use crate::error::{SaleError, SaleResult};
use crate::notifier::Notifier;

// =============================================================================
// Commit Plan
// =============================================================================

/// Everything the unit of work writes, decided before it opens.
#[derive(Debug)]
struct CommitPlan {
    business_id: String,
    /// (product_id, quantity) in cart order.
    stock: Vec<(String, i64)>,
    posting: Option<WalletPosting>,
    sale: Sale,
    line_items: Vec<SaleLineItem>,
    payment_record: Option<PaymentRecord>,
}

impl CommitPlan {
    fn build(
        ctx: &BusinessContext,
        attendant_id: &str,
        validated: ValidatedSale,
        cart: PricedCart,
        customer: Option<&Customer>,
        resolution: PaymentResolution,
        today: NaiveDate,
    ) -> Self {
        let sale_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        let stock = cart
            .products()
            .map(|p| (p.product_id.clone(), p.quantity))
            .collect();
        let posting = WalletPosting::plan(customer, &resolution, cart.total, today);

        let payment_record = resolution.payment_record.map(|spec| PaymentRecord {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.clone(),
            business_id: ctx.business_id.clone(),
            customer_id: validated.customer_id.clone(),
            amount: spec.amount.minor(),
            method: spec.method,
            bank_id: spec.bank_id,
            created_at,
        });

        let sale = Sale {
            id: sale_id.clone(),
            business_id: ctx.business_id.clone(),
            customer_id: validated.customer_id,
            attendant_id: attendant_id.to_string(),
            bank_id: validated.bank_id,
            date: validated.date,
            total_price: cart.total.minor(),
            balance: resolution.balance.minor(),
            payment_status: resolution.payment_status,
            method: validated.payment.method(),
            partial_method: validated.payment.partial_method(),
            due_date: validated.due_date,
            description: validated.description,
            created_at,
        };

        let line_items = cart
            .lines
            .into_iter()
            .map(|line| line.into_line_item(Uuid::new_v4().to_string(), sale_id.clone()))
            .collect();

        CommitPlan {
            business_id: ctx.business_id.clone(),
            stock,
            posting,
            sale,
            line_items,
            payment_record,
        }
    }
}

// =============================================================================
// Sale Engine
// =============================================================================

/// Records sales for any business in the database.
///
/// Cheap to share behind an `Arc`; every call is independent.
pub struct SaleEngine {
    db: Database,
    catalog: Arc<dyn CatalogReader>,
    notifier: Arc<dyn Notifier>,
    config: EngineConfig,
}

impl SaleEngine {
    /// Creates an engine reading the catalog from `db`.
    pub fn new(db: Database, notifier: Arc<dyn Notifier>, config: EngineConfig) -> Self {
        let catalog = Arc::new(db.catalog());
        SaleEngine {
            db,
            catalog,
            notifier,
            config,
        }
    }

    /// Replaces the catalog reader.
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogReader>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Records one sale dated by the request, validated against today (UTC).
    ///
    /// ## Example
    /// ```rust,ignore
    /// let recorded = engine.create_sale(&business_id, &attendant_id, &request).await?;
    /// assert_eq!(recorded.sale.total(), recorded.line_items.iter().map(|l| l.price()).sum());
    /// ```
    pub async fn create_sale(
        &self,
        business_id: &str,
        attendant_id: &str,
        request: &CreateSaleRequest,
    ) -> SaleResult<RecordedSale> {
        self.create_sale_on(business_id, attendant_id, request, Utc::now().date_naive())
            .await
    }

    /// Same as [`create_sale`](Self::create_sale) with an explicit "today",
    /// which due dates must lie after and which stamps `last_sale_on`.
    pub async fn create_sale_on(
        &self,
        business_id: &str,
        attendant_id: &str,
        request: &CreateSaleRequest,
        today: NaiveDate,
    ) -> SaleResult<RecordedSale> {
        let ctx = self
            .db
            .businesses()
            .context(business_id)
            .await?
            .ok_or_else(|| SaleError::BusinessNotFound(business_id.to_string()))?;
        ctx.authorize(attendant_id)?;

        let validated = request.validate(today)?;
        debug!(
            business_id = %business_id,
            lines = validated.lines.len(),
            method = ?validated.payment.method(),
            "Sale request validated"
        );

        let entries = self
            .catalog
            .get_catalog_entries(business_id, &validated.catalog_refs())
            .await?;
        let cart = price_cart(&validated.lines, &entries)?;

        let customer = match &validated.customer_id {
            Some(id) => Some(
                self.db
                    .customers()
                    .get(business_id, id)
                    .await?
                    .ok_or_else(|| ValidationError::not_found("customer", id.as_str()))?,
            ),
            None => None,
        };
        if let Some(id) = &validated.bank_id {
            self.db
                .businesses()
                .get_bank(business_id, id)
                .await?
                .ok_or_else(|| ValidationError::not_found("bank", id.as_str()))?;
        }

        let resolution = payment::resolve(
            &validated.payment,
            cart.total,
            customer.as_ref(),
            validated.bank_id.as_deref(),
        )?;

        let plan = CommitPlan::build(
            &ctx,
            attendant_id,
            validated,
            cart,
            customer.as_ref(),
            resolution,
            today,
        );

        let adjustments = self.commit_with_retry(&plan).await?;

        info!(
            sale_id = %plan.sale.id,
            business_id = %business_id,
            total_price = plan.sale.total_price,
            balance = plan.sale.balance,
            "Sale created"
        );

        self.dispatch_stock_events(&ctx, &adjustments);

        Ok(RecordedSale {
            sale: plan.sale,
            line_items: plan.line_items,
            payment_record: plan.payment_record,
        })
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Runs the unit of work, retrying while it loses on lock contention.
    async fn commit_with_retry(&self, plan: &CommitPlan) -> SaleResult<Vec<StockAdjustment>> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.config.initial_backoff)
            .with_max_elapsed_time(Some(self.config.commit_max_retry))
            .build();

        let mut attempts = 0u32;
        let result = retry(policy, || {
            attempts += 1;
            let attempt = attempts;
            async move {
                self.commit(plan).await.map_err(|err| match err {
                    SaleError::StorageConflict { .. } => {
                        warn!(sale_id = %plan.sale.id, attempt, error = %err, "Sale commit conflicted, retrying");
                        backoff::Error::transient(err)
                    }
                    other => backoff::Error::permanent(other),
                })
            }
        })
        .await;

        result.map_err(|err| match err {
            SaleError::StorageConflict { message, .. } => SaleError::StorageConflict {
                attempts,
                message,
            },
            other => other,
        })
    }

    /// One attempt at writing the whole sale.
    async fn commit(&self, plan: &CommitPlan) -> SaleResult<Vec<StockAdjustment>> {
        let mut uow = self.db.begin().await?;
        let mut adjustments = Vec::with_capacity(plan.stock.len());

        for (product_id, quantity) in &plan.stock {
            match uow.take_stock(&plan.business_id, product_id, *quantity).await? {
                Some(adjustment) => adjustments.push(adjustment),
                None => {
                    let available = uow.live_quantity(&plan.business_id, product_id).await?;
                    uow.rollback().await?;
                    return Err(CoreError::InsufficientStock {
                        product_id: product_id.clone(),
                        requested: *quantity,
                        available,
                    }
                    .into());
                }
            }
        }

        if let Some(posting) = &plan.posting {
            match uow.post_wallet(&plan.business_id, posting).await? {
                WalletOutcome::Posted { .. } => {}
                WalletOutcome::Insufficient { wallet } => {
                    uow.rollback().await?;
                    return Err(CoreError::InsufficientWalletBalance {
                        customer_id: posting.customer_id.clone(),
                        wallet: wallet.minor(),
                        required: posting.guard.unwrap_or(plan.sale.total()).minor(),
                    }
                    .into());
                }
            }
        }

        uow.insert_sale(&plan.sale).await?;
        uow.insert_line_items(&plan.line_items).await?;
        if let Some(record) = &plan.payment_record {
            uow.insert_payment_record(record).await?;
        }

        uow.commit().await?;
        Ok(adjustments)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    fn dispatch_stock_events(&self, ctx: &BusinessContext, adjustments: &[StockAdjustment]) {
        for adjustment in adjustments {
            let Some(event) = adjustment.stock_event(&ctx.business_id, &ctx.owner_id) else {
                continue;
            };

            match ctx.alert_target(event.kind) {
                Some(token) => self.notifier.enqueue(StockNotification {
                    push_token: token.to_string(),
                    event,
                }),
                None => debug!(
                    product_id = %event.product_id,
                    kind = ?event.kind,
                    "Stock alert disabled for owner - not sent"
                ),
            }
        }
    }
}
