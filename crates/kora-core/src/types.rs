//! # Domain Types
//!
//! Core domain types used throughout Kora POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog (read-only here)          Ledger (created once, immutable)    │
//! │  ┌─────────────────┐               ┌─────────────────┐                 │
//! │  │    Product      │               │      Sale       │                 │
//! │  │  quantity       │◄── mutated ── │  total_price    │                 │
//! │  │  status         │   by a sale   │  balance        │                 │
//! │  │  sold           │               │  payment_status │                 │
//! │  └─────────────────┘               └────────┬────────┘                 │
//! │  ┌─────────────────┐                        │ 1..n                      │
//! │  │    Service      │               ┌────────▼────────┐                 │
//! │  │  selling_price  │               │  SaleLineItem   │                 │
//! │  └─────────────────┘               │  Product|Service│                 │
//! │                                    └─────────────────┘                 │
//! │  ┌─────────────────┐               ┌─────────────────┐                 │
//! │  │    Customer     │◄── mutated ── │  PaymentRecord  │ 0..1            │
//! │  │  wallet         │   by a sale   │  amount, method │                 │
//! │  │  purchase_value │               └─────────────────┘                 │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Values
//! Enum values travel in upper case (`CASH`, `PRODUCT`, `UNPAID`). Stock
//! statuses keep their hyphens (`IN-STOCK`, `OUT-OF-STOCK`) both on the
//! wire and in the database.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Catalog Kind
// =============================================================================

/// Which half of the catalog a line item refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum CatalogKind {
    /// Stocked item; selling it moves inventory.
    Product,
    /// Non-stocked item; no inventory effect.
    Service,
}

impl Default for CatalogKind {
    fn default() -> Self {
        CatalogKind::Product
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Product => write!(f, "PRODUCT"),
            CatalogKind::Service => write!(f, "SERVICE"),
        }
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Derived inventory classification of a product.
///
/// Never set directly; see [`crate::inventory::derive_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum StockStatus {
    #[serde(rename = "IN-STOCK")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "IN-STOCK"))]
    InStock,
    #[serde(rename = "LOW")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "LOW"))]
    Low,
    #[serde(rename = "OUT-OF-STOCK")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "OUT-OF-STOCK"))]
    OutOfStock,
}

impl StockStatus {
    /// The value stored in `products.status`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "IN-STOCK",
            StockStatus::Low => "LOW",
            StockStatus::OutOfStock => "OUT-OF-STOCK",
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale is settled.
///
/// ```text
/// ┌──────────┬──────────┬──────────┬──────────────┬───────────────┐
/// │ Method   │ Customer │ Bank     │ Balance      │ PaymentRecord │
/// ├──────────┼──────────┼──────────┼──────────────┼───────────────┤
/// │ CASH     │ optional │ -        │ 0            │ total         │
/// │ BANK     │ optional │ required │ 0            │ total         │
/// │ MYCLIQ   │ optional │ -        │ 0            │ total         │
/// │ CREDIT   │ required │ -        │ total        │ none          │
/// │ PARTIAL  │ required │ if BANK  │ total - paid │ paid          │
/// │ ADVANCE  │ required │ -        │ 0            │ none          │
/// └──────────┴──────────┴──────────┴──────────────┴───────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Cash,
    Bank,
    Mycliq,
    Credit,
    Partial,
    Advance,
}

/// The tender used for the paid part of a PARTIAL sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartialMethod {
    Cash,
    Bank,
}

impl From<PartialMethod> for PaymentMethod {
    fn from(method: PartialMethod) -> Self {
        match method {
            PartialMethod::Cash => PaymentMethod::Cash,
            PartialMethod::Bank => PaymentMethod::Bank,
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Whether the customer still owes money on a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    /// `balance > 0 ⇒ UNPAID`, otherwise `PAID`.
    pub fn from_balance(balance: Money) -> Self {
        if balance.is_positive() {
            PaymentStatus::Unpaid
        } else {
            PaymentStatus::Paid
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A stocked catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub business_id: String,
    pub name: String,
    /// Units on the shelf, never negative.
    pub quantity: i64,
    /// At or below this (and above zero) the product is LOW.
    pub low_stock_threshold: i64,
    pub status: StockStatus,
    pub cost_price: i64,
    pub selling_price: i64,
    /// Lifetime units sold.
    pub sold: i64,
}

impl Product {
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_minor(self.cost_price)
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.selling_price)
    }
}

/// A non-stocked catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub selling_price: i64,
}

impl Service {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.selling_price)
    }
}

/// A `(kind, id)` pair identifying one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogRef {
    pub kind: CatalogKind,
    pub id: String,
}

impl CatalogRef {
    pub fn product(id: impl Into<String>) -> Self {
        CatalogRef {
            kind: CatalogKind::Product,
            id: id.into(),
        }
    }

    pub fn service(id: impl Into<String>) -> Self {
        CatalogRef {
            kind: CatalogKind::Service,
            id: id.into(),
        }
    }
}

/// One resolved catalog record, as returned by a catalog reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Product(Product),
    Service(Service),
}

impl CatalogEntry {
    pub fn id(&self) -> &str {
        match self {
            CatalogEntry::Product(p) => &p.id,
            CatalogEntry::Service(s) => &s.id,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        match self {
            CatalogEntry::Product(_) => CatalogKind::Product,
            CatalogEntry::Service(_) => CatalogKind::Service,
        }
    }

    pub fn catalog_ref(&self) -> CatalogRef {
        CatalogRef {
            kind: self.kind(),
            id: self.id().to_string(),
        }
    }
}

// =============================================================================
// Customers & Banks
// =============================================================================

/// A business-scoped customer with a running wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub business_id: String,
    pub name: String,
    /// Signed balance; negative means the customer owes the business.
    pub wallet: i64,
    /// Cumulative value of every sale made to this customer.
    pub purchase_value: i64,
    #[ts(as = "Option<String>")]
    pub last_sale_on: Option<NaiveDate>,
}

impl Customer {
    #[inline]
    pub fn wallet(&self) -> Money {
        Money::from_minor(self.wallet)
    }
}

/// A bank account registered by the business for transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    pub business_id: String,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
}

// =============================================================================
// Sale
// =============================================================================

/// The immutable header of one checkout.
///
/// Invariants: `total_price == Σ line.price`, and `payment_status` is
/// `UNPAID` exactly when `balance > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub business_id: String,
    pub customer_id: Option<String>,
    pub attendant_id: String,
    pub bank_id: Option<String>,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_price: i64,
    pub balance: i64,
    pub payment_status: PaymentStatus,
    pub method: PaymentMethod,
    pub partial_method: Option<PartialMethod>,
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_minor(self.total_price)
    }
}

// =============================================================================
// Sale Line Items
// =============================================================================

/// A sold product, frozen at the price it was sold for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub unit_price: i64,
    pub quantity: i64,
    pub discount: i64,
    /// `unit_price × quantity − discount`
    pub price: i64,
    /// `price − cost_price × quantity`
    pub profit: i64,
}

/// A sold service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub id: String,
    pub sale_id: String,
    pub service_id: String,
    pub unit_price: i64,
    pub quantity: i64,
    /// `unit_price × quantity`
    pub price: i64,
}

/// One persisted entry of a sale's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum SaleLineItem {
    Product(ProductLine),
    Service(ServiceLine),
}

impl SaleLineItem {
    pub fn price(&self) -> Money {
        match self {
            SaleLineItem::Product(line) => Money::from_minor(line.price),
            SaleLineItem::Service(line) => Money::from_minor(line.price),
        }
    }

    pub fn catalog_id(&self) -> &str {
        match self {
            SaleLineItem::Product(line) => &line.product_id,
            SaleLineItem::Service(line) => &line.service_id,
        }
    }
}

// =============================================================================
// Payment Record
// =============================================================================

/// Funds actually collected when the sale was made.
///
/// `method` is the tender used, which for PARTIAL sales is the sub-method
/// rather than `PARTIAL` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    pub sale_id: String,
    pub business_id: String,
    pub customer_id: Option<String>,
    pub amount: i64,
    pub method: PaymentMethod,
    pub bank_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A committed sale with everything written alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSale {
    pub sale: Sale,
    pub line_items: Vec<SaleLineItem>,
    pub payment_record: Option<PaymentRecord>,
}

// =============================================================================
// Stock Events
// =============================================================================

/// Which threshold a product just crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StockEventKind {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "OUT-OF-STOCK")]
    OutOfStock,
}

/// A product entered LOW or OUT-OF-STOCK because of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockEvent {
    pub kind: StockEventKind,
    pub business_id: String,
    pub owner_id: String,
    pub product_id: String,
    pub product_name: String,
    /// Quantity left after the sale.
    pub quantity: i64,
}

/// A stock event paired with the device it should be pushed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockNotification {
    pub event: StockEvent,
    pub push_token: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_from_balance() {
        assert_eq!(PaymentStatus::from_balance(Money::zero()), PaymentStatus::Paid);
        assert_eq!(
            PaymentStatus::from_balance(Money::from_minor(1)),
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock).unwrap(),
            "\"OUT-OF-STOCK\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Mycliq).unwrap(), "\"MYCLIQ\"");
        assert_eq!(
            serde_json::from_str::<CatalogKind>("\"SERVICE\"").unwrap(),
            CatalogKind::Service
        );
        assert_eq!(StockStatus::InStock.as_str(), "IN-STOCK");
    }

    #[test]
    fn test_line_item_is_tagged_by_type() {
        let line = SaleLineItem::Service(ServiceLine {
            id: "l-1".to_string(),
            sale_id: "s-1".to_string(),
            service_id: "svc-1".to_string(),
            unit_price: 500,
            quantity: 2,
            price: 1000,
        });

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["type"], "SERVICE");
        assert_eq!(json["serviceId"], "svc-1");
        assert_eq!(line.price(), Money::from_minor(1000));
    }

    #[test]
    fn test_partial_method_maps_to_tender() {
        assert_eq!(PaymentMethod::from(PartialMethod::Bank), PaymentMethod::Bank);
        assert_eq!(PaymentMethod::from(PartialMethod::Cash), PaymentMethod::Cash);
    }
}
