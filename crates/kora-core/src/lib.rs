//! # kora-core: Pure Sale Logic for Kora POS
//!
//! This crate holds every rule of the sale transaction engine as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kora POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    kora-api (axum)                              │   │
//! │  │          POST /businesses/{id}/sales, GET /health               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kora-sales (coordinator)                     │   │
//! │  │     SaleEngine::create_sale, notification queue + worker        │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────────┐  ┌───────▼────────────────┐   │
//! │  │      ★ kora-core (THIS CRATE) ★     │  │  kora-db (SQLite)      │   │
//! │  │                                     │  │  repositories,         │   │
//! │  │  request   ─ shape checks           │  │  UnitOfWork            │   │
//! │  │  pricing   ─ price, profit, total   │  └────────────────────────┘   │
//! │  │  payment   ─ method decision table  │                               │
//! │  │  inventory ─ status, stock events   │                               │
//! │  │  wallet    ─ customer postings      │                               │
//! │  │                                     │                               │
//! │  │  NO I/O • NO DATABASE • NO CLOCK    │                               │
//! │  └─────────────────────────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, PaymentRecord, etc.)
//! - [`money`] - Integer money in minor units
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level rules
//! - [`request`] - CreateSale wire types and cart validation
//! - [`context`] - Resolved business, staff and alert routing
//! - [`pricing`] - Pricing Calculator
//! - [`payment`] - Payment Method Resolver
//! - [`inventory`] - Inventory Adjustor
//! - [`wallet`] - Wallet Ledger
//!
//! ## Example Usage
//!
//! ```rust
//! use kora_core::inventory::derive_status;
//! use kora_core::payment::{resolve, PaymentInput};
//! use kora_core::{Money, PaymentStatus, StockStatus};
//!
//! let total = Money::from_minor(1_500);
//! let res = resolve(&PaymentInput::Cash, total, None, None).unwrap();
//! assert_eq!(res.payment_status, PaymentStatus::Paid);
//!
//! assert_eq!(derive_status(2, 2), StockStatus::Low);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod context;
pub mod error;
pub mod inventory;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod request;
pub mod types;
pub mod validation;
pub mod wallet;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use context::{AlertSettings, BusinessContext};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use request::{CreateSaleRequest, LineRequest, LineSpec, ValidatedSale};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity on a single line.
///
/// Keeps `unit_price × quantity` far from i64 overflow for realistic prices.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Maximum characters in a sale description.
pub const MAX_DESCRIPTION_LEN: usize = 500;
