//! # kora-db: Database Layer for Kora POS
//!
//! This crate provides database access for the sale transaction engine.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kora POS Data Flow                               │
//! │                                                                         │
//! │  SaleEngine::create_sale (kora-sales)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kora-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (reads)      │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ BusinessRepo  │    │ 001_initial_ │  │   │
//! │  │   │ begin() ──────┼─┐  │ CatalogRepo   │    │   schema.sql │  │   │
//! │  │   └───────────────┘ │  │ CustomerRepo  │    └──────────────┘  │   │
//! │  │                     │  │ SaleRepo      │                      │   │
//! │  │                     │  └───────────────┘                      │   │
//! │  │                     ▼                                          │   │
//! │  │            ┌────────────────┐                                  │   │
//! │  │            │  UnitOfWork    │  every write of one sale         │   │
//! │  │            └────────────────┘                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Read repositories (business, catalog, customer, sale)
//! - [`unit_of_work`] - The transaction boundary of one sale
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kora_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kora.db")).await?;
//! let ctx = db.businesses().context(&business_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod unit_of_work;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use unit_of_work::{UnitOfWork, WalletOutcome};

// Repository re-exports for convenience
pub use repository::business::BusinessRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::customer::CustomerRepository;
pub use repository::sale::SaleRepository;
