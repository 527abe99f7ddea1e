//! # Repository Module
//!
//! Database repository implementations for Kora POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reads vs. Writes                                     │
//! │                                                                         │
//! │  Repositories (pool-backed, each call its own statement)               │
//! │  ├── BusinessRepository  context(), get_bank()                         │
//! │  ├── CatalogRepository   get_entries(), get_product()                  │
//! │  ├── CustomerRepository  get()                                          │
//! │  └── SaleRepository      get_recorded(), line_items(), ...             │
//! │                                                                         │
//! │  UnitOfWork (one transaction)                                          │
//! │  └── every write a sale makes                                          │
//! │                                                                         │
//! │  The `insert*` helpers on repositories exist for seeding and tests;    │
//! │  catalog and customer management live outside this engine.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`business::BusinessRepository`] - Business context and bank accounts
//! - [`catalog::CatalogRepository`] - Products and services
//! - [`customer::CustomerRepository`] - Customers and wallets
//! - [`sale::SaleRepository`] - Read-back of the sales ledger

pub mod business;
pub mod catalog;
pub mod customer;
pub mod sale;
