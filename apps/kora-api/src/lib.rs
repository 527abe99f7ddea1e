//! # kora-api: HTTP Surface
//!
//! A thin translation layer: JSON in, [`SaleEngine`] call, JSON out.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /businesses/{business_id}/sales                                   │
//! │       header  x-attendant-id: <user uuid>                               │
//! │       body    CreateSaleRequest                                         │
//! │       201     CreateSaleResponse                                        │
//! │       4xx/5xx { code, message }                                         │
//! │                                                                         │
//! │  GET  /health                                                           │
//! │       200 { status: "ok" } / 503 { status: "unavailable" }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use kora_db::Database;
use kora_sales::SaleEngine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SaleEngine>,
    pub db: Database,
}

impl AppState {
    pub fn new(engine: SaleEngine, db: Database) -> Self {
        AppState {
            engine: Arc::new(engine),
            db,
        }
    }
}

/// Builds the router with all routes mounted.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/businesses/{business_id}/sales", post(handlers::create_sale))
        .with_state(state)
}
