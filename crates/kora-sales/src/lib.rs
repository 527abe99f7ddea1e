//! # kora-sales: Sale Transaction Engine
//!
//! Records a checkout atomically: stock, wallet, sale header, line items and
//! payment record commit together or not at all. Stock alerts go out after
//! commit through a queue that never blocks the sale.
//!
//! ## Module Organization
//!
//! - [`coordinator`] - `SaleEngine::create_sale`
//! - [`catalog`] - `CatalogReader` collaborator trait
//! - [`notifier`] - `Notifier` queue, background worker, `PushGateway`
//! - [`config`] - Retry budget and queue capacity
//! - [`error`] - `SaleError` and its coarse `ErrorKind`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kora_sales::{EngineConfig, LoggingPushGateway, NotificationWorker, SaleEngine};
//!
//! let config = EngineConfig::default();
//! let (queue, worker) =
//!     NotificationWorker::spawn(Arc::new(LoggingPushGateway), config.notify_queue_capacity);
//! let engine = SaleEngine::new(db, Arc::new(queue), config);
//!
//! let recorded = engine.create_sale(&business_id, &attendant_id, &request).await?;
//! worker.shutdown().await;
//! ```

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod notifier;

pub use catalog::CatalogReader;
pub use config::EngineConfig;
pub use coordinator::SaleEngine;
pub use error::{ErrorKind, SaleError, SaleResult};
pub use notifier::{
    LoggingPushGateway, NotificationQueue, NotificationWorker, NotificationWorkerHandle, Notifier,
    NotifyError, PushGateway,
};
