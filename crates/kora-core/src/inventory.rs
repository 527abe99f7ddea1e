//! # Inventory Adjustor
//!
//! Stock status derivation and the effect of one sale on one product.
//!
//! ## Stock State Machine
//! ```text
//!                 quantity > threshold
//!            ┌──────────────────────────┐
//!            │         IN-STOCK         │
//!            └────────────┬─────────────┘
//!                         │ sale brings quantity to 1..=threshold
//!                         ▼                               ──► StockEvent(LOW)
//!            ┌──────────────────────────┐
//!            │           LOW            │
//!            └────────────┬─────────────┘
//!                         │ sale brings quantity to 0
//!                         ▼                               ──► StockEvent(OUT-OF-STOCK)
//!            ┌──────────────────────────┐
//!            │       OUT-OF-STOCK       │
//!            └──────────────────────────┘
//! ```
//!
//! An event fires only when the status *changes* into LOW or OUT-OF-STOCK.
//! Selling from LOW to a lower LOW quantity is silent.
//!
//! [`derive_status`] is the only place a status is computed; storage calls
//! into [`StockAdjustment::compute`] with the live row it just updated.

use crate::error::{CoreError, CoreResult};
use crate::types::{StockEvent, StockEventKind, StockStatus};

/// Derives a product's status from its quantity and threshold.
///
/// ## Example
/// ```rust
/// use kora_core::inventory::derive_status;
/// use kora_core::StockStatus;
///
/// assert_eq!(derive_status(0, 2), StockStatus::OutOfStock);
/// assert_eq!(derive_status(2, 2), StockStatus::Low);
/// assert_eq!(derive_status(3, 2), StockStatus::InStock);
/// ```
pub fn derive_status(quantity: i64, low_stock_threshold: i64) -> StockStatus {
    if quantity <= 0 {
        StockStatus::OutOfStock
    } else if quantity <= low_stock_threshold {
        StockStatus::Low
    } else {
        StockStatus::InStock
    }
}

/// The event a status change warrants, if any.
pub fn transition_event(previous: StockStatus, next: StockStatus) -> Option<StockEventKind> {
    if previous == next {
        return None;
    }

    match next {
        StockStatus::Low => Some(StockEventKind::Low),
        StockStatus::OutOfStock => Some(StockEventKind::OutOfStock),
        StockStatus::InStock => None,
    }
}

/// The before/after of one product row touched by a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    pub product_id: String,
    pub product_name: String,
    pub sold: i64,
    pub quantity_before: i64,
    pub quantity_after: i64,
    pub previous_status: StockStatus,
    pub status: StockStatus,
    pub event: Option<StockEventKind>,
}

impl StockAdjustment {
    /// Computes the effect of selling `sold` units from a product holding
    /// `quantity_before`.
    ///
    /// ## Errors
    /// `InsufficientStock` when the sale would take the quantity below zero.
    pub fn compute(
        product_id: &str,
        product_name: &str,
        quantity_before: i64,
        low_stock_threshold: i64,
        previous_status: StockStatus,
        sold: i64,
    ) -> CoreResult<Self> {
        if sold > quantity_before {
            return Err(CoreError::InsufficientStock {
                product_id: product_id.to_string(),
                requested: sold,
                available: quantity_before,
            });
        }

        let quantity_after = quantity_before - sold;
        let status = derive_status(quantity_after, low_stock_threshold);

        Ok(StockAdjustment {
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            sold,
            quantity_before,
            quantity_after,
            previous_status,
            status,
            event: transition_event(previous_status, status),
        })
    }

    /// Whether `products.status` must be rewritten.
    pub fn status_changed(&self) -> bool {
        self.previous_status != self.status
    }

    /// Builds the outbound event for this adjustment, if it warrants one.
    pub fn stock_event(&self, business_id: &str, owner_id: &str) -> Option<StockEvent> {
        self.event.map(|kind| StockEvent {
            kind,
            business_id: business_id.to_string(),
            owner_id: owner_id.to_string(),
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            quantity: self.quantity_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_status_boundaries() {
        assert_eq!(derive_status(0, 1), StockStatus::OutOfStock);
        assert_eq!(derive_status(1, 1), StockStatus::Low);
        assert_eq!(derive_status(2, 1), StockStatus::InStock);
        assert_eq!(derive_status(10, 10), StockStatus::Low);
    }

    #[test]
    fn test_transition_events() {
        use StockStatus::*;
        assert_eq!(transition_event(InStock, Low), Some(StockEventKind::Low));
        assert_eq!(transition_event(Low, OutOfStock), Some(StockEventKind::OutOfStock));
        assert_eq!(transition_event(InStock, OutOfStock), Some(StockEventKind::OutOfStock));
        assert_eq!(transition_event(Low, Low), None);
        assert_eq!(transition_event(InStock, InStock), None);
    }

    #[test]
    fn test_low_then_out_scenario() {
        // quantity 5, threshold 2: sell 3 then 2
        let first = StockAdjustment::compute("p", "Milk", 5, 2, StockStatus::InStock, 3).unwrap();
        assert_eq!(first.quantity_after, 2);
        assert_eq!(first.status, StockStatus::Low);
        assert_eq!(first.event, Some(StockEventKind::Low));

        let second = StockAdjustment::compute("p", "Milk", 2, 2, first.status, 2).unwrap();
        assert_eq!(second.quantity_after, 0);
        assert_eq!(second.status, StockStatus::OutOfStock);
        assert_eq!(second.event, Some(StockEventKind::OutOfStock));
    }

    #[test]
    fn test_quiet_sale_within_low() {
        let adj = StockAdjustment::compute("p", "Milk", 2, 3, StockStatus::Low, 1).unwrap();
        assert!(!adj.status_changed());
        assert_eq!(adj.stock_event("biz", "owner"), None);
    }

    #[test]
    fn test_never_negative() {
        assert!(matches!(
            StockAdjustment::compute("p", "Milk", 1, 2, StockStatus::Low, 2),
            Err(CoreError::InsufficientStock {
                requested: 2,
                available: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_stock_event_payload() {
        let adj = StockAdjustment::compute("p", "Milk", 1, 2, StockStatus::Low, 1).unwrap();
        let event = adj.stock_event("biz", "owner").unwrap();
        assert_eq!(event.kind, StockEventKind::OutOfStock);
        assert_eq!(event.owner_id, "owner");
        assert_eq!(event.quantity, 0);
    }
}
