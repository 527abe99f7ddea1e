//! # Pricing Calculator
//!
//! Turns validated cart lines plus catalog records into priced lines and a
//! total. Pure; the only inputs are the arguments.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductLine                                                            │
//! │    unit  = override ?? selling_price                                    │
//! │    gross = unit × quantity                                              │
//! │    price = gross − discount            (discount < gross when > 0)      │
//! │    profit = price − cost_price × quantity                               │
//! │                                                                         │
//! │  ServiceLine                                                            │
//! │    unit  = override ?? selling_price                                    │
//! │    price = unit × quantity             (no profit)                      │
//! │                                                                         │
//! │  total = Σ price                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::request::LineSpec;
use crate::types::{
    CatalogEntry, CatalogKind, CatalogRef, Product, ProductLine, SaleLineItem, Service,
    ServiceLine, StockStatus,
};

// =============================================================================
// Priced Lines
// =============================================================================

/// A product line with its amounts worked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedProduct {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub discount: Money,
    pub price: Money,
    pub profit: Money,
    /// Catalog quantity seen when pricing; the commit re-checks the live row.
    pub available: i64,
}

/// A service line with its amounts worked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedService {
    pub service_id: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricedLine {
    Product(PricedProduct),
    Service(PricedService),
}

impl PricedLine {
    pub fn price(&self) -> Money {
        match self {
            PricedLine::Product(p) => p.price,
            PricedLine::Service(s) => s.price,
        }
    }

    /// Freezes the line into the ledger row stored with the sale.
    pub fn into_line_item(self, id: String, sale_id: String) -> SaleLineItem {
        match self {
            PricedLine::Product(p) => SaleLineItem::Product(ProductLine {
                id,
                sale_id,
                product_id: p.product_id,
                unit_price: p.unit_price.minor(),
                quantity: p.quantity,
                discount: p.discount.minor(),
                price: p.price.minor(),
                profit: p.profit.minor(),
            }),
            PricedLine::Service(s) => SaleLineItem::Service(ServiceLine {
                id,
                sale_id,
                service_id: s.service_id,
                unit_price: s.unit_price.minor(),
                quantity: s.quantity,
                price: s.price.minor(),
            }),
        }
    }
}

/// All lines of a cart, in cart order, and their total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

impl PricedCart {
    /// Product lines only, for the inventory pass.
    pub fn products(&self) -> impl Iterator<Item = &PricedProduct> {
        self.lines.iter().filter_map(|line| match line {
            PricedLine::Product(p) => Some(p),
            PricedLine::Service(_) => None,
        })
    }
}

// =============================================================================
// Pricing
// =============================================================================

fn overflow(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

/// Prices a product line against its catalog record.
///
/// ## Errors
/// - `InsufficientStock` when `quantity > product.quantity`
/// - `Validation(MustBeLessThan)` when a discount swallows the whole line
pub fn price_product(
    product: &Product,
    unit_price: Option<Money>,
    quantity: i64,
    discount: Money,
) -> CoreResult<PricedProduct> {
    if quantity > product.quantity {
        return Err(CoreError::InsufficientStock {
            product_id: product.id.clone(),
            requested: quantity,
            available: product.quantity,
        });
    }

    let unit_price = unit_price.unwrap_or_else(|| product.price());
    let gross = unit_price
        .checked_times(quantity)
        .ok_or_else(|| overflow("price"))?;

    if discount.is_positive() && discount >= gross {
        return Err(ValidationError::MustBeLessThan {
            field: "discount".to_string(),
            limit: gross.minor(),
        }
        .into());
    }

    let price = gross - discount;
    let cost = product
        .cost()
        .checked_times(quantity)
        .ok_or_else(|| overflow("costPrice"))?;

    Ok(PricedProduct {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        unit_price,
        quantity,
        discount,
        price,
        profit: price - cost,
        available: product.quantity,
    })
}

/// Prices a service line against its catalog record.
pub fn price_service(
    service: &Service,
    unit_price: Option<Money>,
    quantity: i64,
) -> CoreResult<PricedService> {
    let unit_price = unit_price.unwrap_or_else(|| service.price());
    let price = unit_price
        .checked_times(quantity)
        .ok_or_else(|| overflow("price"))?;

    Ok(PricedService {
        service_id: service.id.clone(),
        unit_price,
        quantity,
        price,
    })
}

/// Prices one line, matching the requested kind to the catalog variant.
pub fn price_line(spec: &LineSpec, entry: &CatalogEntry) -> CoreResult<PricedLine> {
    match (spec, entry) {
        (
            LineSpec::Product {
                unit_price,
                quantity,
                discount,
                ..
            },
            CatalogEntry::Product(product),
        ) => {
            if product.status == StockStatus::OutOfStock {
                return Err(unavailable(spec));
            }
            price_product(product, *unit_price, *quantity, *discount).map(PricedLine::Product)
        }
        (
            LineSpec::Service {
                unit_price,
                quantity,
                ..
            },
            CatalogEntry::Service(service),
        ) => price_service(service, *unit_price, *quantity).map(PricedLine::Service),
        _ => Err(unavailable(spec)),
    }
}

fn unavailable(spec: &LineSpec) -> CoreError {
    let CatalogRef { kind, id } = spec.catalog_ref();
    CoreError::LineItemUnavailable {
        kind,
        catalog_id: id,
    }
}

/// Prices a whole cart.
///
/// Every line must have a matching entry in `entries`; a missing one is
/// `LineItemUnavailable`. The first failing line aborts the cart.
///
/// ## Example
/// ```rust
/// use kora_core::pricing::price_cart;
/// use kora_core::request::LineSpec;
/// use kora_core::{CatalogEntry, Money, Service};
///
/// let haircut = Service {
///     id: "svc-1".to_string(),
///     business_id: "biz-1".to_string(),
///     name: "Haircut".to_string(),
///     selling_price: 2_000,
/// };
/// let lines = vec![LineSpec::Service {
///     service_id: "svc-1".to_string(),
///     unit_price: None,
///     quantity: 2,
/// }];
///
/// let cart = price_cart(&lines, &[CatalogEntry::Service(haircut)]).unwrap();
/// assert_eq!(cart.total, Money::from_minor(4_000));
/// ```
pub fn price_cart(lines: &[LineSpec], entries: &[CatalogEntry]) -> CoreResult<PricedCart> {
    let by_ref: HashMap<(CatalogKind, &str), &CatalogEntry> = entries
        .iter()
        .map(|entry| ((entry.kind(), entry.id()), entry))
        .collect();

    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Money::zero();
    for spec in lines {
        let kind = match spec {
            LineSpec::Product { .. } => CatalogKind::Product,
            LineSpec::Service { .. } => CatalogKind::Service,
        };
        let entry = by_ref
            .get(&(kind, spec.catalog_id()))
            .ok_or_else(|| unavailable(spec))?;

        let line = price_line(spec, entry)?;
        total = total
            .checked_add(line.price())
            .ok_or_else(|| overflow("totalPrice"))?;
        priced.push(line);
    }

    Ok(PricedCart {
        lines: priced,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i64) -> Product {
        Product {
            id: "prod-1".to_string(),
            business_id: "biz-1".to_string(),
            name: "Rice 5kg".to_string(),
            quantity,
            low_stock_threshold: 2,
            status: crate::inventory::derive_status(quantity, 2),
            cost_price: 700,
            selling_price: 1_000,
            sold: 0,
        }
    }

    fn service() -> Service {
        Service {
            id: "svc-1".to_string(),
            business_id: "biz-1".to_string(),
            name: "Delivery".to_string(),
            selling_price: 300,
        }
    }

    fn product_spec(quantity: i64, discount: i64) -> LineSpec {
        LineSpec::Product {
            product_id: "prod-1".to_string(),
            unit_price: None,
            quantity,
            discount: Money::from_minor(discount),
        }
    }

    #[test]
    fn test_product_price_and_profit() {
        let line = price_product(&product(10), None, 3, Money::from_minor(500)).unwrap();

        assert_eq!(line.unit_price, Money::from_minor(1_000));
        assert_eq!(line.price, Money::from_minor(2_500));
        // 2500 - 700 * 3
        assert_eq!(line.profit, Money::from_minor(400));
    }

    #[test]
    fn test_unit_price_override() {
        let line = price_product(&product(10), Some(Money::from_minor(900)), 2, Money::zero()).unwrap();
        assert_eq!(line.price, Money::from_minor(1_800));
    }

    #[test]
    fn test_discount_must_be_below_gross() {
        let result = price_product(&product(10), None, 1, Money::from_minor(1_000));
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::MustBeLessThan { limit: 1_000, .. }))
        ));
    }

    #[test]
    fn test_insufficient_stock_on_snapshot() {
        assert_eq!(
            price_product(&product(2), None, 3, Money::zero()),
            Err(CoreError::InsufficientStock {
                product_id: "prod-1".to_string(),
                requested: 3,
                available: 2,
            })
        );
    }

    #[test]
    fn test_cart_total_is_sum_of_lines() {
        let lines = vec![
            product_spec(2, 150),
            LineSpec::Service {
                service_id: "svc-1".to_string(),
                unit_price: None,
                quantity: 3,
            },
        ];
        let entries = vec![
            CatalogEntry::Service(service()),
            CatalogEntry::Product(product(5)),
        ];

        let cart = price_cart(&lines, &entries).unwrap();
        let sum: Money = cart.lines.iter().map(PricedLine::price).sum();

        assert_eq!(cart.total, Money::from_minor(1_850 + 900));
        assert_eq!(cart.total, sum);
        assert_eq!(cart.products().count(), 1);
    }

    #[test]
    fn test_missing_or_mismatched_entry_is_unavailable() {
        let lines = vec![product_spec(1, 0)];

        assert!(matches!(
            price_cart(&lines, &[]),
            Err(CoreError::LineItemUnavailable { .. })
        ));

        let wrong_kind = Service {
            id: "prod-1".to_string(),
            ..service()
        };
        assert!(matches!(
            price_cart(&lines, &[CatalogEntry::Service(wrong_kind)]),
            Err(CoreError::LineItemUnavailable { .. })
        ));
    }

    #[test]
    fn test_out_of_stock_is_unavailable() {
        assert!(matches!(
            price_line(&product_spec(1, 0), &CatalogEntry::Product(product(0))),
            Err(CoreError::LineItemUnavailable {
                kind: CatalogKind::Product,
                ..
            })
        ));
    }

    #[test]
    fn test_frozen_line_item() {
        let line = price_line(&product_spec(2, 0), &CatalogEntry::Product(product(5))).unwrap();
        let item = line.into_line_item("line-1".to_string(), "sale-1".to_string());

        match item {
            SaleLineItem::Product(p) => {
                assert_eq!(p.price, 2_000);
                assert_eq!(p.profit, 600);
                assert_eq!(p.sale_id, "sale-1");
            }
            SaleLineItem::Service(_) => panic!("expected a product line"),
        }
    }
}
