//! # CreateSale Request
//!
//! The wire shape of a CreateSale call and its first validation pass.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON body                                                              │
//! │      │ serde (camelCase, UPPERCASE enums)                               │
//! │      ▼                                                                  │
//! │  CreateSaleRequest ── validate(today) ──► ValidatedSale                │
//! │                          │                  ├── PaymentInput           │
//! │                          │                  └── Vec<LineSpec>          │
//! │                          ▼                                              │
//! │                   ValidationError (no lookups performed yet)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches the catalog or the customer table; checks that
//! need stored data happen in [`crate::pricing`] and [`crate::payment`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::payment::{PaymentFields, PaymentInput};
use crate::types::{CatalogKind, CatalogRef, PartialMethod, PaymentMethod};
use crate::validation::{
    validate_cart_size, validate_description, validate_due_date, validate_non_negative,
    validate_quantity, validate_uuid, ValidationResult,
};

// =============================================================================
// Wire Types
// =============================================================================

/// Body of `POST /businesses/{business_id}/sales`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    /// Sale date; defaults to today.
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub bank_id: Option<String>,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    pub method: PaymentMethod,
    #[serde(default)]
    pub amount_paid: Option<i64>,
    #[serde(default)]
    pub partial_method: Option<PartialMethod>,
    pub items: Vec<LineRequest>,
}

/// One requested cart line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub catalog_id: String,
    #[serde(rename = "type", default)]
    pub kind: CatalogKind,
    /// Overrides the catalog selling price when present.
    #[serde(default)]
    pub unit_price: Option<i64>,
    /// Required for products; services default to 1.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Products only.
    #[serde(default)]
    pub discount: Option<i64>,
}

// =============================================================================
// Validated Types
// =============================================================================

/// A cart line whose shape has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSpec {
    Product {
        product_id: String,
        unit_price: Option<Money>,
        quantity: i64,
        discount: Money,
    },
    Service {
        service_id: String,
        unit_price: Option<Money>,
        quantity: i64,
    },
}

impl LineSpec {
    pub fn catalog_ref(&self) -> CatalogRef {
        match self {
            LineSpec::Product { product_id, .. } => CatalogRef::product(product_id.clone()),
            LineSpec::Service { service_id, .. } => CatalogRef::service(service_id.clone()),
        }
    }

    pub fn catalog_id(&self) -> &str {
        match self {
            LineSpec::Product { product_id, .. } => product_id,
            LineSpec::Service { service_id, .. } => service_id,
        }
    }
}

/// A request that passed every check not requiring stored data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSale {
    pub date: NaiveDate,
    pub customer_id: Option<String>,
    pub bank_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub payment: PaymentInput,
    pub lines: Vec<LineSpec>,
}

impl ValidatedSale {
    /// Catalog lookups needed to price this cart, in cart order.
    pub fn catalog_refs(&self) -> Vec<CatalogRef> {
        self.lines.iter().map(LineSpec::catalog_ref).collect()
    }
}

// =============================================================================
// Validation
// =============================================================================

impl CreateSaleRequest {
    /// Checks the request shape and normalises defaults.
    ///
    /// ## Rules
    /// - 1..=100 lines, no catalog ID twice (regardless of type)
    /// - product lines carry a positive quantity; services default to 1
    /// - prices and discounts are non-negative; services take no discount
    /// - referenced IDs are UUIDs
    /// - any due date lies after `today`
    /// - method-specific fields per [`crate::payment::check_fields`]
    pub fn validate(&self, today: NaiveDate) -> ValidationResult<ValidatedSale> {
        validate_cart_size(self.items.len())?;

        let mut seen = HashSet::with_capacity(self.items.len());
        let mut lines = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let spec = item.validate(index)?;
            if !seen.insert(spec.catalog_id().to_string()) {
                return Err(ValidationError::Duplicate {
                    field: "catalogId".to_string(),
                    value: spec.catalog_id().to_string(),
                });
            }
            lines.push(spec);
        }

        if let Some(customer_id) = &self.customer_id {
            validate_uuid("customerId", customer_id)?;
        }
        if let Some(bank_id) = &self.bank_id {
            validate_uuid("bankId", bank_id)?;
        }
        if let Some(due_date) = self.due_date {
            validate_due_date(due_date, today)?;
        }
        let description = validate_description(self.description.as_deref())?;

        let payment = crate::payment::check_fields(&PaymentFields {
            method: self.method,
            amount_paid: self.amount_paid,
            partial_method: self.partial_method,
            has_customer: self.customer_id.is_some(),
            has_bank: self.bank_id.is_some(),
            has_due_date: self.due_date.is_some(),
        })?;

        Ok(ValidatedSale {
            date: self.date.unwrap_or(today),
            customer_id: self.customer_id.clone(),
            bank_id: self.bank_id.clone(),
            due_date: self.due_date,
            description,
            payment,
            lines,
        })
    }
}

impl LineRequest {
    fn validate(&self, index: usize) -> ValidationResult<LineSpec> {
        let field = |name: &str| format!("items[{index}].{name}");

        validate_uuid(&field("catalogId"), &self.catalog_id)?;
        if let Some(unit_price) = self.unit_price {
            validate_non_negative(&field("unitPrice"), unit_price)?;
        }
        let unit_price = self.unit_price.map(Money::from_minor);

        match self.kind {
            CatalogKind::Product => {
                let quantity = self
                    .quantity
                    .ok_or_else(|| ValidationError::required(&field("quantity")))?;
                validate_quantity(&field("quantity"), quantity)?;

                let discount = self.discount.unwrap_or(0);
                validate_non_negative(&field("discount"), discount)?;

                Ok(LineSpec::Product {
                    product_id: self.catalog_id.clone(),
                    unit_price,
                    quantity,
                    discount: Money::from_minor(discount),
                })
            }
            CatalogKind::Service => {
                let quantity = self.quantity.unwrap_or(1);
                validate_quantity(&field("quantity"), quantity)?;

                if self.discount.is_some_and(|d| d != 0) {
                    return Err(ValidationError::NotAllowed {
                        field: field("discount"),
                        reason: "services take no discount".to_string(),
                    });
                }

                Ok(LineSpec::Service {
                    service_id: self.catalog_id.clone(),
                    unit_price,
                    quantity,
                })
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_A: &str = "6f1c1a52-3a7e-4d43-9b8e-3f0c0f4e1a01";
    const SERVICE_B: &str = "6f1c1a52-3a7e-4d43-9b8e-3f0c0f4e1a02";
    const CUSTOMER: &str = "6f1c1a52-3a7e-4d43-9b8e-3f0c0f4e1a03";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    fn parse(json: serde_json::Value) -> CreateSaleRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_defaults_from_wire() {
        let request = parse(serde_json::json!({
            "method": "CASH",
            "items": [
                { "catalogId": PRODUCT_A, "quantity": 2 },
                { "catalogId": SERVICE_B, "type": "SERVICE" }
            ]
        }));

        let sale = request.validate(today()).unwrap();
        assert_eq!(sale.date, today());
        assert_eq!(sale.payment, PaymentInput::Cash);
        assert_eq!(
            sale.lines,
            vec![
                LineSpec::Product {
                    product_id: PRODUCT_A.to_string(),
                    unit_price: None,
                    quantity: 2,
                    discount: Money::zero(),
                },
                LineSpec::Service {
                    service_id: SERVICE_B.to_string(),
                    unit_price: None,
                    quantity: 1,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_catalog_id_rejected_across_types() {
        let request = parse(serde_json::json!({
            "method": "CASH",
            "items": [
                { "catalogId": PRODUCT_A, "quantity": 1 },
                { "catalogId": PRODUCT_A, "type": "SERVICE" }
            ]
        }));

        assert!(matches!(
            request.validate(today()),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_product_line_requires_quantity() {
        let request = parse(serde_json::json!({
            "method": "CASH",
            "items": [{ "catalogId": PRODUCT_A, "type": "PRODUCT" }]
        }));

        assert_eq!(
            request.validate(today()),
            Err(ValidationError::required("items[0].quantity"))
        );
    }

    #[test]
    fn test_service_discount_not_allowed() {
        let request = parse(serde_json::json!({
            "method": "CASH",
            "items": [{ "catalogId": SERVICE_B, "type": "SERVICE", "discount": 50 }]
        }));

        assert!(matches!(
            request.validate(today()),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_due_date_must_be_future() {
        let request = parse(serde_json::json!({
            "method": "CREDIT",
            "customerId": CUSTOMER,
            "dueDate": "2026-05-01",
            "items": [{ "catalogId": PRODUCT_A, "quantity": 1 }]
        }));

        assert_eq!(
            request.validate(today()),
            Err(ValidationError::MustBeFuture {
                field: "dueDate".to_string()
            })
        );
    }

    #[test]
    fn test_empty_cart_rejected() {
        let request = parse(serde_json::json!({ "method": "CASH", "items": [] }));
        assert!(request.validate(today()).is_err());
    }

    #[test]
    fn test_catalog_id_must_be_uuid() {
        let request = parse(serde_json::json!({
            "method": "CASH",
            "items": [{ "catalogId": "coke", "quantity": 1 }]
        }));

        assert!(matches!(
            request.validate(today()),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
