//! # Error Types
//!
//! Domain-specific error types for kora-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kora-core errors (this file)                                          │
//! │  ├── CoreError        - Sale rule violations                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kora-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kora-sales errors (separate crate)                                    │
//! │  └── SaleError        - What CreateSale returns                        │
//! │                                                                         │
//! │  kora-api errors (app)                                                 │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SaleError → ApiError → Client     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product ID, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every variant is raised before any mutation, except the stock and
//!    wallet variants which the unit of work may also raise at commit time

use thiserror::Error;

use crate::types::CatalogKind;

// =============================================================================
// Core Error
// =============================================================================

/// Sale rule violations.
///
/// These errors represent business rule failures discovered while planning
/// or committing a sale. None of them leave partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Acting user is neither the owner nor an attendant of the business.
    #[error("User {user_id} is not allowed to record sales for business {business_id}")]
    Unauthorized {
        user_id: String,
        business_id: String,
    },

    /// Catalog entry cannot be sold.
    ///
    /// ## When This Occurs
    /// - The ID does not exist in this business's catalog
    /// - The ID belongs to another business
    /// - The product is already OUT-OF-STOCK
    #[error("{kind} {catalog_id} is not available")]
    LineItemUnavailable {
        kind: CatalogKind,
        catalog_id: String,
    },

    /// Requested quantity exceeds what is on the shelf.
    ///
    /// ## When This Occurs
    /// ```text
    /// Catalog snapshot: quantity=3
    ///      │
    ///      ├──► requested 5 ──► InsufficientStock (pre-check)
    ///      │
    ///      └──► requested 2, but a concurrent sale took 2 first
    ///                │
    ///                ▼
    ///           guarded UPDATE matches 0 rows
    ///                │
    ///                ▼
    ///           InsufficientStock (authoritative, rolled back)
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    /// ADVANCE sale against a wallet that cannot cover the total.
    #[error("Wallet of customer {customer_id} holds {wallet}, sale requires {required}")]
    InsufficientWalletBalance {
        customer_id: String,
        wallet: i64,
        required: i64,
    },

    /// PARTIAL sale paying more than the cart is worth.
    #[error("Amount paid {amount_paid} exceeds sale total {total}")]
    AmountExceedsTotal { amount_paid: i64, total: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when the request itself is malformed or is missing
/// a field its payment method requires.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be strictly below a limit.
    #[error("{field} must be less than {limit}")]
    MustBeLessThan { field: String, limit: i64 },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Field is set where the payment method does not accept it.
    #[error("{field} is not allowed: {reason}")]
    NotAllowed { field: String, reason: String },

    /// Same value appears twice (e.g., duplicate catalog ID in one cart).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// Referenced record does not exist in this business.
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    /// Date must be after today.
    #[error("{field} must be a future date")]
    MustBeFuture { field: String },
}

impl ValidationError {
    /// Shorthand for `Required`.
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    /// Shorthand for `NotFound`.
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        ValidationError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            requested: 5,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product p-1: available 3, requested 5"
        );

        let err = CoreError::LineItemUnavailable {
            kind: CatalogKind::Service,
            catalog_id: "s-9".to_string(),
        };
        assert_eq!(err.to_string(), "SERVICE s-9 is not available");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("customerId").to_string(),
            "customerId is required"
        );
        assert_eq!(
            ValidationError::not_found("bank", "b-1").to_string(),
            "bank b-1 not found"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("items").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
