//! # Validation Module
//!
//! Input validation utilities for the sale pipeline.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (kora-api)                                              │
//! │  └── Type validation (JSON deserialization, enum values)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request shape (kora-core)                                    │
//! │  ├── THIS MODULE: field-level rules                                    │
//! │  └── request.rs: cart-level rules (duplicates, defaults)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Sale rules (pricing, payment, inventory)                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kora_core::validation::{validate_cart_size, validate_quantity};
//!
//! assert!(validate_quantity("quantity", 5).is_ok());
//! assert!(validate_cart_size(0).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_DESCRIPTION_LEN, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use kora_core::validation::validate_uuid;
///
/// assert!(validate_uuid("customerId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("customerId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a non-negative amount in minor units (unit price, discount).
///
/// ## Example
/// ```rust
/// use kora_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("unitPrice", 1099).is_ok());
/// assert!(validate_non_negative("unitPrice", 0).is_ok());
/// assert!(validate_non_negative("unitPrice", -100).is_err());
/// ```
pub fn validate_non_negative(field: &str, minor: i64) -> ValidationResult<()> {
    if minor < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates the amount collected on a PARTIAL sale.
///
/// Checking it against the total happens later, once the cart is priced.
pub fn validate_payment_amount(minor: i64) -> ValidationResult<()> {
    if minor <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amountPaid".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines in a cart.
///
/// ## Rules
/// - At least one line
/// - At most MAX_CART_ITEMS (100)
pub fn validate_cart_size(lines: usize) -> ValidationResult<()> {
    if lines == 0 {
        return Err(ValidationError::required("items"));
    }

    if lines > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Text & Date Validators
// =============================================================================

/// Validates an optional free-text description.
///
/// ## Returns
/// The trimmed description, or `None` when blank.
pub fn validate_description(description: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(text) = description.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if text.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(Some(text.to_string()))
}

/// Validates that a due date lies strictly after `today`.
pub fn validate_due_date(due_date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if due_date <= today {
        return Err(ValidationError::MustBeFuture {
            field: "dueDate".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
