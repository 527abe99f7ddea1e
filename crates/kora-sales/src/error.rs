//! # Sale Engine Errors
//!
//! The single error type returned by [`crate::SaleEngine::create_sale`].
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Rejected       │  │  Domain         │  │     Storage             │ │
//! │  │  (no mutation)  │  │  (CoreError)    │  │                         │ │
//! │  │                 │  │                 │  │  StorageConflict        │ │
//! │  │  Validation     │  │  Unauthorized   │  │   (retry budget spent)  │ │
//! │  │  BusinessNot-   │  │  LineItemUnav.  │  │  Storage(DbError)       │ │
//! │  │   Found         │  │  Insufficient*  │  │                         │ │
//! │  │                 │  │  AmountExceeds  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every variant maps to one ErrorKind; the API picks a status from it.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use kora_core::{CoreError, ValidationError};
use kora_db::DbError;

/// Result type for engine operations.
pub type SaleResult<T> = Result<T, SaleError>;

/// Coarse category of a [`SaleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or inconsistent input.
    Validation,
    /// The acting user may not sell for this business.
    Unauthorized,
    /// The business does not exist.
    NotFound,
    /// Catalog state does not allow the sale right now.
    Conflict,
    /// Well-formed, but the customer cannot afford it.
    Unprocessable,
    /// Lock contention; retrying the whole call may succeed.
    Transient,
    /// Anything else.
    Internal,
}

/// Why a sale was not recorded.
///
/// In every case nothing was written.
#[derive(Debug, Error)]
pub enum SaleError {
    /// No business with this ID.
    #[error("Business not found: {0}")]
    BusinessNotFound(String),

    /// A rule of the sale domain rejected the request.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Writers kept colliding until the retry budget ran out.
    ///
    /// ## When This Occurs
    /// Many attendants selling the same products at the same instant, with
    /// the SQLite write lock held longer than the busy timeout.
    #[error("Storage conflict after {attempts} attempts: {message}")]
    StorageConflict { attempts: u32, message: String },

    /// Unexpected storage failure.
    #[error("Storage error: {0}")]
    Storage(DbError),
}

impl SaleError {
    /// Returns the category used to choose a response status.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SaleError::BusinessNotFound(_) => ErrorKind::NotFound,
            SaleError::Domain(err) => match err {
                CoreError::Validation(_) | CoreError::AmountExceedsTotal { .. } => {
                    ErrorKind::Validation
                }
                CoreError::Unauthorized { .. } => ErrorKind::Unauthorized,
                CoreError::LineItemUnavailable { .. } | CoreError::InsufficientStock { .. } => {
                    ErrorKind::Conflict
                }
                CoreError::InsufficientWalletBalance { .. } => ErrorKind::Unprocessable,
            },
            SaleError::StorageConflict { .. } => ErrorKind::Transient,
            SaleError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Returns the domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            SaleError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for SaleError {
    fn from(err: ValidationError) -> Self {
        SaleError::Domain(CoreError::Validation(err))
    }
}

impl From<DbError> for SaleError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(message) => SaleError::StorageConflict {
                attempts: 1,
                message,
            },
            other => SaleError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kora_core::CatalogKind;

    #[test]
    fn test_kinds() {
        let validation: SaleError = ValidationError::required("customerId").into();
        assert_eq!(validation.kind(), ErrorKind::Validation);

        let exceeds = SaleError::Domain(CoreError::AmountExceedsTotal {
            amount_paid: 200,
            total: 100,
        });
        assert_eq!(exceeds.kind(), ErrorKind::Validation);

        let unavailable = SaleError::Domain(CoreError::LineItemUnavailable {
            kind: CatalogKind::Product,
            catalog_id: "p1".to_string(),
        });
        assert_eq!(unavailable.kind(), ErrorKind::Conflict);

        let wallet = SaleError::Domain(CoreError::InsufficientWalletBalance {
            customer_id: "c1".to_string(),
            wallet: 1_000,
            required: 1_500,
        });
        assert_eq!(wallet.kind(), ErrorKind::Unprocessable);

        assert_eq!(
            SaleError::BusinessNotFound("b1".to_string()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_db_conflict_becomes_storage_conflict() {
        let err: SaleError = DbError::Conflict("database is locked".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Transient);

        let err: SaleError = DbError::PoolExhausted.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
