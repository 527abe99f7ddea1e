//! HTTP error responses.
//!
//! Every failure leaves the server as `{ "code": ..., "message": ... }` with
//! a status chosen from the engine's [`ErrorKind`].
//!
//! ```text
//! ValidationError / AmountExceedsTotal     → 400
//! Unauthorized / missing x-attendant-id    → 401
//! BusinessNotFound                         → 404
//! LineItemUnavailable / InsufficientStock  → 409
//! InsufficientWalletBalance                → 422
//! storage failure                          → 500
//! StorageConflict (retry the call)         → 503
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use kora_core::CoreError;
use kora_sales::{ErrorKind, SaleError};

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidBody,
    ValidationError,
    AmountExceedsTotal,
    Unauthorized,
    BusinessNotFound,
    LineItemUnavailable,
    InsufficientStock,
    InsufficientWalletBalance,
    StorageConflict,
    InternalError,
}

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: ErrorCode,
    message: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidBody, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, message)
    }
}

impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        let status = match err.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let code = match &err {
            SaleError::BusinessNotFound(_) => ErrorCode::BusinessNotFound,
            SaleError::StorageConflict { .. } => ErrorCode::StorageConflict,
            SaleError::Storage(_) => ErrorCode::InternalError,
            SaleError::Domain(core) => match core {
                CoreError::Validation(_) => ErrorCode::ValidationError,
                CoreError::AmountExceedsTotal { .. } => ErrorCode::AmountExceedsTotal,
                CoreError::Unauthorized { .. } => ErrorCode::Unauthorized,
                CoreError::LineItemUnavailable { .. } => ErrorCode::LineItemUnavailable,
                CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
                CoreError::InsufficientWalletBalance { .. } => {
                    ErrorCode::InsufficientWalletBalance
                }
            },
        };

        // Storage details stay in the log.
        let message = match &err {
            SaleError::Storage(db_err) => {
                error!(error = %db_err, "Sale failed on storage error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        ApiError::new(status, code, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kora_core::ValidationError;
    use kora_db::DbError;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = SaleError::from(ValidationError::required("items")).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: ApiError = SaleError::Domain(CoreError::InsufficientStock {
            product_id: "p1".to_string(),
            requested: 2,
            available: 1,
        })
        .into();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err: ApiError = SaleError::StorageConflict {
            attempts: 5,
            message: "database is locked".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_storage_error_is_opaque() {
        let err: ApiError =
            SaleError::from(DbError::QueryFailed("no such table: sales".to_string())).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_code_wire_format() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::InsufficientWalletBalance).unwrap(),
            "\"INSUFFICIENT_WALLET_BALANCE\""
        );
    }
}
