//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use kora_core::{CreateSaleRequest, PaymentStatus, RecordedSale, SaleLineItem};

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the acting user's ID.
pub const ATTENDANT_HEADER: &str = "x-attendant-id";

/// Body of a successful `POST /businesses/{business_id}/sales`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleResponse {
    pub sale_id: String,
    pub total_price: i64,
    pub balance: i64,
    pub payment_status: PaymentStatus,
    pub line_items: Vec<SaleLineItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl From<RecordedSale> for CreateSaleResponse {
    fn from(recorded: RecordedSale) -> Self {
        CreateSaleResponse {
            sale_id: recorded.sale.id,
            total_price: recorded.sale.total_price,
            balance: recorded.sale.balance,
            payment_status: recorded.sale.payment_status,
            line_items: recorded.line_items,
            created_at: recorded.sale.created_at,
        }
    }
}

/// `POST /businesses/{business_id}/sales`
pub async fn create_sale(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<CreateSaleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateSaleResponse>), ApiError> {
    let attendant_id = headers
        .get(ATTENDANT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::unauthorized(format!("{ATTENDANT_HEADER} header is required")))?;

    let Json(request) = body.map_err(|rejection| ApiError::invalid_body(rejection.body_text()))?;

    debug!(business_id = %business_id, attendant_id = %attendant_id, "CreateSale received");

    let recorded = state
        .engine
        .create_sale(&business_id, attendant_id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(recorded.into())))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.db.health_check().await {
        (StatusCode::OK, Json(HealthResponse { status: "ok" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
            }),
        )
    }
}
