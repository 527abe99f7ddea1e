//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use kora_api::{build_router, AppState};
use kora_core::{AlertSettings, Product, StockNotification, StockStatus};
use kora_db::{Database, DbConfig};
use kora_sales::{EngineConfig, Notifier, SaleEngine};

struct Discard;

impl Notifier for Discard {
    fn enqueue(&self, _notification: StockNotification) {}
}

struct TestApp {
    router: Router,
    business_id: String,
    attendant_id: String,
    product_id: String,
}

async fn spawn_app(quantity: i64) -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let owner_id = Uuid::new_v4().to_string();
    let attendant_id = Uuid::new_v4().to_string();
    let business_id = Uuid::new_v4().to_string();
    let product_id = Uuid::new_v4().to_string();

    let businesses = db.businesses();
    businesses
        .insert_user(&owner_id, "Owner", &AlertSettings::default())
        .await
        .unwrap();
    businesses
        .insert_user(&attendant_id, "Attendant", &AlertSettings::default())
        .await
        .unwrap();
    businesses
        .insert_business(&business_id, &owner_id, "Corner Shop")
        .await
        .unwrap();
    businesses
        .set_attendant(&business_id, &attendant_id, true)
        .await
        .unwrap();

    db.catalog()
        .insert_product(&Product {
            id: product_id.clone(),
            business_id: business_id.clone(),
            name: "Rice 5kg".to_string(),
            quantity,
            low_stock_threshold: 1,
            status: StockStatus::InStock,
            cost_price: 4_000,
            selling_price: 5_500,
            sold: 0,
        })
        .await
        .unwrap();

    let engine = SaleEngine::new(
        db.clone(),
        Arc::new(Discard),
        EngineConfig::default(),
    );

    TestApp {
        router: build_router(AppState::new(engine, db)),
        business_id,
        attendant_id,
        product_id,
    }
}

fn sale_request(business_id: &str, attendant: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/businesses/{business_id}/sales"))
        .header("content-type", "application/json");
    if let Some(attendant) = attendant {
        builder = builder.header("x-attendant-id", attendant);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn cash_sale(product_id: &str, quantity: i64) -> String {
    json!({
        "method": "CASH",
        "items": [{ "catalogId": product_id, "type": "PRODUCT", "quantity": quantity }]
    })
    .to_string()
}

#[tokio::test]
async fn test_create_sale_returns_201() {
    let app = spawn_app(5).await;

    let response = app
        .router
        .oneshot(sale_request(
            &app.business_id,
            Some(&app.attendant_id),
            cash_sale(&app.product_id, 2),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["totalPrice"], 11_000);
    assert_eq!(body["balance"], 0);
    assert_eq!(body["paymentStatus"], "PAID");
    assert_eq!(body["lineItems"].as_array().unwrap().len(), 1);
    assert!(body["saleId"].as_str().is_some());
}

#[tokio::test]
async fn test_missing_attendant_header_is_401() {
    let app = spawn_app(5).await;

    let response = app
        .router
        .oneshot(sale_request(&app.business_id, None, cash_sale(&app.product_id, 1)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = spawn_app(5).await;

    let response = app
        .router
        .oneshot(sale_request(
            &app.business_id,
            Some(&app.attendant_id),
            r#"{"method":"BARTER","items":[]}"#.to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "INVALID_BODY");
}

#[tokio::test]
async fn test_duplicate_line_is_400() {
    let app = spawn_app(5).await;
    let body = json!({
        "method": "CASH",
        "items": [
            { "catalogId": app.product_id, "type": "PRODUCT", "quantity": 1 },
            { "catalogId": app.product_id, "type": "PRODUCT", "quantity": 1 }
        ]
    })
    .to_string();

    let response = app
        .router
        .oneshot(sale_request(&app.business_id, Some(&app.attendant_id), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_insufficient_stock_is_409() {
    let app = spawn_app(1).await;

    let response = app
        .router
        .oneshot(sale_request(
            &app.business_id,
            Some(&app.attendant_id),
            cash_sale(&app.product_id, 3),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["code"], "INSUFFICIENT_STOCK");
}

#[tokio::test]
async fn test_unknown_business_is_404() {
    let app = spawn_app(5).await;
    let unknown = Uuid::new_v4().to_string();

    let response = app
        .router
        .oneshot(sale_request(
            &unknown,
            Some(&app.attendant_id),
            cash_sale(&app.product_id, 1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["code"], "BUSINESS_NOT_FOUND");
}

#[tokio::test]
async fn test_stranger_is_401() {
    let app = spawn_app(5).await;
    let stranger = Uuid::new_v4().to_string();

    let response = app
        .router
        .oneshot(sale_request(
            &app.business_id,
            Some(&stranger),
            cash_sale(&app.product_id, 1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app(5).await;

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}
