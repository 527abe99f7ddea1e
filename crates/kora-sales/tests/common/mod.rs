//! Shared fixture for sale engine integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use kora_core::{
    AlertSettings, BankAccount, CreateSaleRequest, Customer, Product, Service, StockNotification,
    StockStatus,
};
use kora_db::{Database, DbConfig};
use kora_sales::{EngineConfig, Notifier, SaleEngine};

/// Notifier that keeps everything it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<StockNotification>>,
}

impl Notifier for RecordingNotifier {
    fn enqueue(&self, notification: StockNotification) {
        self.sent.lock().unwrap().push(notification);
    }
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<StockNotification> {
        self.sent.lock().unwrap().clone()
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

pub fn next_week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 17).unwrap()
}

pub struct Fixture {
    pub db: Database,
    pub engine: SaleEngine,
    pub notifier: Arc<RecordingNotifier>,
    pub business_id: String,
    pub owner_id: String,
    pub attendant_id: String,
    pub bank_id: String,
}

impl Fixture {
    /// In-memory database, owner with both alerts and a push token.
    pub async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Self::with_db(db, alerts_on()).await
    }

    pub async fn with_alerts(alerts: AlertSettings) -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Self::with_db(db, alerts).await
    }

    pub async fn with_db(db: Database, alerts: AlertSettings) -> Self {
        let owner_id = Uuid::new_v4().to_string();
        let attendant_id = Uuid::new_v4().to_string();
        let business_id = Uuid::new_v4().to_string();
        let bank_id = Uuid::new_v4().to_string();

        let businesses = db.businesses();
        businesses.insert_user(&owner_id, "Owner", &alerts).await.unwrap();
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
        businesses
            .insert_bank(&BankAccount {
                id: bank_id.clone(),
                business_id: business_id.clone(),
                bank_name: "Test Bank".to_string(),
                account_name: "Corner Shop".to_string(),
                account_number: "0000000001".to_string(),
            })
            .await
            .unwrap();

        let notifier = Arc::new(RecordingNotifier::default());
        let engine = SaleEngine::new(db.clone(), notifier.clone(), EngineConfig::default());

        Fixture {
            db,
            engine,
            notifier,
            business_id,
            owner_id,
            attendant_id,
            bank_id,
        }
    }

    pub async fn product(&self, quantity: i64, threshold: i64, cost: i64, price: i64) -> String {
        let id = Uuid::new_v4().to_string();
        self.db
            .catalog()
            .insert_product(&Product {
                id: id.clone(),
                business_id: self.business_id.clone(),
                name: format!("Product {}", &id[..8]),
                quantity,
                low_stock_threshold: threshold,
                status: StockStatus::InStock,
                cost_price: cost,
                selling_price: price,
                sold: 0,
            })
            .await
            .unwrap();
        id
    }

    pub async fn service(&self, price: i64) -> String {
        let id = Uuid::new_v4().to_string();
        self.db
            .catalog()
            .insert_service(&Service {
                id: id.clone(),
                business_id: self.business_id.clone(),
                name: "Delivery".to_string(),
                selling_price: price,
            })
            .await
            .unwrap();
        id
    }

    pub async fn customer(&self, wallet: i64) -> String {
        let id = Uuid::new_v4().to_string();
        self.db
            .customers()
            .insert(&Customer {
                id: id.clone(),
                business_id: self.business_id.clone(),
                name: "Ada".to_string(),
                wallet,
                purchase_value: 0,
                last_sale_on: None,
            })
            .await
            .unwrap();
        id
    }

    pub async fn product_row(&self, id: &str) -> Product {
        self.db
            .catalog()
            .get_product(&self.business_id, id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn customer_row(&self, id: &str) -> Customer {
        self.db
            .customers()
            .get(&self.business_id, id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn sale_count(&self) -> i64 {
        self.db
            .sales()
            .count_for_business(&self.business_id)
            .await
            .unwrap()
    }

    /// Sells as the attendant, with the fixed test date as today.
    pub async fn sell(
        &self,
        request: &CreateSaleRequest,
    ) -> Result<kora_core::RecordedSale, kora_sales::SaleError> {
        self.engine
            .create_sale_on(&self.business_id, &self.attendant_id, request, today())
            .await
    }
}

pub fn alerts_on() -> AlertSettings {
    AlertSettings {
        low_stock: true,
        out_of_stock: true,
        push_token: Some("device-token".to_string()),
    }
}

/// Builds a request from a JSON body, the way the API would receive it.
pub fn request(body: Value) -> CreateSaleRequest {
    serde_json::from_value(body).unwrap()
}
