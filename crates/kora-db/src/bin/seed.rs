//! # Seed Data Generator
//!
//! Populates a database with one demo business for local development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kora_dev.db
//! cargo run -p kora-db --bin seed
//!
//! # Specify database path
//! cargo run -p kora-db --bin seed -- --db ./data/kora.db
//! ```
//!
//! ## Generated Data
//! - An owner (alerts on, push token set) and one attendant
//! - A business with one bank account
//! - Products across stock states (IN-STOCK, LOW, OUT-OF-STOCK)
//! - A few services
//! - Customers with positive, zero and negative wallets
//!
//! IDs are printed so they can be pasted into requests.

use kora_core::{AlertSettings, BankAccount, Customer, Product, Service, StockStatus};
use kora_db::{Database, DbConfig};
use std::env;
use uuid::Uuid;

/// (name, quantity, low_stock_threshold, cost_price, selling_price)
const PRODUCTS: &[(&str, i64, i64, i64, i64)] = &[
    ("Rice 5kg", 40, 5, 3_500, 4_200),
    ("Vegetable Oil 1L", 12, 3, 1_100, 1_450),
    ("Sugar 1kg", 3, 5, 600, 800),
    ("Tomato Paste", 1, 2, 150, 250),
    ("Bottled Water 75cl", 120, 20, 60, 100),
    ("Sardines", 0, 4, 300, 450),
];

/// (name, selling_price)
const SERVICES: &[(&str, i64)] = &[
    ("Home Delivery", 500),
    ("Gift Wrapping", 200),
    ("Bulk Packing", 350),
];

/// (name, wallet)
const CUSTOMERS: &[(&str, i64)] = &[
    ("Ada Okafor", 20_000),
    ("Bola Ade", 0),
    ("Chidi Eze", -4_500),
];

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = "./kora_dev.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kora POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kora_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kora POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Users & business
    let owner_id = new_id();
    let attendant_id = new_id();
    let business_id = new_id();

    let businesses = db.businesses();
    businesses
        .insert_user(
            &owner_id,
            "Demo Owner",
            &AlertSettings {
                low_stock: true,
                out_of_stock: true,
                push_token: Some("ExponentPushToken[demo-device]".to_string()),
            },
        )
        .await?;
    businesses
        .insert_user(&attendant_id, "Demo Attendant", &AlertSettings::default())
        .await?;
    businesses
        .insert_business(&business_id, &owner_id, "Demo Provisions Store")
        .await?;
    businesses.set_attendant(&business_id, &attendant_id, true).await?;

    let bank = BankAccount {
        id: new_id(),
        business_id: business_id.clone(),
        bank_name: "First Demo Bank".to_string(),
        account_name: "Demo Provisions Store".to_string(),
        account_number: "0123456789".to_string(),
    };
    businesses.insert_bank(&bank).await?;

    println!();
    println!("Business:  {}", business_id);
    println!("Owner:     {}", owner_id);
    println!("Attendant: {}", attendant_id);
    println!("Bank:      {}", bank.id);

    // Catalog
    println!();
    println!("Products:");
    let catalog = db.catalog();
    for (name, quantity, threshold, cost, price) in PRODUCTS {
        let product = catalog
            .insert_product(&Product {
                id: new_id(),
                business_id: business_id.clone(),
                name: name.to_string(),
                quantity: *quantity,
                low_stock_threshold: *threshold,
                status: StockStatus::InStock,
                cost_price: *cost,
                selling_price: *price,
                sold: 0,
            })
            .await?;
        println!(
            "  {}  {:<20} qty={:<4} {}",
            product.id,
            product.name,
            product.quantity,
            product.status.as_str()
        );
    }

    println!();
    println!("Services:");
    for (name, price) in SERVICES {
        let service = Service {
            id: new_id(),
            business_id: business_id.clone(),
            name: name.to_string(),
            selling_price: *price,
        };
        catalog.insert_service(&service).await?;
        println!("  {}  {}", service.id, service.name);
    }

    // Customers
    println!();
    println!("Customers:");
    for (name, wallet) in CUSTOMERS {
        let customer = Customer {
            id: new_id(),
            business_id: business_id.clone(),
            name: name.to_string(),
            wallet: *wallet,
            purchase_value: 0,
            last_sale_on: None,
        };
        db.customers().insert(&customer).await?;
        println!("  {}  {:<12} wallet={}", customer.id, customer.name, customer.wallet);
    }

    println!();
    println!(
        "✓ Seed complete! {} products",
        catalog.count_products(&business_id).await?
    );

    Ok(())
}
