//! # Customer Repository
//!
//! Business-scoped customer lookups. Wallet changes happen only through
//! [`crate::UnitOfWork::post_wallet`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kora_core::Customer;

/// Repository for customer reads.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer of the business.
    pub async fn get(&self, business_id: &str, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, business_id, name, wallet, purchase_value, last_sale_on
            FROM customers
            WHERE id = ?1 AND business_id = ?2
            "#,
        )
        .bind(id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer (seeding and tests).
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, wallet = customer.wallet, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, business_id, name, wallet, purchase_value, last_sale_on)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.business_id)
        .bind(&customer.name)
        .bind(customer.wallet)
        .bind(customer.purchase_value)
        .bind(customer.last_sale_on)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
