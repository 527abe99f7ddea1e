//! # Business Repository
//!
//! Resolves a business into the [`BusinessContext`] the sale engine works
//! with: owner, active attendants and the owner's alert settings.
//!
//! ```text
//! businesses ──► users (owner: alert flags, push_token)
//!     │
//!     └──► business_attendants (is_active = 1)
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kora_core::{AlertSettings, BankAccount, BusinessContext};

/// Repository for business, staff and bank lookups.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct OwnerRow {
    owner_id: String,
    low_stock_alert: bool,
    out_of_stock_alert: bool,
    push_token: Option<String>,
}

impl BusinessRepository {
    /// Creates a new BusinessRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BusinessRepository { pool }
    }

    /// Loads the context of a business.
    ///
    /// ## Returns
    /// * `Ok(Some(ctx))` - business exists
    /// * `Ok(None)` - no such business
    pub async fn context(&self, business_id: &str) -> DbResult<Option<BusinessContext>> {
        let owner: Option<OwnerRow> = sqlx::query_as(
            r#"
            SELECT
                b.owner_id,
                u.low_stock_alert,
                u.out_of_stock_alert,
                u.push_token
            FROM businesses b
            JOIN users u ON u.id = b.owner_id
            WHERE b.id = ?1
            "#,
        )
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(owner) = owner else {
            debug!(business_id = %business_id, "Business not found");
            return Ok(None);
        };

        let attendants: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM business_attendants
            WHERE business_id = ?1 AND is_active = 1
            ORDER BY user_id
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(BusinessContext {
            business_id: business_id.to_string(),
            owner_id: owner.owner_id,
            attendants,
            alerts: AlertSettings {
                low_stock: owner.low_stock_alert,
                out_of_stock: owner.out_of_stock_alert,
                push_token: owner.push_token,
            },
        }))
    }

    /// Gets a bank account of the business.
    pub async fn get_bank(&self, business_id: &str, bank_id: &str) -> DbResult<Option<BankAccount>> {
        let bank = sqlx::query_as::<_, BankAccount>(
            r#"
            SELECT id, business_id, bank_name, account_name, account_number
            FROM business_banks
            WHERE id = ?1 AND business_id = ?2
            "#,
        )
        .bind(bank_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bank)
    }

    // =========================================================================
    // Seeding helpers
    // =========================================================================

    /// Inserts a user with its alert settings.
    pub async fn insert_user(&self, id: &str, name: &str, alerts: &AlertSettings) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, low_stock_alert, out_of_stock_alert, push_token)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(alerts.low_stock)
        .bind(alerts.out_of_stock)
        .bind(&alerts.push_token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a business owned by `owner_id`.
    pub async fn insert_business(&self, id: &str, owner_id: &str, name: &str) -> DbResult<()> {
        debug!(business_id = %id, owner_id = %owner_id, "Inserting business");

        sqlx::query("INSERT INTO businesses (id, owner_id, name) VALUES (?1, ?2, ?3)")
            .bind(id)
            .bind(owner_id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Adds (or re-activates / deactivates) an attendant.
    pub async fn set_attendant(&self, business_id: &str, user_id: &str, active: bool) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO business_attendants (business_id, user_id, is_active)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (business_id, user_id) DO UPDATE SET is_active = excluded.is_active
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a bank account.
    pub async fn insert_bank(&self, bank: &BankAccount) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO business_banks (id, business_id, bank_name, account_name, account_number)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&bank.id)
        .bind(&bank.business_id)
        .bind(&bank.bank_name)
        .bind(&bank.account_name)
        .bind(&bank.account_number)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use kora_core::AlertSettings;

    #[tokio::test]
    async fn test_context_lists_active_attendants_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.businesses();

        let alerts = AlertSettings {
            low_stock: true,
            out_of_stock: false,
            push_token: Some("tok".to_string()),
        };
        repo.insert_user("owner", "Owner", &alerts).await.unwrap();
        repo.insert_user("a1", "Active", &AlertSettings::default()).await.unwrap();
        repo.insert_user("a2", "Former", &AlertSettings::default()).await.unwrap();
        repo.insert_business("biz", "owner", "Corner Shop").await.unwrap();
        repo.set_attendant("biz", "a1", true).await.unwrap();
        repo.set_attendant("biz", "a2", true).await.unwrap();
        repo.set_attendant("biz", "a2", false).await.unwrap();

        let ctx = repo.context("biz").await.unwrap().unwrap();
        assert_eq!(ctx.owner_id, "owner");
        assert_eq!(ctx.attendants, vec!["a1".to_string()]);
        assert_eq!(ctx.alerts, alerts);

        assert!(repo.context("missing").await.unwrap().is_none());
    }
}
