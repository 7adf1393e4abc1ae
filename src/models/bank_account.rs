use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BankAccountError {
    #[error("Bank account with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: Uuid,
    pub bank_name: String,
    pub branch: String,
    pub iban: String,
    pub currency: String,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create and full-update payload; the IBAN is expected pre-normalized
/// (uppercase, no spaces) by the request layer.
#[derive(Debug, Clone)]
pub struct BankAccountData {
    pub bank_name: String,
    pub branch: String,
    pub iban: String,
    pub currency: String,
    pub order: i32,
    pub is_active: bool,
}

impl BankAccount {
    pub async fn create(pool: &DbPool, account: BankAccountData) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let account = sqlx::query_as::<_, BankAccount>(
            "INSERT INTO bank_accounts
                 (id, bank_name, branch, iban, currency, \"order\", is_active, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(account.bank_name)
        .bind(account.branch)
        .bind(account.iban)
        .bind(account.currency)
        .bind(account.order)
        .bind(account.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, BankAccount>("SELECT * FROM bank_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(account)
    }

    pub async fn find_by_iban(pool: &DbPool, iban: &str) -> Result<Option<Self>, sqlx::Error> {
        let account =
            sqlx::query_as::<_, BankAccount>("SELECT * FROM bank_accounts WHERE iban = $1")
                .bind(iban)
                .fetch_optional(pool)
                .await?;

        Ok(account)
    }

    pub async fn list_active(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let accounts = sqlx::query_as::<_, BankAccount>(
            "SELECT * FROM bank_accounts WHERE is_active = TRUE ORDER BY \"order\" ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }

    pub async fn list_all(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let accounts = sqlx::query_as::<_, BankAccount>(
            "SELECT * FROM bank_accounts ORDER BY \"order\" ASC, bank_name ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }

    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: BankAccountData,
    ) -> Result<Self, BankAccountError> {
        let now = Utc::now();

        let updated = sqlx::query_as::<_, BankAccount>(
            "UPDATE bank_accounts
             SET bank_name = $2, branch = $3, iban = $4, currency = $5,
                 \"order\" = $6, is_active = $7, updated_at = $8
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.bank_name)
        .bind(update_data.branch)
        .bind(update_data.iban)
        .bind(update_data.currency)
        .bind(update_data.order)
        .bind(update_data.is_active)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        updated.ok_or(BankAccountError::NotFound { id })
    }

    pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), BankAccountError> {
        let result = sqlx::query("DELETE FROM bank_accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BankAccountError::NotFound { id });
        }

        Ok(())
    }
}
