use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("Donation category with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Bu kategoride bağış kayıtları var, silinemez.")]
    HasDonations,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonationCategory {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub fixed_price: Option<Decimal>,
    pub target_amount: Option<Decimal>,
    pub collected: Decimal,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin listing row: category plus how many donations reference it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: DonationCategory,
    pub donation_count: i64,
}

#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub fixed_price: Option<Decimal>,
    pub target_amount: Option<Decimal>,
    pub is_active: bool,
    pub order: i32,
}

impl DonationCategory {
    pub async fn create(pool: &DbPool, category: CreateCategory) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let category = sqlx::query_as::<_, DonationCategory>(
            "INSERT INTO donation_categories
                 (id, name, description, image, fixed_price, target_amount, collected, is_active, \"order\", created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(category.name)
        .bind(category.description)
        .bind(category.image)
        .bind(category.fixed_price)
        .bind(category.target_amount)
        .bind(category.is_active)
        .bind(category.order)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let category =
            sqlx::query_as::<_, DonationCategory>("SELECT * FROM donation_categories WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(category)
    }

    pub async fn find_active_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let category = sqlx::query_as::<_, DonationCategory>(
            "SELECT * FROM donation_categories WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(category)
    }

    pub async fn list_active(pool: &DbPool) -> Result<Vec<Self>, sqlx::Error> {
        let categories = sqlx::query_as::<_, DonationCategory>(
            "SELECT * FROM donation_categories WHERE is_active = TRUE ORDER BY \"order\" ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    pub async fn list_with_counts(pool: &DbPool) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        let categories = sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.*, COUNT(d.id) AS donation_count
             FROM donation_categories c
             LEFT JOIN donations d ON d.category_id = c.id
             GROUP BY c.id
             ORDER BY c.\"order\" ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }

    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: CreateCategory,
    ) -> Result<Self, CategoryError> {
        let now = Utc::now();

        let updated = sqlx::query_as::<_, DonationCategory>(
            "UPDATE donation_categories
             SET name = $2, description = $3, image = $4, fixed_price = $5,
                 target_amount = $6, is_active = $7, \"order\" = $8, updated_at = $9
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.name)
        .bind(update_data.description)
        .bind(update_data.image)
        .bind(update_data.fixed_price)
        .bind(update_data.target_amount)
        .bind(update_data.is_active)
        .bind(update_data.order)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        updated.ok_or(CategoryError::NotFound { id })
    }

    /// Fails with `HasDonations` while donation rows still reference the
    /// category, so the ledger behind `collected` stays auditable.
    pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), CategoryError> {
        let (donation_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM donations WHERE category_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;

        if donation_count > 0 {
            return Err(CategoryError::HasDonations);
        }

        let result = sqlx::query("DELETE FROM donation_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CategoryError::NotFound { id });
        }

        Ok(())
    }
}
