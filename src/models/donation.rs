use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DonationError {
    #[error("Donation with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "donation_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum DonationStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl FromStr for DonationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(DonationStatus::Pending),
            "COMPLETED" => Ok(DonationStatus::Completed),
            "FAILED" => Ok(DonationStatus::Failed),
            "REFUNDED" => Ok(DonationStatus::Refunded),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: DonationStatus,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub donor_identity_number: Option<String>,
    pub ip: Option<String>,
    pub conversation_id: Option<String>,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin transaction listing row: donation plus the category name.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonationWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub donation: Donation,
    pub category_name: String,
}

#[derive(Debug, Clone)]
pub struct CreateDonation {
    pub category_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub donor_identity_number: Option<String>,
    pub ip: Option<String>,
}

impl Donation {
    /// Inserts the row as PENDING before the gateway is contacted, so a crash
    /// mid-call leaves an auditable record instead of a silent loss.
    pub async fn create_pending(
        pool: &DbPool,
        donation: CreateDonation,
    ) -> Result<Self, DonationError> {
        let now = Utc::now();

        let donation = sqlx::query_as::<_, Donation>(
            "INSERT INTO donations
                 (id, category_id, amount, currency, status, donor_name, donor_email,
                  donor_phone, donor_identity_number, ip, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(donation.category_id)
        .bind(donation.amount)
        .bind(donation.currency)
        .bind(DonationStatus::Pending)
        .bind(donation.donor_name)
        .bind(donation.donor_email)
        .bind(donation.donor_phone)
        .bind(donation.donor_identity_number)
        .bind(donation.ip)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(donation)
    }

    pub async fn mark_failed(pool: &DbPool, id: Uuid) -> Result<(), DonationError> {
        let result =
            sqlx::query("UPDATE donations SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(DonationStatus::Failed)
                .bind(Utc::now())
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DonationError::NotFound { id });
        }

        Ok(())
    }

    /// Marks the donation COMPLETED and increments the category's collected
    /// total in one transaction. The increment runs server-side so concurrent
    /// donations against the same category never lose updates.
    pub async fn complete(
        pool: &DbPool,
        id: Uuid,
        category_id: Uuid,
        amount: Decimal,
        payment_id: &str,
        conversation_id: &str,
    ) -> Result<(), DonationError> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE donations
             SET status = $2, payment_id = $3, conversation_id = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(id)
        .bind(DonationStatus::Completed)
        .bind(payment_id)
        .bind(conversation_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE donation_categories
             SET collected = collected + $2, updated_at = $3
             WHERE id = $1",
        )
        .bind(category_id)
        .bind(amount)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    pub async fn list(
        pool: &DbPool,
        category_id: Option<Uuid>,
        status: Option<DonationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DonationWithCategory>, DonationError> {
        let donations = sqlx::query_as::<_, DonationWithCategory>(
            "SELECT d.*, c.name AS category_name
             FROM donations d
             JOIN donation_categories c ON c.id = d.category_id
             WHERE ($1::UUID IS NULL OR d.category_id = $1)
               AND ($2::donation_status IS NULL OR d.status = $2)
             ORDER BY d.created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(category_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(donations)
    }

    pub async fn count(
        pool: &DbPool,
        category_id: Option<Uuid>,
        status: Option<DonationStatus>,
    ) -> Result<i64, DonationError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM donations
             WHERE ($1::UUID IS NULL OR category_id = $1)
               AND ($2::donation_status IS NULL OR status = $2)",
        )
        .bind(category_id)
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_wire_names() {
        assert_eq!("PENDING".parse(), Ok(DonationStatus::Pending));
        assert_eq!("COMPLETED".parse(), Ok(DonationStatus::Completed));
        assert_eq!("REFUNDED".parse(), Ok(DonationStatus::Refunded));
        assert!("pending".parse::<DonationStatus>().is_err());
    }

    #[test]
    fn status_serializes_uppercase() {
        let json = serde_json::to_string(&DonationStatus::Failed).unwrap();
        assert_eq!(json, "\"FAILED\"");
    }
}
