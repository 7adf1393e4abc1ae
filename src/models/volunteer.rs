use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, Type};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum VolunteerError {
    #[error("Volunteer application with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "volunteer_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum VolunteerStatus {
    Pending,
    Approved,
    Rejected,
}

impl FromStr for VolunteerStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(VolunteerStatus::Pending),
            "APPROVED" => Ok(VolunteerStatus::Approved),
            "REJECTED" => Ok(VolunteerStatus::Rejected),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerApplication {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
    /// Raw submitted mapping of field key → value, schema-driven.
    pub data: Value,
    pub status: VolunteerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateVolunteerApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
    pub data: Value,
}

impl VolunteerApplication {
    pub async fn create(
        pool: &DbPool,
        application: CreateVolunteerApplication,
    ) -> Result<Self, VolunteerError> {
        let now = Utc::now();

        let application = sqlx::query_as::<_, VolunteerApplication>(
            "INSERT INTO volunteer_applications
                 (id, full_name, email, phone, reason, data, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(application.full_name)
        .bind(application.email)
        .bind(application.phone)
        .bind(application.reason)
        .bind(application.data)
        .bind(VolunteerStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(application)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let application = sqlx::query_as::<_, VolunteerApplication>(
            "SELECT * FROM volunteer_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(application)
    }

    pub async fn list(
        pool: &DbPool,
        status: Option<VolunteerStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, VolunteerError> {
        let applications = sqlx::query_as::<_, VolunteerApplication>(
            "SELECT * FROM volunteer_applications
             WHERE ($1::volunteer_status IS NULL OR status = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(applications)
    }

    pub async fn count(
        pool: &DbPool,
        status: Option<VolunteerStatus>,
    ) -> Result<i64, VolunteerError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM volunteer_applications
             WHERE ($1::volunteer_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    pub async fn update_status(
        pool: &DbPool,
        id: Uuid,
        status: VolunteerStatus,
    ) -> Result<Self, VolunteerError> {
        let updated = sqlx::query_as::<_, VolunteerApplication>(
            "UPDATE volunteer_applications
             SET status = $2, updated_at = $3
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        updated.ok_or(VolunteerError::NotFound { id })
    }
}
