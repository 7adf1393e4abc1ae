use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::warn;

/// The fixed set of JSON configuration documents. Each key owns a typed value
/// with a code-level default; reads never create rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    ContactInfo,
    VolunteerForm,
    Iyzico,
}

impl SettingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::ContactInfo => "contact_info",
            SettingKey::VolunteerForm => "volunteer_form",
            SettingKey::Iyzico => "iyzico",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contact_info" => Some(SettingKey::ContactInfo),
            "volunteer_form" => Some(SettingKey::VolunteerForm),
            "iyzico" => Some(SettingKey::Iyzico),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Setting {
    pub id: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    pub async fn get(pool: &DbPool, key: SettingKey) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE id = $1")
            .bind(key.as_str())
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Whole-document replace, last writer wins.
    pub async fn upsert(pool: &DbPool, key: SettingKey, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO settings (id, value, updated_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET value = $2, updated_at = $3",
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Schema-on-read fetch: `None` when the row is absent, unreadable, or its
    /// JSON does not match `T`, so callers fall back to their default.
    pub async fn fetch_json<T: DeserializeOwned>(pool: &DbPool, key: SettingKey) -> Option<T> {
        let value = match Self::get(pool, key).await {
            Ok(value) => value?,
            Err(e) => {
                warn!("Failed to read setting {}: {}", key.as_str(), e);
                return None;
            }
        };

        match serde_json::from_str(&value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Stored setting {} is malformed: {}", key.as_str(), e);
                None
            }
        }
    }
}

/// Value of the `contact_info` setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub org_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            org_name: "Sakarya İHH Akıf Derneği".to_string(),
            address: "Cumhuriyet Mahallesi Uzunçarşı 1. Geçit No:2, Adapazarı / Sakarya"
                .to_string(),
            phone: "(0264) 777 24 44".to_string(),
            email: "sakaryaihh@gmail.com".to_string(),
            facebook: String::new(),
            twitter: String::new(),
            instagram: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trip() {
        for key in [
            SettingKey::ContactInfo,
            SettingKey::VolunteerForm,
            SettingKey::Iyzico,
        ] {
            assert_eq!(SettingKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SettingKey::parse("unknown"), None);
    }

    #[test]
    fn contact_info_fills_missing_fields() {
        let partial: ContactInfo = serde_json::from_str(r#"{"orgName": "Dernek"}"#).unwrap();
        assert_eq!(partial.org_name, "Dernek");
        assert_eq!(partial.phone, ContactInfo::default().phone);
    }
}
