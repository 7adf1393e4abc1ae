use crate::{
    database::connection::DbPool,
    middleware::auth::AdminUser,
    models::setting::{ContactInfo, Setting, SettingKey},
    requests::setting::{SettingQuery, UpdateSettingRequest},
    services::iyzico::IyzicoSettings,
    services::volunteer_form::VolunteerFormConfig,
    utils::helpers::ApiError,
};
use actix_web::{HttpResponse, Result, web};
use serde_json::{Value, json};
use tracing::{error, info};

/// Public: contact details for the site footer and contact page.
pub async fn contact_info(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let value = Setting::fetch_json::<ContactInfo>(&pool, SettingKey::ContactInfo)
        .await
        .unwrap_or_default();
    Ok(HttpResponse::Ok().json(value))
}

fn default_value(key: SettingKey) -> Value {
    match key {
        SettingKey::ContactInfo => {
            serde_json::to_value(ContactInfo::default()).unwrap_or(Value::Null)
        }
        SettingKey::VolunteerForm => {
            serde_json::to_value(VolunteerFormConfig::default_config()).unwrap_or(Value::Null)
        }
        SettingKey::Iyzico => {
            serde_json::to_value(IyzicoSettings::default()).unwrap_or(Value::Null)
        }
    }
}

pub async fn admin_get(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    query: web::Query<SettingQuery>,
) -> Result<HttpResponse> {
    let key = match query.key.as_deref().and_then(SettingKey::parse) {
        Some(key) => key,
        None => return Ok(HttpResponse::BadRequest().json(ApiError::new("INVALID_KEY"))),
    };

    let value = match Setting::get(&pool, key).await {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|_| default_value(key)),
        Ok(None) => default_value(key),
        Err(e) => {
            error!("Database error reading setting {}: {}", key.as_str(), e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Ayar yüklenemedi")));
        }
    };

    Ok(HttpResponse::Ok().json(json!({ "key": key.as_str(), "value": value })))
}

pub async fn admin_update(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    request: web::Json<UpdateSettingRequest>,
) -> Result<HttpResponse> {
    let key = match SettingKey::parse(&request.key) {
        Some(key) => key,
        None => return Ok(HttpResponse::BadRequest().json(ApiError::new("INVALID_KEY"))),
    };

    let serialized = match serde_json::to_string(&request.value) {
        Ok(serialized) => serialized,
        Err(e) => {
            error!("Failed to serialize setting {}: {}", key.as_str(), e);
            return Ok(HttpResponse::BadRequest()
                .json(ApiError::with_message("VALIDATION_ERROR", "Geçersiz ayar değeri")));
        }
    };

    match Setting::upsert(&pool, key, &serialized).await {
        Ok(()) => {
            info!("Updated setting: {}", key.as_str());
            Ok(HttpResponse::Ok().json(json!({ "success": true })))
        }
        Err(e) => {
            error!("Database error updating setting {}: {}", key.as_str(), e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Ayar kaydedilemedi")))
        }
    }
}
