use crate::{
    database::connection::DbPool,
    middleware::auth::AdminUser,
    models::volunteer::{
        CreateVolunteerApplication, VolunteerApplication, VolunteerError, VolunteerStatus,
    },
    requests::volunteer::VolunteerStatusRequest,
    services::volunteer_form::{self, extract_display_fields, validate_payload},
    utils::helpers::ApiError,
    utils::pagination::{PageQuery, Pagination},
};
use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use uuid::Uuid;

/// Public: the active form definition, for rendering.
pub async fn form_config(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let config = volunteer_form::load_config(&pool).await;
    Ok(HttpResponse::Ok().json(config))
}

/// Public submission, validated against whatever the current config defines.
pub async fn submit(pool: web::Data<DbPool>, payload: web::Json<Value>) -> Result<HttpResponse> {
    let config = volunteer_form::load_config(&pool).await;

    let data = match validate_payload(&payload, &config) {
        Ok(data) => data,
        Err(message) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiError::with_message("VALIDATION_ERROR", message)));
        }
    };

    let display = extract_display_fields(&data, &config);

    let application = match VolunteerApplication::create(
        &pool,
        CreateVolunteerApplication {
            full_name: display.full_name,
            email: display.email,
            phone: display.phone,
            reason: display.reason,
            data: Value::Object(data),
        },
    )
    .await
    {
        Ok(application) => application,
        Err(e) => {
            error!("Database error creating volunteer application: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Başvuru kaydedilemedi")));
        }
    };

    info!("Created volunteer application {}", application.id);

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "id": application.id,
        "message": config.success_message,
    })))
}

#[derive(Debug, Deserialize)]
pub struct VolunteerQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

pub async fn admin_list(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    query: web::Query<VolunteerQuery>,
) -> Result<HttpResponse> {
    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit, offset) = page_query.resolve(20, 50);
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<VolunteerStatus>().ok());

    let applications =
        match VolunteerApplication::list(&pool, status.clone(), limit, offset).await {
            Ok(applications) => applications,
            Err(e) => {
                error!("Database error listing volunteer applications: {}", e);
                return Ok(HttpResponse::InternalServerError()
                    .json(ApiError::with_message("INTERNAL_ERROR", "Başvurular yüklenemedi")));
            }
        };
    let total = match VolunteerApplication::count(&pool, status).await {
        Ok(total) => total,
        Err(e) => {
            error!("Database error counting volunteer applications: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Başvurular yüklenemedi")));
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "applications": applications,
        "pagination": Pagination::new(page, limit, total),
    })))
}

pub async fn admin_get(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let application_id = path.into_inner();

    match VolunteerApplication::find_by_id(&pool, application_id).await {
        Ok(Some(application)) => {
            Ok(HttpResponse::Ok().json(json!({ "application": application })))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND"))),
        Err(e) => {
            error!("Database error getting volunteer application {}: {}", application_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Başvuru yüklenemedi")))
        }
    }
}

pub async fn admin_update_status(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    request: web::Json<VolunteerStatusRequest>,
) -> Result<HttpResponse> {
    let application_id = path.into_inner();

    match VolunteerApplication::update_status(&pool, application_id, request.status.clone()).await
    {
        Ok(application) => {
            info!("Updated volunteer application {} status", application_id);
            Ok(HttpResponse::Ok().json(json!({ "application": application })))
        }
        Err(VolunteerError::NotFound { .. }) => {
            Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND")))
        }
        Err(VolunteerError::Database(e)) => {
            error!("Database error updating volunteer application {}: {}", application_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Başvuru güncellenemedi")))
        }
    }
}
