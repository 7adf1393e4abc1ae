use crate::{
    database::connection::DbPool,
    middleware::auth::AdminUser,
    models::donation_category::{CategoryError, CreateCategory, DonationCategory},
    requests::donation_category::DonationCategoryRequest,
    requests::validation_details,
    utils::helpers::{ApiError, decimal_from_f64},
};
use actix_web::{HttpResponse, Result, web};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

pub async fn list_active_categories(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    match DonationCategory::list_active(&pool).await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({ "categories": categories }))),
        Err(e) => {
            error!("Database error listing donation categories: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Kategoriler yüklenemedi")))
        }
    }
}

pub async fn admin_list_categories(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
) -> Result<HttpResponse> {
    match DonationCategory::list_with_counts(&pool).await {
        Ok(categories) => Ok(HttpResponse::Ok().json(json!({ "categories": categories }))),
        Err(e) => {
            error!("Database error listing donation categories: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Kategoriler yüklenemedi")))
        }
    }
}

fn category_data(request: &DonationCategoryRequest) -> CreateCategory {
    CreateCategory {
        name: request.name.clone(),
        description: request.description.clone(),
        image: request.image.clone(),
        fixed_price: request.fixed_price.and_then(decimal_from_f64),
        target_amount: request.target_amount.and_then(decimal_from_f64),
        is_active: request.is_active,
        order: request.order,
    }
}

pub async fn admin_create_category(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    request: web::Json<DonationCategoryRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiError::with_details("VALIDATION_ERROR", validation_details(&errors))));
    }

    match DonationCategory::create(&pool, category_data(&request)).await {
        Ok(category) => {
            info!("Successfully created donation category with ID: {}", category.id);
            Ok(HttpResponse::Created().json(json!({ "category": category })))
        }
        Err(e) => {
            error!("Database error creating donation category: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Kategori oluşturulamadı")))
        }
    }
}

pub async fn admin_update_category(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    request: web::Json<DonationCategoryRequest>,
) -> Result<HttpResponse> {
    let category_id = path.into_inner();

    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiError::with_details("VALIDATION_ERROR", validation_details(&errors))));
    }

    match DonationCategory::update(&pool, category_id, category_data(&request)).await {
        Ok(category) => {
            info!("Successfully updated donation category: {}", category_id);
            Ok(HttpResponse::Ok().json(json!({ "category": category })))
        }
        Err(CategoryError::NotFound { .. }) => {
            Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND")))
        }
        Err(e) => {
            error!("Error updating donation category {}: {}", category_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Kategori güncellenemedi")))
        }
    }
}

pub async fn admin_delete_category(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let category_id = path.into_inner();

    match DonationCategory::delete(&pool, category_id).await {
        Ok(()) => {
            info!("Successfully deleted donation category: {}", category_id);
            Ok(HttpResponse::Ok().json(json!({ "success": true })))
        }
        Err(CategoryError::NotFound { .. }) => {
            Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND")))
        }
        Err(CategoryError::HasDonations) => Ok(HttpResponse::BadRequest().json(
            ApiError::with_message("HAS_DONATIONS", "Bu kategoride bağış kayıtları var, silinemez."),
        )),
        Err(CategoryError::Database(e)) => {
            error!("Database error deleting donation category {}: {}", category_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Kategori silinemedi")))
        }
    }
}
