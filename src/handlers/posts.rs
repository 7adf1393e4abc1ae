use crate::{
    database::connection::DbPool,
    middleware::auth::AdminUser,
    models::post::{CreatePost, Post, PostError, UpdatePost},
    requests::post::{CreatePostRequest, UpdatePostRequest},
    requests::validation_details,
    utils::helpers::ApiError,
    utils::pagination::{PageQuery, Pagination},
};
use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

pub async fn list_published(
    pool: web::Data<DbPool>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (page, limit, offset) = query.resolve(10, 20);

    let posts = match Post::list(&pool, Some(true), limit, offset).await {
        Ok(posts) => posts,
        Err(e) => {
            error!("Database error listing posts: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haberler yüklenemedi")));
        }
    };
    let total = match Post::count(&pool, Some(true)).await {
        Ok(total) => total,
        Err(e) => {
            error!("Database error counting posts: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haberler yüklenemedi")));
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": Pagination::new(page, limit, total),
    })))
}

pub async fn get_by_slug(pool: web::Data<DbPool>, path: web::Path<String>) -> Result<HttpResponse> {
    let slug = path.into_inner();

    match Post::find_published_by_slug(&pool, &slug).await {
        Ok(Some(post)) => Ok(HttpResponse::Ok().json(json!({ "post": post }))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND"))),
        Err(e) => {
            error!("Database error getting post {}: {}", slug, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haber yüklenemedi")))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminPostQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub published: Option<String>,
}

pub async fn admin_list(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    query: web::Query<AdminPostQuery>,
) -> Result<HttpResponse> {
    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit, offset) = page_query.resolve(20, 50);
    let published = match query.published.as_deref() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    };

    let posts = match Post::list(&pool, published, limit, offset).await {
        Ok(posts) => posts,
        Err(e) => {
            error!("Database error listing posts: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haberler yüklenemedi")));
        }
    };
    let total = match Post::count(&pool, published).await {
        Ok(total) => total,
        Err(e) => {
            error!("Database error counting posts: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haberler yüklenemedi")));
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": Pagination::new(page, limit, total),
    })))
}

pub async fn admin_create(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    request: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiError::with_details("VALIDATION_ERROR", validation_details(&errors))));
    }

    match Post::find_by_slug(&pool, &request.slug).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict()
                .json(ApiError::with_message("SLUG_EXISTS", "Bu slug zaten kullanımda")));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Database error checking slug: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haber oluşturulamadı")));
        }
    }

    let create_post = CreatePost {
        title: request.title.clone(),
        content: request.content.clone(),
        image: request.image.clone(),
        slug: request.slug.clone(),
        published: request.published,
    };

    match Post::create(&pool, create_post).await {
        Ok(post) => {
            info!("Successfully created post with ID: {}", post.id);
            Ok(HttpResponse::Created().json(json!({ "post": post })))
        }
        Err(e) => {
            error!("Database error creating post: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haber oluşturulamadı")))
        }
    }
}

pub async fn admin_update(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    request: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();

    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiError::with_details("VALIDATION_ERROR", validation_details(&errors))));
    }

    let existing = match Post::find_by_id(&pool, post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => return Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND"))),
        Err(e) => {
            error!("Database error getting post {}: {}", post_id, e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haber güncellenemedi")));
        }
    };

    if let Some(slug) = &request.slug {
        if slug != &existing.slug {
            match Post::find_by_slug(&pool, slug).await {
                Ok(Some(_)) => {
                    return Ok(HttpResponse::Conflict()
                        .json(ApiError::with_message("SLUG_EXISTS", "Bu slug zaten kullanımda")));
                }
                Ok(None) => {}
                Err(e) => {
                    error!("Database error checking slug: {}", e);
                    return Ok(HttpResponse::InternalServerError()
                        .json(ApiError::with_message("INTERNAL_ERROR", "Haber güncellenemedi")));
                }
            }
        }
    }

    let update_data = UpdatePost {
        title: request.title.clone(),
        content: request.content.clone(),
        image: request.image.clone(),
        slug: request.slug.clone(),
        published: request.published,
    };

    match Post::update(&pool, post_id, update_data).await {
        Ok(post) => {
            info!("Successfully updated post: {}", post_id);
            Ok(HttpResponse::Ok().json(json!({ "post": post })))
        }
        Err(PostError::NotFound { .. }) => {
            Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND")))
        }
        Err(PostError::Database(e)) => {
            error!("Database error updating post {}: {}", post_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haber güncellenemedi")))
        }
    }
}

pub async fn admin_delete(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();

    match Post::delete(&pool, post_id).await {
        Ok(()) => {
            info!("Successfully deleted post: {}", post_id);
            Ok(HttpResponse::Ok().json(json!({ "success": true })))
        }
        Err(PostError::NotFound { .. }) => {
            Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND")))
        }
        Err(PostError::Database(e)) => {
            error!("Database error deleting post {}: {}", post_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Haber silinemedi")))
        }
    }
}
