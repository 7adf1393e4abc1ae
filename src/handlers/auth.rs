use crate::{
    database::connection::DbPool,
    models::auth::{SESSION_TTL_SECONDS, UserInfo},
    requests::auth::LoginRequest,
    requests::{first_validation_message, validation_details},
    services::auth::{AUTH_COOKIE_NAME, AuthService},
    utils::helpers::ApiError,
};
use actix_web::{
    HttpResponse, Result,
    cookie::{Cookie, SameSite, time::Duration},
    web,
};
use serde_json::json;
use std::env;
use tracing::{error, info, warn};
use validator::Validate;

fn use_secure_cookie() -> bool {
    env::var("COOKIE_SECURE")
        .map(|value| value != "false")
        .unwrap_or(false)
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE_NAME, token)
        .path("/")
        .http_only(true)
        .secure(use_secure_cookie())
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(SESSION_TTL_SECONDS))
        .finish()
}

pub async fn login(
    pool: web::Data<DbPool>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        let message = first_validation_message(&errors)
            .unwrap_or_else(|| "E-posta ve şifre gereklidir".to_string());
        return Ok(HttpResponse::BadRequest().json(
            ApiError::with_message("VALIDATION_ERROR", message)
                .and_details(validation_details(&errors)),
        ));
    }

    let auth_service = AuthService::new();
    let email = request.email.trim().to_lowercase();

    let user = match auth_service
        .authenticate_user(&pool, &email, &request.password)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!("Invalid credentials for user: {}", email);
            return Ok(HttpResponse::Unauthorized().json(ApiError::with_message(
                "INVALID_CREDENTIALS",
                "E-posta veya şifre hatalı",
            )));
        }
        Err(e) => {
            error!("Authentication error: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Giriş yapılamadı")));
        }
    };

    let token = match auth_service.generate_token(&user) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to generate token: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Giriş yapılamadı")));
        }
    };

    info!("User logged in: {}", user.email);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token))
        .json(json!({ "success": true, "user": UserInfo::from(&user) })))
}

/// Registration is permanently disabled: the system has exactly one seeded
/// admin account.
pub async fn register() -> Result<HttpResponse> {
    Ok(HttpResponse::Forbidden().json(ApiError::with_message(
        "REGISTRATION_DISABLED",
        "Kayıt kapalıdır. Yalnızca yönetici hesabı ile giriş yapılabilir.",
    )))
}

pub async fn logout() -> Result<HttpResponse> {
    let mut cookie = session_cookie(String::new());
    cookie.set_max_age(Duration::ZERO);

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "success": true })))
}
