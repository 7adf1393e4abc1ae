use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::models::user::UserRole;
use crate::services::auth::{AUTH_COOKIE_NAME, AuthService};
use crate::utils::helpers::ApiError;

/// Identity decoded from the session token; no database round-trip.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

/// Admin-route guard: any valid session whose role is above MEMBER. Every
/// admin handler takes this extractor, so the check runs per request before
/// the handler body touches the store.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req).and_then(|user| {
            if user.role.is_admin() {
                Ok(AdminUser(user))
            } else {
                Err(forbidden())
            }
        }))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let token = req
        .cookie(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(req))
        .ok_or_else(unauthorized)?;

    let claims = AuthService::new()
        .verify_token(&token)
        .map_err(|_| unauthorized())?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

fn unauthorized() -> Error {
    InternalError::from_response(
        "unauthorized",
        HttpResponse::Unauthorized().json(ApiError::new("UNAUTHORIZED")),
    )
    .into()
}

fn forbidden() -> Error {
    InternalError::from_response(
        "forbidden",
        HttpResponse::Forbidden().json(ApiError::with_message("FORBIDDEN", "Admin yetkisi gerekli")),
    )
    .into()
}
