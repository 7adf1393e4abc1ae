use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::env;
use thiserror::Error;
use tracing::warn;

use crate::database::connection::DbPool;
use crate::models::auth::Claims;
use crate::models::user::User;

pub const AUTH_COOKIE_NAME: &str = "auth_token";

const DEFAULT_SECRET: &str = "dev-secret-change-in-production";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Stateless HS256 session tokens carrying user id, email and role.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new() -> Self {
        let secret = env::var("AUTH_SECRET").unwrap_or_else(|_| {
            warn!("AUTH_SECRET not set, using the development secret");
            DEFAULT_SECRET.to_string()
        });
        Self::with_secret(&secret)
    }

    pub fn with_secret(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims::new(user);
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }

    pub async fn authenticate_user(
        &self,
        pool: &DbPool,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AuthError> {
        Ok(User::authenticate(pool, email, password).await?)
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "admin@localhost".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let service = AuthService::with_secret("test-secret");
        let user = user(UserRole::Admin);

        let token = service.generate_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let issuer = AuthService::with_secret("secret-a");
        let verifier = AuthService::with_secret("secret-b");

        let token = issuer.generate_token(&user(UserRole::Editor)).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_garbage_token() {
        let service = AuthService::with_secret("test-secret");
        assert!(service.verify_token("not-a-jwt").is_err());
    }
}
