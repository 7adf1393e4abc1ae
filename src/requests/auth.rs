use serde::Deserialize;
use validator::Validate;

use super::LOGIN_EMAIL_RE;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        length(min = 1, message = "E-posta gerekli"),
        regex(path = "LOGIN_EMAIL_RE", message = "Geçerli e-posta formatı girin")
    )]
    pub email: String,
    #[validate(length(min = 6, message = "Şifre en az 6 karakter olmalı"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_password() {
        let request = LoginRequest {
            email: "admin@localhost".to_string(),
            password: "12345".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn rejects_malformed_email() {
        let request = LoginRequest {
            email: "not an email".to_string(),
            password: "admin123".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn accepts_valid_credentials_shape() {
        let request = LoginRequest {
            email: "admin@localhost".to_string(),
            password: "admin123".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
