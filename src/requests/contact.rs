use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactMessageRequest {
    #[validate(length(min = 2, max = 100, message = "Ad soyad en az 2 karakter olmalı"))]
    pub name: String,
    #[validate(length(min = 10, max = 20, message = "Geçerli telefon numarası girin"))]
    pub phone: String,
    #[validate(email(message = "Geçerli e-posta adresi girin"))]
    pub email: String,
    #[validate(length(min = 10, max = 2000, message = "Mesaj en az 10 karakter olmalı"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_message() {
        let request = ContactMessageRequest {
            name: "Ali Veli".to_string(),
            phone: "05551234567".to_string(),
            email: "a@b.com".to_string(),
            message: "kısa".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
