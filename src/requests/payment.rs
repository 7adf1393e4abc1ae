use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{EXPIRE_MONTH_RE, EXPIRE_YEAR_RE, IDENTITY_NUMBER_RE};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCardRequest {
    #[validate(length(min = 2, message = "Kart sahibi adı zorunludur"))]
    pub card_holder_name: String,
    #[validate(length(min = 15, max = 19, message = "Geçerli kart numarası girin"))]
    pub card_number: String,
    #[validate(regex(path = "EXPIRE_MONTH_RE", message = "Geçerli son kullanma ayı girin"))]
    pub expire_month: String,
    #[validate(regex(path = "EXPIRE_YEAR_RE", message = "Geçerli son kullanma yılı girin"))]
    pub expire_year: String,
    #[validate(length(min = 3, max = 4, message = "Geçerli CVC girin"))]
    pub cvc: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddressRequest {
    #[validate(length(min = 2, message = "Ad soyad zorunludur"))]
    pub contact_name: String,
    #[validate(length(min = 1, message = "Şehir zorunludur"))]
    pub city: String,
    #[validate(length(min = 1, message = "Ülke zorunludur"))]
    pub country: String,
    #[validate(length(min = 5, message = "Adres en az 5 karakter olmalı"))]
    pub address: String,
    #[validate(length(min = 4, max = 10, message = "Geçerli posta kodu girin"))]
    pub zip_code: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DonationPayRequest {
    pub category_id: Uuid,
    #[validate(range(min = 0.01, message = "Miktar 0'dan büyük olmalı"))]
    pub amount: f64,
    #[validate(length(min = 2, max = 100, message = "Ad soyad en az 2 karakter olmalı"))]
    pub donor_name: String,
    #[validate(email(message = "Geçerli e-posta adresi girin"))]
    pub donor_email: String,
    #[validate(length(min = 10, max = 20, message = "Geçerli telefon numarası girin"))]
    pub donor_phone: String,
    #[validate(regex(
        path = "IDENTITY_NUMBER_RE",
        message = "Geçerli TC kimlik numarası girin"
    ))]
    pub donor_identity_number: Option<String>,
    #[validate]
    pub payment_card: PaymentCardRequest,
    #[validate]
    pub billing_address: BillingAddressRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64) -> DonationPayRequest {
        DonationPayRequest {
            category_id: Uuid::new_v4(),
            amount,
            donor_name: "Ali Veli".to_string(),
            donor_email: "a@b.com".to_string(),
            donor_phone: "05551234567".to_string(),
            donor_identity_number: None,
            payment_card: PaymentCardRequest {
                card_holder_name: "Ali Veli".to_string(),
                card_number: "5528790000000008".to_string(),
                expire_month: "12".to_string(),
                expire_year: "2030".to_string(),
                cvc: "123".to_string(),
            },
            billing_address: BillingAddressRequest {
                contact_name: "Ali Veli".to_string(),
                city: "Sakarya".to_string(),
                country: "Türkiye".to_string(),
                address: "Cumhuriyet Mah. No:2".to_string(),
                zip_code: "54100".to_string(),
            },
        }
    }

    #[test]
    fn accepts_complete_request() {
        assert!(request(100.0).validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_amount() {
        assert!(request(0.0).validate().is_err());
        assert!(request(-10.0).validate().is_err());
    }

    #[test]
    fn rejects_bad_expiry() {
        let mut req = request(100.0);
        req.payment_card.expire_month = "13".to_string();
        assert!(req.validate().is_err());

        let mut req = request(100.0);
        req.payment_card.expire_year = "2019".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn identity_number_must_be_eleven_digits() {
        let mut req = request(100.0);
        req.donor_identity_number = Some("123".to_string());
        assert!(req.validate().is_err());

        req.donor_identity_number = Some("12345678901".to_string());
        assert!(req.validate().is_ok());
    }
}
