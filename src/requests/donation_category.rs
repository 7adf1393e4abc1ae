use serde::Deserialize;
use validator::Validate;

fn default_true() -> bool {
    true
}

/// Create and full-update body for donation categories. `fixed_price` null
/// means the donor picks the amount.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DonationCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "İsim zorunludur"))]
    pub name: String,
    #[validate(length(min = 1, message = "Açıklama zorunludur"))]
    pub description: String,
    #[validate(url(message = "Geçerli bir görsel adresi girin"))]
    pub image: Option<String>,
    #[validate(range(min = 0.01, message = "Sabit miktar 0'dan büyük olmalı"))]
    pub fixed_price: Option<f64>,
    #[validate(range(min = 0.01, message = "Hedef miktar 0'dan büyük olmalı"))]
    pub target_amount: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(fixed_price: Option<f64>) -> DonationCategoryRequest {
        DonationCategoryRequest {
            name: "Su Kuyusu".to_string(),
            description: "Afrika'da su kuyusu açılışı".to_string(),
            image: None,
            fixed_price,
            target_amount: None,
            is_active: true,
            order: 0,
        }
    }

    #[test]
    fn free_amount_category_is_valid() {
        assert!(request(None).validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_fixed_price() {
        assert!(request(Some(0.0)).validate().is_err());
        assert!(request(Some(-5.0)).validate().is_err());
        assert!(request(Some(250.0)).validate().is_ok());
    }
}
