use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::TR_IBAN_RE;

fn default_currency() -> String {
    "TRY".to_string()
}

fn default_true() -> bool {
    true
}

/// Uppercases and strips whitespace; the result is what gets stored and what
/// uniqueness is checked against.
pub fn normalize_iban(iban: &str) -> String {
    iban.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

fn validate_tr_iban(iban: &str) -> Result<(), ValidationError> {
    if TR_IBAN_RE.is_match(&normalize_iban(iban)) {
        Ok(())
    } else {
        let mut error = ValidationError::new("iban");
        error.message = Some("Geçerli TR IBAN girin".into());
        Err(error)
    }
}

/// Create and full-update body for bank accounts.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountRequest {
    #[validate(length(min = 1, max = 100, message = "Banka adı zorunludur"))]
    pub bank_name: String,
    #[validate(length(min = 1, max = 100, message = "Şube zorunludur"))]
    pub branch: String,
    #[validate(custom(function = "validate_tr_iban"))]
    pub iban: String,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3))]
    pub currency: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl BankAccountRequest {
    pub fn normalized_iban(&self) -> String {
        normalize_iban(&self.iban)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(iban: &str) -> BankAccountRequest {
        BankAccountRequest {
            bank_name: "Ziraat Bankası".to_string(),
            branch: "Adapazarı".to_string(),
            iban: iban.to_string(),
            currency: "TRY".to_string(),
            order: 0,
            is_active: true,
        }
    }

    #[test]
    fn normalizes_spacing_and_case() {
        let req = request("tr12 0001 0002 3456 7890 1234 56");
        assert!(req.validate().is_ok());
        assert_eq!(req.normalized_iban(), "TR120001000234567890123456");
    }

    #[test]
    fn rejects_wrong_country_or_length() {
        assert!(request("DE12000100023456789012345").validate().is_err());
        assert!(request("TR12000100023456789012345").validate().is_err()); // 25 chars
        assert!(request("TR1200010002345678901234567").validate().is_err()); // 27 chars
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_iban("tr12 0001 0002 3456 7890 1234 56");
        assert_eq!(normalize_iban(&once), once);
    }
}
