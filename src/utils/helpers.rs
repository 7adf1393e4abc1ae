use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Machine-readable error envelope: `{error, message?, details?}`.
#[derive(Serialize, Debug)]
pub struct ApiError {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    pub fn new(code: &str) -> Self {
        Self {
            error: code.to_string(),
            message: None,
            details: None,
        }
    }

    pub fn with_message(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: code.to_string(),
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn with_details(code: &str, details: Value) -> Self {
        Self {
            error: code.to_string(),
            message: None,
            details: Some(details),
        }
    }

    pub fn and_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Money enters as a JSON number and is carried as `Decimal` from here on.
/// `None` only for non-finite input, which JSON cannot produce.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| d.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_absent_fields() {
        let body = serde_json::to_value(ApiError::new("NOT_FOUND")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "NOT_FOUND"}));
    }

    #[test]
    fn carries_message() {
        let body =
            serde_json::to_value(ApiError::with_message("IBAN_EXISTS", "Bu IBAN zaten kayıtlı"))
                .unwrap();
        assert_eq!(body["error"], "IBAN_EXISTS");
        assert_eq!(body["message"], "Bu IBAN zaten kayıtlı");
    }
}
