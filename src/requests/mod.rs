use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::ValidationErrors;

pub mod auth;
pub mod bank_account;
pub mod contact;
pub mod donation_category;
pub mod payment;
pub mod post;
pub mod setting;
pub mod volunteer;

lazy_static! {
    pub static ref SLUG_RE: Regex = Regex::new("^[a-z0-9-]+$").unwrap();
    pub static ref TR_IBAN_RE: Regex = Regex::new("^TR[0-9]{24}$").unwrap();
    pub static ref IDENTITY_NUMBER_RE: Regex = Regex::new("^[0-9]{11}$").unwrap();
    pub static ref EXPIRE_MONTH_RE: Regex = Regex::new("^(0[1-9]|1[0-2])$").unwrap();
    pub static ref EXPIRE_YEAR_RE: Regex = Regex::new("^20[2-9][0-9]$").unwrap();
    pub static ref LOGIN_EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+$").unwrap();
}

/// Field-level errors for the `details` member of the validation envelope.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    serde_json::to_value(errors).unwrap_or(Value::Null)
}

/// First human-readable message out of a validation result, in field order as
/// serialized; used where the response carries a single `message`.
pub fn first_validation_message(errors: &ValidationErrors) -> Option<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
}

/// Distinguishes "field absent" from "field set to null" in PATCH-style
/// bodies: absent → None, null → Some(None), value → Some(Some(v)).
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
