use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::database::connection::DbPool;
use crate::models::setting::{Setting, SettingKey};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Textarea,
    Radio,
    Checkbox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerFormField {
    pub id: String,
    /// Submission key; unique within a config.
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// For radio and checkbox; rendering tolerates absence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerFormConfig {
    pub title: String,
    pub submit_text: String,
    pub success_message: String,
    /// Field key used for the summary column in list views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_display_field: Option<String>,
    pub fields: Vec<VolunteerFormField>,
}

impl VolunteerFormConfig {
    pub fn default_config() -> Self {
        Self {
            title: "Gönüllü Başvuru Formu".to_string(),
            submit_text: "Gönder".to_string(),
            success_message: "Başvurunuz alındı. En kısa sürede değerlendirilecektir.".to_string(),
            list_display_field: Some("fullName".to_string()),
            fields: vec![
                VolunteerFormField {
                    id: "f1".to_string(),
                    key: "fullName".to_string(),
                    label: "Ad Soyad".to_string(),
                    field_type: FieldType::Text,
                    required: true,
                    placeholder: Some("Ad Soyad".to_string()),
                    options: None,
                    min_length: Some(2),
                    max_length: Some(100),
                    rows: None,
                },
                VolunteerFormField {
                    id: "f2".to_string(),
                    key: "email".to_string(),
                    label: "E-posta".to_string(),
                    field_type: FieldType::Email,
                    required: true,
                    placeholder: Some("ornek@email.com".to_string()),
                    options: None,
                    min_length: None,
                    max_length: None,
                    rows: None,
                },
                VolunteerFormField {
                    id: "f3".to_string(),
                    key: "phone".to_string(),
                    label: "Telefon".to_string(),
                    field_type: FieldType::Tel,
                    required: true,
                    placeholder: Some("05XXXXXXXXX".to_string()),
                    options: None,
                    min_length: Some(10),
                    max_length: Some(20),
                    rows: None,
                },
                VolunteerFormField {
                    id: "f4".to_string(),
                    key: "reason".to_string(),
                    label: "Başvuru Gerekçesi / Mesajınız".to_string(),
                    field_type: FieldType::Textarea,
                    required: true,
                    placeholder: Some(
                        "Neden gönüllü olmak istiyorsunuz? Hangi alanlarda destek olabilirsiniz?"
                            .to_string(),
                    ),
                    options: None,
                    min_length: Some(10),
                    max_length: Some(2000),
                    rows: Some(4),
                },
            ],
        }
    }
}

/// Current form definition: the stored setting when present and well-formed,
/// the built-in default otherwise. A malformed stored config never blocks
/// submission.
pub async fn load_config(pool: &DbPool) -> VolunteerFormConfig {
    Setting::fetch_json::<VolunteerFormConfig>(pool, SettingKey::VolunteerForm)
        .await
        .unwrap_or_else(VolunteerFormConfig::default_config)
}

/// Validates a submission against the active config, walking fields in
/// declared order and stopping at the first failure. Accepted values are
/// copied into the result keyed by `field.key`; keys not in the config are
/// dropped.
pub fn validate_payload(
    payload: &Value,
    config: &VolunteerFormConfig,
) -> Result<Map<String, Value>, String> {
    let obj = match payload.as_object() {
        Some(obj) => obj,
        None => return Err("Geçersiz form verisi.".to_string()),
    };

    let mut data = Map::new();

    for field in &config.fields {
        let value = obj.get(&field.key);

        if field.required {
            match value {
                None | Some(Value::Null) => {
                    return Err(format!("{} zorunludur.", field.label));
                }
                Some(Value::String(s)) if s.trim().is_empty() => {
                    return Err(format!("{} zorunludur.", field.label));
                }
                Some(Value::Array(items)) if items.is_empty() => {
                    return Err(format!("{} en az bir seçenek gerektirir.", field.label));
                }
                _ => {}
            }
        }

        let value = match value {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };

        if field.field_type == FieldType::Email {
            if let Value::String(s) = value {
                if !EMAIL_RE.is_match(s) {
                    return Err("Geçerli bir e-posta adresi girin.".to_string());
                }
            }
        }
        if field.field_type == FieldType::Tel {
            if let Value::String(s) = value {
                let len = s.chars().count();
                if !(10..=20).contains(&len) {
                    return Err("Geçerli bir telefon numarası girin.".to_string());
                }
            }
        }
        if let (Some(min), Value::String(s)) = (field.min_length, value) {
            if s.chars().count() < min {
                return Err(format!("{} en az {} karakter olmalı.", field.label, min));
            }
        }
        if let (Some(max), Value::String(s)) = (field.max_length, value) {
            if s.chars().count() > max {
                return Err(format!("{} en fazla {} karakter olmalı.", field.label, max));
            }
        }

        data.insert(field.key.clone(), value.clone());
    }

    Ok(data)
}

/// Backward-compatible summary columns derived from arbitrary schemas:
/// exact key → known alias keys → first field of the matching type → "-".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub reason: String,
}

pub fn extract_display_fields(
    data: &Map<String, Value>,
    config: &VolunteerFormConfig,
) -> DisplayFields {
    let by_key = |key: &str| -> String { value_to_string(data.get(key)) };
    let by_type = |field_type: FieldType| -> String {
        config
            .fields
            .iter()
            .find(|f| f.field_type == field_type)
            .map(|f| by_key(&f.key))
            .unwrap_or_default()
    };

    DisplayFields {
        full_name: first_non_empty([
            by_key("fullName"),
            by_key("adSoyad"),
            by_key("name"),
            by_type(FieldType::Text),
        ]),
        email: first_non_empty([by_key("email"), by_key("eposta"), by_type(FieldType::Email)]),
        phone: first_non_empty([by_key("phone"), by_key("telefon"), by_type(FieldType::Tel)]),
        reason: first_non_empty([
            by_key("reason"),
            by_key("message"),
            by_key("mesaj"),
            by_type(FieldType::Textarea),
        ]),
    }
}

fn value_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn first_non_empty<const N: usize>(candidates: [String; N]) -> String {
    candidates
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn default_config() -> VolunteerFormConfig {
        VolunteerFormConfig::default_config()
    }

    #[test]
    fn accepts_default_submission() {
        let payload = json!({
            "fullName": "Ali Veli",
            "email": "a@b.com",
            "phone": "05551234567",
            "reason": "Yardım etmek istiyorum çünkü..."
        });
        let data = validate_payload(&payload, &default_config()).unwrap();
        assert_eq!(data.get("fullName"), Some(&json!("Ali Veli")));
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn first_missing_required_field_wins() {
        // Both fullName and phone are missing; fullName is declared first.
        let payload = json!({"email": "a@b.com"});
        let err = validate_payload(&payload, &default_config()).unwrap_err();
        assert_eq!(err, "Ad Soyad zorunludur.");
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let payload = json!({
            "fullName": "   ",
            "email": "a@b.com",
            "phone": "05551234567",
            "reason": "Yardım etmek istiyorum çünkü..."
        });
        let err = validate_payload(&payload, &default_config()).unwrap_err();
        assert_eq!(err, "Ad Soyad zorunludur.");
    }

    #[test]
    fn rejects_malformed_email() {
        let payload = json!({
            "fullName": "Ali Veli",
            "email": "not-an-email",
            "phone": "05551234567",
            "reason": "Yardım etmek istiyorum çünkü..."
        });
        let err = validate_payload(&payload, &default_config()).unwrap_err();
        assert_eq!(err, "Geçerli bir e-posta adresi girin.");
    }

    #[test]
    fn rejects_short_phone() {
        let payload = json!({
            "fullName": "Ali Veli",
            "email": "a@b.com",
            "phone": "0555",
            "reason": "Yardım etmek istiyorum çünkü..."
        });
        let err = validate_payload(&payload, &default_config()).unwrap_err();
        assert_eq!(err, "Geçerli bir telefon numarası girin.");
    }

    #[test]
    fn enforces_min_length_with_label() {
        let payload = json!({
            "fullName": "Ali Veli",
            "email": "a@b.com",
            "phone": "05551234567",
            "reason": "kısa"
        });
        let err = validate_payload(&payload, &default_config()).unwrap_err();
        assert_eq!(err, "Başvuru Gerekçesi / Mesajınız en az 10 karakter olmalı.");
    }

    #[test]
    fn drops_keys_not_in_config() {
        let payload = json!({
            "fullName": "Ali Veli",
            "email": "a@b.com",
            "phone": "05551234567",
            "reason": "Yardım etmek istiyorum çünkü...",
            "injected": "evil"
        });
        let data = validate_payload(&payload, &default_config()).unwrap();
        assert!(!data.contains_key("injected"));
    }

    #[test]
    fn empty_checkbox_selection_has_its_own_message() {
        let config = VolunteerFormConfig {
            fields: vec![VolunteerFormField {
                id: "f1".to_string(),
                key: "areas".to_string(),
                label: "Destek Alanları".to_string(),
                field_type: FieldType::Checkbox,
                required: true,
                placeholder: None,
                options: Some(vec![FieldOption {
                    value: "saha".to_string(),
                    label: "Saha".to_string(),
                }]),
                min_length: None,
                max_length: None,
                rows: None,
            }],
            ..default_config()
        };
        let err = validate_payload(&json!({"areas": []}), &config).unwrap_err();
        assert_eq!(err, "Destek Alanları en az bir seçenek gerektirir.");
    }

    #[test]
    fn optional_field_may_be_absent() {
        let config = VolunteerFormConfig {
            fields: vec![VolunteerFormField {
                id: "f1".to_string(),
                key: "note".to_string(),
                label: "Not".to_string(),
                field_type: FieldType::Text,
                required: false,
                placeholder: None,
                options: None,
                min_length: None,
                max_length: None,
                rows: None,
            }],
            ..default_config()
        };
        let data = validate_payload(&json!({}), &config).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = validate_payload(&json!("text"), &default_config()).unwrap_err();
        assert_eq!(err, "Geçersiz form verisi.");
    }

    #[test]
    fn display_fields_from_exact_keys() {
        let payload = json!({
            "fullName": "Ali Veli",
            "email": "a@b.com",
            "phone": "05551234567",
            "reason": "Yardım etmek istiyorum çünkü..."
        });
        let data = validate_payload(&payload, &default_config()).unwrap();
        let display = extract_display_fields(&data, &default_config());
        assert_eq!(display.full_name, "Ali Veli");
        assert_eq!(display.email, "a@b.com");
    }

    #[test]
    fn display_fields_fall_back_to_aliases_and_types() {
        let config = VolunteerFormConfig {
            fields: vec![
                VolunteerFormField {
                    id: "f1".to_string(),
                    key: "adSoyad".to_string(),
                    label: "Ad Soyad".to_string(),
                    field_type: FieldType::Text,
                    required: true,
                    placeholder: None,
                    options: None,
                    min_length: None,
                    max_length: None,
                    rows: None,
                },
                VolunteerFormField {
                    id: "f2".to_string(),
                    key: "iletisimEposta".to_string(),
                    label: "E-posta".to_string(),
                    field_type: FieldType::Email,
                    required: true,
                    placeholder: None,
                    options: None,
                    min_length: None,
                    max_length: None,
                    rows: None,
                },
            ],
            ..default_config()
        };
        let payload = json!({"adSoyad": "Ayşe Demir", "iletisimEposta": "ayse@ornek.com"});
        let data = validate_payload(&payload, &config).unwrap();
        let display = extract_display_fields(&data, &config);
        // alias key for the name, type fallback for the custom email key
        assert_eq!(display.full_name, "Ayşe Demir");
        assert_eq!(display.email, "ayse@ornek.com");
        assert_eq!(display.phone, "-");
        assert_eq!(display.reason, "-");
    }

    #[test]
    fn checkbox_values_join_for_display() {
        let config = VolunteerFormConfig {
            fields: vec![VolunteerFormField {
                id: "f1".to_string(),
                key: "reason".to_string(),
                label: "Alanlar".to_string(),
                field_type: FieldType::Checkbox,
                required: true,
                placeholder: None,
                options: None,
                min_length: None,
                max_length: None,
                rows: None,
            }],
            ..default_config()
        };
        let data = validate_payload(&json!({"reason": ["saha", "lojistik"]}), &config).unwrap();
        let display = extract_display_fields(&data, &config);
        assert_eq!(display.reason, "saha, lojistik");
    }

    #[test]
    fn malformed_stored_config_falls_back_to_default() {
        // `fields` must be an array for the config to deserialize.
        let parsed = serde_json::from_str::<VolunteerFormConfig>(
            r#"{"title": "Eski Format", "fields": "yok"}"#,
        );
        assert!(parsed.is_err());

        let config: VolunteerFormConfig =
            serde_json::from_str(&serde_json::to_string(&VolunteerFormConfig::default_config()).unwrap())
                .unwrap();
        assert_eq!(config.fields.len(), 4);
        assert_eq!(config.fields[0].key, "fullName");
    }
}
