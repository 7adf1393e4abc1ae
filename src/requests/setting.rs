use serde::Deserialize;
use serde_json::Value;

/// Admin settings upsert: the whole JSON document for one enumerated key.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct SettingQuery {
    pub key: Option<String>,
}
