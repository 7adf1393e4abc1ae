use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::database::connection::DbPool;
use crate::models::setting::{Setting, SettingKey};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_BASE_URI: &str = "https://sandbox-api.iyzipay.com";

const PAYMENT_PATH: &str = "/payment/auth";

/// Fixed processing markup applied on top of the donated amount.
const MARKUP_NUMERATOR: i64 = 102;

#[derive(Error, Debug)]
pub enum IyzicoError {
    #[error("Gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Gateway request could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Value of the `iyzico` setting; also the shape of the env override.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IyzicoSettings {
    pub api_key: String,
    pub secret_key: String,
    pub base_uri: String,
}

impl Default for IyzicoSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            base_uri: DEFAULT_BASE_URI.to_string(),
        }
    }
}

impl IyzicoSettings {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

// The secret never reaches logs, not even through Debug formatting.
impl fmt::Debug for IyzicoSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IyzicoSettings")
            .field("api_key", &self.api_key)
            .field("secret_key", &"***")
            .field("base_uri", &self.base_uri)
            .finish()
    }
}

/// Credential precedence: env vars when both are non-empty, otherwise the
/// `iyzico` setting row when both of its fields are non-empty, otherwise
/// unconfigured.
pub async fn resolve_settings(pool: &DbPool) -> Option<IyzicoSettings> {
    let api_key = env::var("IYZIPAY_API_KEY").unwrap_or_default();
    let secret_key = env::var("IYZIPAY_SECRET_KEY").unwrap_or_default();
    if !api_key.is_empty() && !secret_key.is_empty() {
        let base_uri = env::var("IYZIPAY_URI")
            .ok()
            .filter(|uri| !uri.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URI.to_string());
        return Some(IyzicoSettings {
            api_key,
            secret_key,
            base_uri,
        });
    }

    let mut stored = Setting::fetch_json::<IyzicoSettings>(pool, SettingKey::Iyzico).await?;
    if !stored.is_configured() {
        return None;
    }
    if stored.base_uri.is_empty() {
        stored.base_uri = DEFAULT_BASE_URI.to_string();
    }
    Some(stored)
}

/// Everything the gateway needs for one donation attempt, already validated.
#[derive(Debug, Clone)]
pub struct PaymentParams {
    pub category_id: Uuid,
    pub category_name: String,
    pub amount: Decimal,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub donor_identity_number: Option<String>,
    pub card_holder_name: String,
    pub card_number: String,
    pub expire_month: String,
    pub expire_year: String,
    pub cvc: String,
    pub contact_name: String,
    pub city: String,
    pub country: String,
    pub address: String,
    pub zip_code: String,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CardPayload {
    card_holder_name: String,
    card_number: String,
    expire_month: String,
    expire_year: String,
    cvc: String,
    register_card: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuyerPayload {
    id: String,
    name: String,
    surname: String,
    gsm_number: String,
    email: String,
    identity_number: String,
    last_login_date: String,
    registration_date: String,
    registration_address: String,
    ip: String,
    city: String,
    country: String,
    zip_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddressPayload {
    contact_name: String,
    city: String,
    country: String,
    address: String,
    zip_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BasketItemPayload {
    id: String,
    name: String,
    category1: String,
    category2: String,
    item_type: String,
    price: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentPayload {
    locale: String,
    conversation_id: String,
    price: String,
    paid_price: String,
    currency: String,
    installment: String,
    basket_id: String,
    payment_channel: String,
    payment_group: String,
    payment_card: CardPayload,
    buyer: BuyerPayload,
    shipping_address: AddressPayload,
    billing_address: AddressPayload,
    basket_items: Vec<BasketItemPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GatewayResponse {
    status: Option<String>,
    payment_id: Option<String>,
    error_code: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success {
        payment_id: String,
        conversation_id: String,
    },
    Failure {
        error_code: Option<String>,
        error_message: Option<String>,
    },
}

pub struct IyzicoClient {
    settings: IyzicoSettings,
    http: reqwest::Client,
}

impl IyzicoClient {
    pub fn new(settings: IyzicoSettings) -> Result<Self, IyzicoError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { settings, http })
    }

    /// Synchronous card charge with a freshly generated conversation id. A
    /// transport failure or timeout surfaces as `Err`; a gateway-side decline
    /// as `Ok(Failure)`.
    pub async fn create_payment(
        &self,
        params: &PaymentParams,
    ) -> Result<PaymentOutcome, IyzicoError> {
        let conversation_id = generate_conversation_id();
        let payload = build_payment_payload(params, &conversation_id);
        let body = serde_json::to_string(&payload)?;

        let random_key = generate_random_key();
        let authorization =
            authorization_header(&self.settings, &random_key, PAYMENT_PATH, &body);

        info!(
            "Creating gateway payment, conversation id: {}",
            conversation_id
        );

        let response = self
            .http
            .post(format!("{}{}", self.settings.base_uri, PAYMENT_PATH))
            .header("Authorization", authorization)
            .header("x-iyzi-rnd", random_key)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let result: GatewayResponse = response.json().await?;

        match (result.status.as_deref(), result.payment_id) {
            (Some("success"), Some(payment_id)) => Ok(PaymentOutcome::Success {
                payment_id,
                conversation_id,
            }),
            _ => Ok(PaymentOutcome::Failure {
                error_code: result.error_code,
                error_message: result.error_message,
            }),
        }
    }
}

fn generate_conversation_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("don-{}-{}", Utc::now().timestamp_millis(), suffix)
}

fn generate_random_key() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);
    format!("{}{}", Utc::now().timestamp_millis(), suffix)
}

/// IYZWSv2 header: hex HMAC-SHA256 over `randomKey + uriPath + body`, wrapped
/// in base64 together with the api key.
fn authorization_header(
    settings: &IyzicoSettings,
    random_key: &str,
    uri_path: &str,
    body: &str,
) -> String {
    let payload = format!("{}{}{}", random_key, uri_path, body);
    let mut mac = HmacSha256::new_from_slice(settings.secret_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    let authorization_params = format!(
        "apiKey:{}&randomKey:{}&signature:{}",
        settings.api_key, random_key, signature
    );
    format!("IYZWSv2 {}", BASE64.encode(authorization_params))
}

fn build_payment_payload(params: &PaymentParams, conversation_id: &str) -> PaymentPayload {
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let category_id = params.category_id.to_string();

    let first_name = params
        .donor_name
        .split_whitespace()
        .next()
        .unwrap_or(&params.donor_name)
        .to_string();
    let surname = {
        let rest: Vec<&str> = params.donor_name.split_whitespace().skip(1).collect();
        if rest.is_empty() {
            params.donor_name.clone()
        } else {
            rest.join(" ")
        }
    };

    PaymentPayload {
        locale: "tr".to_string(),
        conversation_id: conversation_id.to_string(),
        price: format_price(params.amount),
        paid_price: format_price(marked_up(params.amount)),
        currency: "TRY".to_string(),
        installment: "1".to_string(),
        basket_id: format!("BASKET-{}", &category_id[category_id.len() - 8..]),
        payment_channel: "WEB".to_string(),
        payment_group: "PRODUCT".to_string(),
        payment_card: CardPayload {
            card_holder_name: params.card_holder_name.clone(),
            card_number: params
                .card_number
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
            expire_month: params.expire_month.clone(),
            expire_year: params.expire_year.clone(),
            cvc: params.cvc.clone(),
            register_card: "0".to_string(),
        },
        buyer: BuyerPayload {
            id: buyer_id(&params.donor_email),
            name: first_name,
            surname,
            gsm_number: normalize_gsm(&params.donor_phone),
            email: params.donor_email.clone(),
            identity_number: params
                .donor_identity_number
                .clone()
                .unwrap_or_else(|| "11111111111".to_string()),
            last_login_date: now.clone(),
            registration_date: now,
            registration_address: params.address.clone(),
            ip: params
                .ip
                .clone()
                .unwrap_or_else(|| "85.34.78.112".to_string()),
            city: params.city.clone(),
            country: params.country.clone(),
            zip_code: params.zip_code.clone(),
        },
        shipping_address: AddressPayload {
            contact_name: params.contact_name.clone(),
            city: params.city.clone(),
            country: params.country.clone(),
            address: params.address.clone(),
            zip_code: params.zip_code.clone(),
        },
        billing_address: AddressPayload {
            contact_name: params.contact_name.clone(),
            city: params.city.clone(),
            country: params.country.clone(),
            address: params.address.clone(),
            zip_code: params.zip_code.clone(),
        },
        basket_items: vec![BasketItemPayload {
            id: format!("BI-{}", category_id),
            name: params.category_name.clone(),
            category1: "Donation".to_string(),
            category2: "Bağış".to_string(),
            item_type: "VIRTUAL".to_string(),
            price: format_price(params.amount),
        }],
    }
}

pub fn marked_up(amount: Decimal) -> Decimal {
    (amount * Decimal::new(MARKUP_NUMERATOR, 2)).round_dp(2)
}

fn format_price(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn buyer_id(email: &str) -> String {
    let prefix: String = email
        .chars()
        .take(20)
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("BY-{}", prefix)
}

fn normalize_gsm(phone: &str) -> String {
    if phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("+90{}", phone.strip_prefix('0').unwrap_or(phone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(amount: Decimal) -> PaymentParams {
        PaymentParams {
            category_id: Uuid::parse_str("6c1f4f60-1c24-47f3-9e6b-aabbccdd1234").unwrap(),
            category_name: "Su Kuyusu".to_string(),
            amount,
            donor_name: "Ali Veli Demir".to_string(),
            donor_email: "ali.veli@ornek.com".to_string(),
            donor_phone: "05551234567".to_string(),
            donor_identity_number: None,
            card_holder_name: "Ali Veli".to_string(),
            card_number: "5528 7900 0000 0008".to_string(),
            expire_month: "12".to_string(),
            expire_year: "2030".to_string(),
            cvc: "123".to_string(),
            contact_name: "Ali Veli".to_string(),
            city: "Sakarya".to_string(),
            country: "Türkiye".to_string(),
            address: "Cumhuriyet Mah. No:2".to_string(),
            zip_code: "54100".to_string(),
            ip: Some("10.0.0.1".to_string()),
        }
    }

    #[test]
    fn paid_price_carries_two_percent_markup() {
        assert_eq!(marked_up(Decimal::new(10000, 2)), Decimal::new(10200, 2));
        assert_eq!(format_price(marked_up(Decimal::new(100, 0))), "102.00");
        assert_eq!(format_price(marked_up(Decimal::new(5050, 2))), "51.51");
    }

    #[test]
    fn payload_derives_buyer_and_basket() {
        let payload = build_payment_payload(&params(Decimal::new(100, 0)), "don-1-abc");
        assert_eq!(payload.price, "100.00");
        assert_eq!(payload.paid_price, "102.00");
        assert_eq!(payload.buyer.name, "Ali");
        assert_eq!(payload.buyer.surname, "Veli Demir");
        assert_eq!(payload.buyer.gsm_number, "+905551234567");
        assert_eq!(payload.buyer.identity_number, "11111111111");
        assert_eq!(payload.basket_id, "BASKET-ccdd1234");
        assert_eq!(payload.payment_card.card_number, "5528790000000008");
        assert_eq!(payload.basket_items[0].item_type, "VIRTUAL");
    }

    #[test]
    fn single_word_name_repeats_as_surname() {
        let mut p = params(Decimal::new(100, 0));
        p.donor_name = "Ali".to_string();
        let payload = build_payment_payload(&p, "don-1-abc");
        assert_eq!(payload.buyer.name, "Ali");
        assert_eq!(payload.buyer.surname, "Ali");
    }

    #[test]
    fn international_phone_passes_through() {
        assert_eq!(normalize_gsm("+491701234567"), "+491701234567");
        assert_eq!(normalize_gsm("05551234567"), "+905551234567");
        assert_eq!(normalize_gsm("5551234567"), "+905551234567");
    }

    #[test]
    fn buyer_id_strips_non_alphanumerics() {
        assert_eq!(buyer_id("ali.veli@ornek.com"), "BY-aliveliornekcom");
    }

    #[test]
    fn authorization_header_shape() {
        let settings = IyzicoSettings {
            api_key: "sandbox-key".to_string(),
            secret_key: "sandbox-secret".to_string(),
            base_uri: DEFAULT_BASE_URI.to_string(),
        };
        let header = authorization_header(&settings, "17000000000001", PAYMENT_PATH, "{}");
        let encoded = header.strip_prefix("IYZWSv2 ").unwrap();
        let decoded = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
        assert!(decoded.starts_with("apiKey:sandbox-key&randomKey:17000000000001&signature:"));
        let signature = decoded.rsplit(':').next().unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_redacts_secret() {
        let settings = IyzicoSettings {
            api_key: "key".to_string(),
            secret_key: "very-secret".to_string(),
            base_uri: DEFAULT_BASE_URI.to_string(),
        };
        let formatted = format!("{:?}", settings);
        assert!(!formatted.contains("very-secret"));
    }
}
