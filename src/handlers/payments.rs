use crate::{
    database::connection::DbPool,
    middleware::auth::AdminUser,
    models::donation::{CreateDonation, Donation, DonationStatus},
    models::donation_category::DonationCategory,
    requests::payment::DonationPayRequest,
    requests::validation_details,
    services::iyzico::{self, IyzicoClient, PaymentOutcome, PaymentParams},
    utils::helpers::{ApiError, decimal_from_f64},
    utils::pagination::{PageQuery, Pagination},
};
use actix_web::{HttpRequest, HttpResponse, Result, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

/// Fixed-price categories accept the submitted amount only within an absolute
/// 0.01 tolerance.
fn within_fixed_price_tolerance(amount: Decimal, fixed_price: Decimal) -> bool {
    (amount - fixed_price).abs() <= Decimal::new(1, 2)
}

fn client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(first) = value.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return Some(first.to_string());
                }
            }
        }
    }
    req.headers()
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// Donation payment orchestration: configuration gate, request validation,
/// category checks, PENDING record, gateway charge, then either the FAILED
/// path or the atomic COMPLETED + collected increment.
pub async fn pay(
    pool: web::Data<DbPool>,
    req: HttpRequest,
    request: web::Json<DonationPayRequest>,
) -> Result<HttpResponse> {
    // The configuration check precedes any row creation.
    let settings = match iyzico::resolve_settings(&pool).await {
        Some(settings) => settings,
        None => {
            return Ok(HttpResponse::ServiceUnavailable().json(ApiError::with_message(
                "PAYMENT_NOT_CONFIGURED",
                "Ödeme sistemi yapılandırılmamış",
            )));
        }
    };

    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiError::with_details("VALIDATION_ERROR", validation_details(&errors))));
    }

    let amount = match decimal_from_f64(request.amount) {
        Some(amount) => amount,
        None => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiError::with_message("INVALID_AMOUNT", "Geçersiz miktar")));
        }
    };

    let category = match DonationCategory::find_active_by_id(&pool, request.category_id).await {
        Ok(Some(category)) => category,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiError::with_message(
                "CATEGORY_NOT_FOUND",
                "Bağış kategorisi bulunamadı",
            )));
        }
        Err(e) => {
            error!("Database error loading category {}: {}", request.category_id, e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Bağış işlenemedi")));
        }
    };

    if let Some(fixed_price) = category.fixed_price {
        if !within_fixed_price_tolerance(amount, fixed_price) {
            return Ok(HttpResponse::BadRequest().json(ApiError::with_message(
                "INVALID_AMOUNT",
                format!("Bu kategori için sabit miktar: {} TRY", fixed_price),
            )));
        }
    }

    let ip = client_ip(&req);
    let donation = match Donation::create_pending(
        &pool,
        CreateDonation {
            category_id: category.id,
            amount,
            currency: "TRY".to_string(),
            donor_name: request.donor_name.clone(),
            donor_email: request.donor_email.clone(),
            donor_phone: request.donor_phone.clone(),
            donor_identity_number: request.donor_identity_number.clone(),
            ip: ip.clone(),
        },
    )
    .await
    {
        Ok(donation) => donation,
        Err(e) => {
            error!("Database error creating donation: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Bağış işlenemedi")));
        }
    };

    info!("Created pending donation {} for category {}", donation.id, category.id);

    let params = PaymentParams {
        category_id: category.id,
        category_name: category.name.clone(),
        amount,
        donor_name: request.donor_name.clone(),
        donor_email: request.donor_email.clone(),
        donor_phone: request.donor_phone.clone(),
        donor_identity_number: request.donor_identity_number.clone(),
        card_holder_name: request.payment_card.card_holder_name.clone(),
        card_number: request.payment_card.card_number.clone(),
        expire_month: request.payment_card.expire_month.clone(),
        expire_year: request.payment_card.expire_year.clone(),
        cvc: request.payment_card.cvc.clone(),
        contact_name: request.billing_address.contact_name.clone(),
        city: request.billing_address.city.clone(),
        country: request.billing_address.country.clone(),
        address: request.billing_address.address.clone(),
        zip_code: request.billing_address.zip_code.clone(),
        ip,
    };

    let outcome = match IyzicoClient::new(settings) {
        Ok(client) => client.create_payment(&params).await,
        Err(e) => Err(e),
    };

    let (payment_id, conversation_id) = match outcome {
        Ok(PaymentOutcome::Success {
            payment_id,
            conversation_id,
        }) => (payment_id, conversation_id),
        Ok(PaymentOutcome::Failure {
            error_code,
            error_message,
        }) => {
            warn!(
                "Gateway declined donation {}: {:?} {:?}",
                donation.id, error_code, error_message
            );
            fail_donation(&pool, donation.id).await;
            let mut body = ApiError::with_message(
                "PAYMENT_FAILED",
                error_message.unwrap_or_else(|| "Ödeme işlemi başarısız".to_string()),
            );
            if let Some(code) = error_code {
                body = body.and_details(json!({ "errorCode": code }));
            }
            return Ok(HttpResponse::PaymentRequired().json(body));
        }
        Err(e) => {
            error!("Gateway call failed for donation {}: {}", donation.id, e);
            fail_donation(&pool, donation.id).await;
            return Ok(HttpResponse::PaymentRequired()
                .json(ApiError::with_message("PAYMENT_FAILED", "Ödeme işlemi başarısız")));
        }
    };

    if let Err(e) = Donation::complete(
        &pool,
        donation.id,
        category.id,
        amount,
        &payment_id,
        &conversation_id,
    )
    .await
    {
        // Charge went through but local state did not; the row stays PENDING
        // and is visible in the admin transactions listing for reconciliation.
        error!("Failed to finalize donation {}: {}", donation.id, e);
        return Ok(HttpResponse::InternalServerError()
            .json(ApiError::with_message("INTERNAL_ERROR", "Bağış kaydedilemedi")));
    }

    info!("Completed donation {} with payment {}", donation.id, payment_id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "donationId": donation.id,
        "message": "Bağışınız başarıyla alındı. Teşekkür ederiz.",
    })))
}

async fn fail_donation(pool: &DbPool, id: Uuid) {
    if let Err(e) = Donation::mark_failed(pool, id).await {
        error!("Failed to mark donation {} as failed: {}", id, e);
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category_id: Option<Uuid>,
    pub status: Option<String>,
}

pub async fn admin_transactions(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    query: web::Query<TransactionQuery>,
) -> Result<HttpResponse> {
    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit, offset) = page_query.resolve(20, 100);
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<DonationStatus>().ok());

    let donations =
        match Donation::list(&pool, query.category_id, status.clone(), limit, offset).await {
            Ok(donations) => donations,
            Err(e) => {
                error!("Database error listing donations: {}", e);
                return Ok(HttpResponse::InternalServerError()
                    .json(ApiError::with_message("INTERNAL_ERROR", "İşlemler yüklenemedi")));
            }
        };
    let total = match Donation::count(&pool, query.category_id, status).await {
        Ok(total) => total,
        Err(e) => {
            error!("Database error counting donations: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "İşlemler yüklenemedi")));
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "donations": donations,
        "pagination": Pagination::new(page, limit, total),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_price_tolerance_is_one_kurus() {
        let fixed = Decimal::new(25000, 2); // 250.00
        assert!(within_fixed_price_tolerance(Decimal::new(25000, 2), fixed));
        assert!(within_fixed_price_tolerance(Decimal::new(25001, 2), fixed));
        assert!(within_fixed_price_tolerance(Decimal::new(24999, 2), fixed));
        assert!(!within_fixed_price_tolerance(Decimal::new(25002, 2), fixed));
        assert!(!within_fixed_price_tolerance(Decimal::new(10000, 2), fixed));
    }
}
