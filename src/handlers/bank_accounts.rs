use crate::{
    database::connection::DbPool,
    middleware::auth::AdminUser,
    models::bank_account::{BankAccount, BankAccountData, BankAccountError},
    requests::bank_account::BankAccountRequest,
    requests::validation_details,
    utils::helpers::ApiError,
};
use actix_web::{HttpResponse, Result, web};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize)]
struct BankGroup {
    name: String,
    accounts: Vec<String>,
}

/// Public listing groups active accounts under their bank, one display line
/// per account, in stored order.
pub async fn list_public(pool: web::Data<DbPool>) -> Result<HttpResponse> {
    let accounts = match BankAccount::list_active(&pool).await {
        Ok(accounts) => accounts,
        Err(e) => {
            error!("Database error listing bank accounts: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Hesaplar yüklenemedi")));
        }
    };

    let mut banks: Vec<BankGroup> = Vec::new();
    for account in accounts {
        let line = format!("{} IBAN: {}", account.currency, account.iban);
        match banks.iter_mut().find(|bank| bank.name == account.bank_name) {
            Some(bank) => bank.accounts.push(line),
            None => banks.push(BankGroup {
                name: account.bank_name,
                accounts: vec![line],
            }),
        }
    }

    Ok(HttpResponse::Ok().json(json!({ "banks": banks })))
}

pub async fn admin_list(pool: web::Data<DbPool>, _admin: AdminUser) -> Result<HttpResponse> {
    match BankAccount::list_all(&pool).await {
        Ok(accounts) => Ok(HttpResponse::Ok().json(json!({ "accounts": accounts }))),
        Err(e) => {
            error!("Database error listing bank accounts: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Hesaplar yüklenemedi")))
        }
    }
}

fn account_data(request: &BankAccountRequest, iban: String) -> BankAccountData {
    BankAccountData {
        bank_name: request.bank_name.clone(),
        branch: request.branch.clone(),
        iban,
        currency: request.currency.to_uppercase(),
        order: request.order,
        is_active: request.is_active,
    }
}

pub async fn admin_create(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    request: web::Json<BankAccountRequest>,
) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiError::with_details("VALIDATION_ERROR", validation_details(&errors))));
    }

    let iban = request.normalized_iban();
    match BankAccount::find_by_iban(&pool, &iban).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict()
                .json(ApiError::with_message("IBAN_EXISTS", "Bu IBAN zaten kayıtlı")));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Database error checking IBAN: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Hesap oluşturulamadı")));
        }
    }

    match BankAccount::create(&pool, account_data(&request, iban)).await {
        Ok(account) => {
            info!("Successfully created bank account with ID: {}", account.id);
            Ok(HttpResponse::Created().json(json!({ "account": account })))
        }
        Err(e) => {
            error!("Database error creating bank account: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Hesap oluşturulamadı")))
        }
    }
}

pub async fn admin_update(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    request: web::Json<BankAccountRequest>,
) -> Result<HttpResponse> {
    let account_id = path.into_inner();

    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiError::with_details("VALIDATION_ERROR", validation_details(&errors))));
    }

    let existing = match BankAccount::find_by_id(&pool, account_id).await {
        Ok(Some(account)) => account,
        Ok(None) => return Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND"))),
        Err(e) => {
            error!("Database error getting bank account {}: {}", account_id, e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Hesap güncellenemedi")));
        }
    };

    let iban = request.normalized_iban();
    if iban != existing.iban {
        match BankAccount::find_by_iban(&pool, &iban).await {
            Ok(Some(_)) => {
                return Ok(HttpResponse::Conflict()
                    .json(ApiError::with_message("IBAN_EXISTS", "Bu IBAN zaten kayıtlı")));
            }
            Ok(None) => {}
            Err(e) => {
                error!("Database error checking IBAN: {}", e);
                return Ok(HttpResponse::InternalServerError()
                    .json(ApiError::with_message("INTERNAL_ERROR", "Hesap güncellenemedi")));
            }
        }
    }

    match BankAccount::update(&pool, account_id, account_data(&request, iban)).await {
        Ok(account) => {
            info!("Successfully updated bank account: {}", account_id);
            Ok(HttpResponse::Ok().json(json!({ "account": account })))
        }
        Err(BankAccountError::NotFound { .. }) => {
            Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND")))
        }
        Err(BankAccountError::Database(e)) => {
            error!("Database error updating bank account {}: {}", account_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Hesap güncellenemedi")))
        }
    }
}

pub async fn admin_delete(
    pool: web::Data<DbPool>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let account_id = path.into_inner();

    match BankAccount::delete(&pool, account_id).await {
        Ok(()) => {
            info!("Successfully deleted bank account: {}", account_id);
            Ok(HttpResponse::Ok().json(json!({ "success": true })))
        }
        Err(BankAccountError::NotFound { .. }) => {
            Ok(HttpResponse::NotFound().json(ApiError::new("NOT_FOUND")))
        }
        Err(BankAccountError::Database(e)) => {
            error!("Database error deleting bank account {}: {}", account_id, e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("INTERNAL_ERROR", "Hesap silinemedi")))
        }
    }
}
