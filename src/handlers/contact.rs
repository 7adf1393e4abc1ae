use crate::{
    requests::contact::ContactMessageRequest,
    requests::validation_details,
    services::email::EmailService,
    utils::helpers::ApiError,
};
use actix_web::{HttpResponse, Result, web};
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

/// Public contact form: validates and forwards the message to the
/// organization inbox over SMTP.
pub async fn submit(request: web::Json<ContactMessageRequest>) -> Result<HttpResponse> {
    if let Err(errors) = request.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiError::with_details("VALIDATION_ERROR", validation_details(&errors))));
    }

    let email_service = match EmailService::new() {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to create email service: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("MAIL_ERROR", "Mail gönderilemedi")));
        }
    };

    let template = email_service.generate_contact_template(
        &request.name,
        &request.phone,
        &request.email,
        &request.message,
    );
    let inbox = email_service.contact_inbox().to_string();

    match email_service
        .send_email(&inbox, Some(&request.email), template)
        .await
    {
        Ok(()) => {
            info!("Forwarded contact message from {}", request.email);
            Ok(HttpResponse::Ok().json(json!({ "success": true })))
        }
        Err(e) => {
            error!("Failed to send contact message: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiError::with_message("MAIL_ERROR", "Mail gönderilemedi")))
        }
    }
}
