use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::env;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    Config(String),
    #[error("Email sending failed: {0}")]
    Send(#[from] lettre::transport::smtp::Error),
    #[error("Message building failed: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("Address parsing failed: {0}")]
    Address(#[from] lettre::address::AddressError),
}

#[derive(Debug, Clone)]
pub struct EmailTemplate {
    pub subject: String,
    pub html_body: String,
    pub text_body: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    /// Where contact-form notifications land.
    pub contact_inbox: String,
}

impl EmailConfig {
    pub fn from_env() -> Result<Self, EmailError> {
        let username = env::var("SMTP_USERNAME")
            .map_err(|_| EmailError::Config("SMTP_USERNAME not set".to_string()))?;
        let from_email = env::var("FROM_EMAIL").unwrap_or_else(|_| username.clone());
        let contact_inbox = env::var("CONTACT_INBOX").unwrap_or_else(|_| from_email.clone());

        Ok(Self {
            smtp_server: env::var("SMTP_SERVER")
                .map_err(|_| EmailError::Config("SMTP_SERVER not set".to_string()))?,
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .map_err(|_| EmailError::Config("Invalid SMTP_PORT".to_string()))?,
            password: env::var("SMTP_PASSWORD")
                .map_err(|_| EmailError::Config("SMTP_PASSWORD not set".to_string()))?,
            from_name: env::var("FROM_NAME").unwrap_or_else(|_| "Dernek".to_string()),
            username,
            from_email,
            contact_inbox,
        })
    }
}

pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl EmailService {
    pub fn new() -> Result<Self, EmailError> {
        let config = EmailConfig::from_env()?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)
            .map_err(|e| EmailError::Config(format!("SMTP relay error: {}", e)))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    pub fn contact_inbox(&self) -> &str {
        &self.config.contact_inbox
    }

    pub async fn send_email(
        &self,
        to_email: &str,
        reply_to: Option<&str>,
        template: EmailTemplate,
    ) -> Result<(), EmailError> {
        let from_address = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let mut message_builder = Message::builder()
            .from(from_address.parse()?)
            .to(to_email.parse()?)
            .subject(&template.subject);

        if let Some(reply_to) = reply_to {
            message_builder = message_builder.reply_to(reply_to.parse()?);
        }

        let message = if let Some(text_body) = &template.text_body {
            message_builder.multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(template.html_body.clone()),
                    ),
            )?
        } else {
            message_builder
                .header(ContentType::TEXT_HTML)
                .body(template.html_body.clone())?
        };

        info!("Sending email to: {}", to_email);
        self.mailer.send(message).await?;
        info!("Email sent successfully to: {}", to_email);

        Ok(())
    }

    pub fn generate_contact_template(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        message: &str,
    ) -> EmailTemplate {
        let html_body = format!(
            r#"
            <h3>Yeni Mesaj Geldi</h3>
            <p><strong>Ad Soyad:</strong> {}</p>
            <p><strong>Telefon:</strong> {}</p>
            <p><strong>E-posta:</strong> {}</p>
            <p><strong>Mesaj:</strong></p>
            <p>{}</p>
            "#,
            name, phone, email, message
        );

        let text_body = format!(
            "Yeni iletişim formu mesajı\n\nAd Soyad: {}\nTelefon: {}\nE-posta: {}\n\nMesaj:\n{}",
            name, phone, email, message
        );

        EmailTemplate {
            subject: "Yeni İletişim Formu Mesajı".to_string(),
            html_body,
            text_body: Some(text_body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_config() -> EmailService {
        let config = EmailConfig {
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            username: "dernek@ornek.com".to_string(),
            password: "app-password".to_string(),
            from_email: "dernek@ornek.com".to_string(),
            from_name: "Dernek".to_string(),
            contact_inbox: "dernek@ornek.com".to_string(),
        };
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)
            .unwrap()
            .port(config.smtp_port)
            .credentials(creds)
            .build();
        EmailService { mailer, config }
    }

    #[tokio::test]
    async fn contact_template_includes_all_fields() {
        let service = service_with_config();
        let template = service.generate_contact_template(
            "Ali Veli",
            "05551234567",
            "a@b.com",
            "Gönüllü olmak istiyorum.",
        );

        assert_eq!(template.subject, "Yeni İletişim Formu Mesajı");
        assert!(template.html_body.contains("Ali Veli"));
        assert!(template.html_body.contains("05551234567"));
        let text = template.text_body.unwrap();
        assert!(text.contains("a@b.com"));
        assert!(text.contains("Gönüllü olmak istiyorum."));
    }
}
