//! Email service for contact form notifications.
//!
//! Uses SMTP via lettre. Delivery failures are reported to the caller and
//! never retried.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactMessage {
    /// Enquiry type; becomes the mail subject.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "comp", default)]
    pub company: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactMessage {
    /// Names of required fields that are missing or blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("type", &self.kind),
            ("name", &self.name),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(field, _)| field)
        .collect()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        self.kind.as_deref().map_or("", str::trim)
    }

    /// Plain text body of the notification.
    #[must_use]
    pub fn body(&self) -> String {
        let field = |value: &Option<String>| value.as_deref().map_or("", str::trim).to_owned();
        format!(
            ":Noble Paints Customers:\nName: {}\nCompany Name: {}\nPhone: {}\nMessage: {}\n",
            field(&self.name),
            field(&self.company),
            field(&self.phone),
            field(&self.message),
        )
    }
}

/// Email service for sending notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    contact_recipient: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let builder = if config.implicit_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };
        let mut builder = builder.port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_string(),
            ));
        }

        Ok(Self {
            mailer: builder.build(),
            from_address: config.from_address.clone(),
            contact_recipient: config.contact_recipient.clone(),
        })
    }

    /// Forward a contact form submission to the configured recipient.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be built or delivered.
    pub async fn send_contact_message(&self, message: &ContactMessage) -> Result<(), EmailError> {
        self.send_text_email(&self.contact_recipient, message.subject(), message.body())
            .await
    }

    async fn send_text_email(&self, to: &str, subject: &str, body: String) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(kind: &str, name: &str, phone: &str) -> ContactMessage {
        ContactMessage {
            kind: Some(kind.to_owned()),
            name: Some(name.to_owned()),
            phone: Some(phone.to_owned()),
            company: None,
            message: Some("Need 20L of primer".to_owned()),
        }
    }

    #[test]
    fn test_missing_fields_in_declared_order() {
        assert_eq!(
            message("", "Sara", " ").missing_fields(),
            vec!["type", "phone"]
        );
        assert!(message("Quote", "Sara", "0500").missing_fields().is_empty());
        assert_eq!(
            ContactMessage::default().missing_fields(),
            vec!["type", "name", "phone"]
        );
    }

    #[test]
    fn test_body_layout() {
        let body = message("Quote", "Sara", "0500").body();
        assert_eq!(
            body,
            ":Noble Paints Customers:\nName: Sara\nCompany Name: \nPhone: 0500\nMessage: Need 20L of primer\n"
        );
    }

    #[test]
    fn test_deserialize_form_field_names() {
        let parsed: ContactMessage =
            serde_json::from_str(r#"{"type":"Quote","name":"A","phone":"1","comp":"Acme"}"#)
                .unwrap_or_default();
        assert_eq!(parsed.subject(), "Quote");
        assert_eq!(parsed.company.as_deref(), Some("Acme"));
    }
}
