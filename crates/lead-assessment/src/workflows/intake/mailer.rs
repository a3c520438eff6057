use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use super::domain::SubmissionRecord;
use crate::config::EmailConfig;
use crate::workflows::assessment::report::render::escape_html;

pub const CONFIRMATION_SUBJECT: &str = "Assessment Form Submission Confirmation";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },
    #[error("unable to build email: {0}")]
    Build(String),
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound confirmation channel.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync + std::fmt::Debug {
    async fn send(&self, email: ConfirmationEmail) -> Result<(), MailError>;
}

pub fn confirmation_email(record: &SubmissionRecord) -> ConfirmationEmail {
    let html_body = format!(
        "<h2>Thank you for submitting the assessment form!</h2>\n\
         <p>We have received your submission and will review it shortly.</p>\n\
         <h3>Submission Details:</h3>\n\
         <ul>\n\
         <li>Child's Age: {age}</li>\n\
         <li>Child's Gender: {gender}</li>\n\
         </ul>\n\
         <p>We will contact you at {email} or WhatsApp: {contact} if we need any additional information.</p>\n",
        age = escape_html(record.age_group.label()),
        gender = escape_html(record.gender.label()),
        email = escape_html(&record.contact.email),
        contact = escape_html(&record.contact.contact),
    );

    ConfirmationEmail {
        to: record.contact.email.clone(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        html_body,
    }
}

/// SMTP relay (STARTTLS) sender. The blocking transport runs off the async runtime.
#[derive(Clone)]
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, email: &ConfirmationEmail) -> Result<Message, MailError> {
        let from = self
            .config
            .from_address
            .parse()
            .map_err(|err: lettre::address::AddressError| MailError::Address {
                address: self.config.from_address.clone(),
                reason: err.to_string(),
            })?;
        let to = email
            .to
            .parse()
            .map_err(|err: lettre::address::AddressError| MailError::Address {
                address: email.to.clone(),
                reason: err.to_string(),
            })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|err| MailError::Build(err.to_string()))
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("smtp_host", &self.config.smtp_host)
            .field("smtp_port", &self.config.smtp_port)
            .field("from_address", &self.config.from_address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ConfirmationMailer for SmtpMailer {
    async fn send(&self, email: ConfirmationEmail) -> Result<(), MailError> {
        let message = self.build_message(&email)?;
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let credentials = Credentials::new(config.username.clone(), config.password.clone());
            let transport = SmtpTransport::starttls_relay(&config.smtp_host)
                .map_err(|err| MailError::Transport(format!("SMTP relay error: {err}")))?
                .port(config.smtp_port)
                .credentials(credentials)
                .build();
            transport
                .send(&message)
                .map(|_| ())
                .map_err(|err| MailError::Transport(format!("SMTP send failed: {err}")))
        })
        .await
        .map_err(|err| MailError::Transport(err.to_string()))??;

        info!(to = %email.to, "confirmation email sent");
        Ok(())
    }
}
