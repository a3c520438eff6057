use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{IntakeForm, SubmissionReceipt, SubmissionRecord};
use super::mailer::{confirmation_email, ConfirmationMailer, MailError};
use super::store::{StoreError, SubmissionStore};
use super::validation::{validate_form, ValidationError};
use crate::workflows::assessment::QuestionBank;

/// Validates a finished intake form, stores it, then sends the confirmation email.
#[derive(Debug, Clone)]
pub struct IntakeService {
    bank: Arc<QuestionBank>,
    store: Arc<dyn SubmissionStore>,
    mailer: Arc<dyn ConfirmationMailer>,
}

impl IntakeService {
    pub fn new(
        bank: Arc<QuestionBank>,
        store: Arc<dyn SubmissionStore>,
        mailer: Arc<dyn ConfirmationMailer>,
    ) -> Self {
        Self {
            bank,
            store,
            mailer,
        }
    }

    /// Storage happens before the email; a store failure means no email is sent.
    pub async fn submit(&self, form: IntakeForm) -> Result<SubmissionReceipt, IntakeError> {
        let validated = validate_form(&form, &self.bank).map_err(|err| {
            warn!(reason = err.title(), detail = %err, "rejected intake form");
            err
        })?;

        let record = SubmissionRecord::new(
            &validated.responses,
            validated.gender,
            &self.bank,
            Utc::now(),
        );

        self.store.append(&record).await?;
        self.mailer.send(confirmation_email(&record)).await?;

        info!(
            age_group = %record.age_group,
            answered = record.answered_count(),
            total = record.answers.len(),
            "assessment submission recorded"
        );

        Ok(SubmissionReceipt {
            submitted_at: record.submitted_at,
            age_group: record.age_group,
            answered: record.answered_count(),
            total: record.answers.len(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Mail(#[from] MailError),
}
