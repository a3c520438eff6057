//! Lead intake: form validation, spreadsheet storage and confirmation email.

pub mod domain;
pub mod mailer;
pub mod router;
pub mod service;
pub mod sheets;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{IntakeForm, SubmissionReceipt, SubmissionRecord};
pub use mailer::{confirmation_email, ConfirmationEmail, ConfirmationMailer, MailError, SmtpMailer};
pub use router::intake_router;
pub use service::{IntakeError, IntakeService};
pub use sheets::GoogleSheetsStore;
pub use store::{CsvFileStore, StoreError, SubmissionStore};
pub use validation::{validate_form, ValidatedIntake, ValidationError};
