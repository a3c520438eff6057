use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::QuestionBank;
use crate::workflows::intake::domain::{IntakeForm, SubmissionRecord};
use crate::workflows::intake::mailer::{ConfirmationEmail, ConfirmationMailer, MailError};
use crate::workflows::intake::store::{StoreError, SubmissionStore};
use crate::workflows::intake::IntakeService;

#[derive(Debug, Default)]
pub(super) struct MemoryStore {
    pub(super) rows: Mutex<Vec<SubmissionRecord>>,
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn append(&self, record: &SubmissionRecord) -> Result<(), StoreError> {
        self.rows.lock().expect("store mutex").push(record.clone());
        Ok(())
    }
}

#[derive(Debug)]
pub(super) struct UnavailableStore;

#[async_trait]
impl SubmissionStore for UnavailableStore {
    async fn append(&self, _record: &SubmissionRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}

#[derive(Debug, Default)]
pub(super) struct MemoryMailer {
    pub(super) sent: Mutex<Vec<ConfirmationEmail>>,
}

#[async_trait]
impl ConfirmationMailer for MemoryMailer {
    async fn send(&self, email: ConfirmationEmail) -> Result<(), MailError> {
        self.sent.lock().expect("mailer mutex").push(email);
        Ok(())
    }
}

#[derive(Debug)]
pub(super) struct FailingMailer;

#[async_trait]
impl ConfirmationMailer for FailingMailer {
    async fn send(&self, _email: ConfirmationEmail) -> Result<(), MailError> {
        Err(MailError::Transport("connection refused".to_string()))
    }
}

pub(super) fn bank() -> Arc<QuestionBank> {
    Arc::new(QuestionBank::bundled().expect("bundled bank loads"))
}

pub(super) fn build_service() -> (Arc<IntakeService>, Arc<MemoryStore>, Arc<MemoryMailer>) {
    let store = Arc::new(MemoryStore::default());
    let mailer = Arc::new(MemoryMailer::default());
    let service = Arc::new(IntakeService::new(bank(), store.clone(), mailer.clone()));
    (service, store, mailer)
}

pub(super) fn form() -> IntakeForm {
    IntakeForm {
        name: "Jo Parent".to_string(),
        email: "jo@example.com".to_string(),
        contact: "+91 98765 43210".to_string(),
        child_name: "Sam".to_string(),
        child_age: "3-6 years".to_string(),
        child_gender: "Male".to_string(),
        ..IntakeForm::default()
    }
    .with_answer(1, "Yes, accurately every time")
    .with_answer(2, "Most of them")
    .with_answer(9, "Eager and persistent")
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}
