use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use lead_assessment::workflows::assessment::QuestionBank;
use lead_assessment::workflows::intake::mailer::CONFIRMATION_SUBJECT;
use lead_assessment::workflows::intake::{
    intake_router, ConfirmationEmail, ConfirmationMailer, CsvFileStore, IntakeService, MailError,
};
use serde_json::{json, Value};
use tower::ServiceExt;

#[derive(Debug, Default)]
struct RecordingMailer {
    sent: Mutex<Vec<ConfirmationEmail>>,
}

#[async_trait]
impl ConfirmationMailer for RecordingMailer {
    async fn send(&self, email: ConfirmationEmail) -> Result<(), MailError> {
        self.sent.lock().expect("mailer mutex").push(email);
        Ok(())
    }
}

fn submission(email: &str, contact: &str) -> Value {
    json!({
        "name": "Jo Parent",
        "email": email,
        "contact": contact,
        "childName": "Sam",
        "childAge": "0-3 years",
        "childGender": "Other",
        "step1": "",
        "step2": "Up to two or three",
    })
}

async fn post_form(router: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post("/api/submit-form")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn submissions_are_written_to_csv_and_confirmed_by_email() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(CsvFileStore::new(dir.path().join("submissions.csv")));
    let mailer = Arc::new(RecordingMailer::default());
    let bank = Arc::new(QuestionBank::bundled().expect("bundled bank loads"));
    let service = Arc::new(IntakeService::new(bank, store.clone(), mailer.clone()));

    let (status, payload) = post_form(
        intake_router(service),
        submission("jo@example.com", "(020) 7946-0958"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["message"], "Form submitted successfully");
    assert_eq!(payload["receipt"]["answered"], 1);
    assert_eq!(payload["receipt"]["total"], 8);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(store.path())
        .expect("csv readable");
    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("rows parse");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 6 + 8);
    assert_eq!(&rows[0][3], "(020) 7946-0958");
    assert_eq!(&rows[0][4], "0-3 years");
    assert_eq!(&rows[0][5], "Other");
    assert_eq!(&rows[0][6], "");
    assert_eq!(&rows[0][7], "Up to two or three");

    let sent = mailer.sent.lock().expect("mailer mutex");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, CONFIRMATION_SUBJECT);
    assert!(sent[0].html_body.contains("Child's Age: 0-3 years"));
    assert!(sent[0].html_body.contains("WhatsApp: (020) 7946-0958"));
}

#[tokio::test]
async fn rejected_submissions_leave_no_trace() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = Arc::new(CsvFileStore::new(dir.path().join("submissions.csv")));
    let mailer = Arc::new(RecordingMailer::default());
    let bank = Arc::new(QuestionBank::bundled().expect("bundled bank loads"));
    let router = intake_router(Arc::new(IntakeService::new(bank, store.clone(), mailer.clone())));

    let (status, payload) = post_form(router.clone(), submission("jo@example", "02079460958")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["error"], "Invalid email format");

    let mut unknown_answer = submission("jo@example.com", "02079460958");
    unknown_answer["step2"] = json!("Twelve");
    let (status, payload) = post_form(router, unknown_answer).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(payload["error"], "Invalid answer");
    assert!(payload["details"]
        .as_str()
        .expect("details string")
        .contains("step 2"));

    assert!(!store.path().exists());
    assert!(mailer.sent.lock().expect("mailer mutex").is_empty());
}
