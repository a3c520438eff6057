use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::IntakeForm;
use super::service::{IntakeError, IntakeService};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Form submitted successfully";
pub const SUBMIT_SUCCESS_DETAILS: &str =
    "Your assessment has been recorded and a confirmation email has been sent.";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit form";

/// Routes consumed by the questionnaire front end.
pub fn intake_router(service: Arc<IntakeService>) -> Router {
    Router::new()
        .route("/api/test", get(test_handler))
        .route("/api/submit-form", post(submit_handler))
        .with_state(service)
}

pub(crate) async fn test_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Backend server is running!" }))
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<IntakeService>>,
    Json(form): Json<IntakeForm>,
) -> Response {
    match service.submit(form).await {
        Ok(receipt) => {
            let payload = json!({
                "message": SUBMIT_SUCCESS_MESSAGE,
                "details": SUBMIT_SUCCESS_DETAILS,
                "receipt": receipt,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(IntakeError::Validation(err)) => {
            let payload = json!({
                "error": err.title(),
                "details": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "submission failed");
            let payload = json!({
                "error": SUBMIT_FAILURE_MESSAGE,
                "details": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
