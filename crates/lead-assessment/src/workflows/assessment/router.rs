use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::report::render::render_report_html;
use super::service::{AssessmentService, AssessmentServiceError, FeedbackRequest, ReportRequest};

/// Routes for question lookup, live feedback and report rendering.
pub fn assessment_router(service: Arc<AssessmentService>) -> Router {
    Router::new()
        .route("/api/v1/assessment/age-groups", get(age_groups_handler))
        .route(
            "/api/v1/assessment/questions/:age_group",
            get(questions_handler),
        )
        .route("/api/v1/assessment/feedback", post(feedback_handler))
        .route("/api/v1/assessment/report", post(report_handler))
        .route("/api/v1/assessment/report/html", post(report_html_handler))
        .route("/api/v1/assessment/report/export", post(export_handler))
        .with_state(service)
}

pub(crate) async fn age_groups_handler(State(service): State<Arc<AssessmentService>>) -> Response {
    let payload = json!({
        "version": service.bank().version(),
        "age_groups": service.age_groups(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn questions_handler(
    State(service): State<Arc<AssessmentService>>,
    Path(age_group): Path<String>,
) -> Response {
    let questions = service.questions(&age_group);
    let payload = json!({
        "age_group": age_group,
        "questions": questions,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn feedback_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(request): Json<FeedbackRequest>,
) -> Response {
    match service.feedback(&request) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(request): Json<ReportRequest>,
) -> Response {
    match service.report(&request) {
        Ok(report) => (StatusCode::OK, Json(report.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_html_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(request): Json<ReportRequest>,
) -> Response {
    match service.report(&request) {
        Ok(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            render_report_html(&report),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler(
    State(service): State<Arc<AssessmentService>>,
    Json(request): Json<ReportRequest>,
) -> Response {
    match service.export(&request).await {
        Ok(document) => {
            let payload = json!({
                "document_id": document.document_id,
                "title": document.title,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = match err {
        AssessmentServiceError::UnknownAgeGroup(_) => StatusCode::BAD_REQUEST,
        AssessmentServiceError::ExportDisabled => StatusCode::SERVICE_UNAVAILABLE,
        AssessmentServiceError::Export(_) => {
            warn!(error = %err, "report export failed");
            StatusCode::BAD_GATEWAY
        }
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
