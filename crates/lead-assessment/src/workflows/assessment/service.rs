use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::domain::{AgeGroup, Feedback};
use super::export::{export_report, DocumentExporter, ExportError, ExportedDocument};
use super::report::{child_display_name, AssessmentReport, ReportAssembler};
use super::resolver::{Resolution, ResponseResolver, Unresolved};
use super::responses::ResponseSet;

#[derive(Debug, Clone, Serialize)]
pub struct AgeGroupSummary {
    pub key: &'static str,
    pub label: &'static str,
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub ordinal: usize,
    pub prompt: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub age_group: String,
    pub step: usize,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedbackView {
    Found { feedback: Feedback },
    NotFound { reason: Unresolved },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRequest {
    pub age_group: String,
    #[serde(default)]
    pub answers: BTreeMap<usize, String>,
    #[serde(default)]
    pub child_name: Option<String>,
}

impl ReportRequest {
    fn responses(&self, group: AgeGroup) -> ResponseSet {
        let mut responses = ResponseSet::for_age_group(group);
        for (ordinal, answer) in &self.answers {
            responses.record_answer(*ordinal, answer.clone());
        }
        if let Some(name) = &self.child_name {
            responses.set_child_name(name.clone());
        }
        responses
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("unknown age group '{0}'")]
    UnknownAgeGroup(String),
    #[error("document export is not configured")]
    ExportDisabled,
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Read-only facade over the shared question bank.
#[derive(Debug, Clone)]
pub struct AssessmentService {
    bank: Arc<QuestionBank>,
    exporter: Option<Arc<dyn DocumentExporter>>,
}

impl AssessmentService {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            bank,
            exporter: None,
        }
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn DocumentExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn age_groups(&self) -> Vec<AgeGroupSummary> {
        AgeGroup::ordered()
            .into_iter()
            .map(|group| AgeGroupSummary {
                key: group.key(),
                label: group.label(),
                question_count: self.bank.question_count(group),
            })
            .collect()
    }

    /// Prompts and option texts only; feedback stays server-side until the report.
    pub fn questions(&self, age_group: &str) -> Vec<QuestionView> {
        self.bank
            .questions_for_key(age_group)
            .iter()
            .map(|question| QuestionView {
                ordinal: question.ordinal,
                prompt: question.prompt.clone(),
                options: question.option_texts().map(str::to_string).collect(),
            })
            .collect()
    }

    /// Unknown age groups are an error; unknown steps and answers are a `not_found` view.
    pub fn feedback(&self, request: &FeedbackRequest) -> Result<FeedbackView, AssessmentServiceError> {
        let group = AgeGroup::from_key(&request.age_group)
            .ok_or_else(|| AssessmentServiceError::UnknownAgeGroup(request.age_group.clone()))?;

        let view = match ResponseResolver::new(&self.bank).resolve(group, request.step, &request.answer) {
            Resolution::Found(feedback) => FeedbackView::Found {
                feedback: feedback.clone(),
            },
            Resolution::NotFound(reason) => FeedbackView::NotFound { reason },
        };
        Ok(view)
    }

    pub fn report(&self, request: &ReportRequest) -> Result<AssessmentReport, AssessmentServiceError> {
        let group = AgeGroup::from_key(&request.age_group)
            .ok_or_else(|| AssessmentServiceError::UnknownAgeGroup(request.age_group.clone()))?;
        let responses = request.responses(group);
        let display_name = child_display_name(responses.child().name.as_deref());
        Ok(ReportAssembler::new(&self.bank).report(group, &responses, &display_name))
    }

    pub async fn export(
        &self,
        request: &ReportRequest,
    ) -> Result<ExportedDocument, AssessmentServiceError> {
        let exporter = self
            .exporter
            .as_deref()
            .ok_or(AssessmentServiceError::ExportDisabled)?;
        let report = self.report(request)?;
        Ok(export_report(exporter, &report).await?)
    }
}
