use serde::Serialize;

use super::super::domain::AgeGroup;

#[derive(Debug, Clone, Serialize)]
pub struct ReportSectionView {
    pub ordinal: usize,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub resolved: bool,
    pub identified_issue: String,
    pub strength: String,
    pub improve: String,
    /// Quoted for display.
    pub message: String,
    pub why_this_matters: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReportView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub age_group: AgeGroup,
    pub child_display_name: String,
    pub answered: usize,
    pub total: usize,
    pub sections: Vec<ReportSectionView>,
}
