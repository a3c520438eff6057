use tracing::debug;

use super::super::bank::QuestionBank;
use super::super::domain::{AgeGroup, Feedback};
use super::super::resolver::{Resolution, ResponseResolver, Unresolved};
use super::super::responses::ResponseSet;
use super::views::{AssessmentReportView, ReportSectionView};

pub const NO_DATA_LABEL: &str = "No data";
pub const EMPTY_FIELD: &str = "-";
pub const DEFAULT_DISPLAY_NAME: &str = "your child";
pub const REPORT_TITLE: &str = "Math Assessment Result!";
pub const REPORT_SUBTITLE: &str = "Here's what we discovered about your child's math skills!";

/// Spellings of the child-name token; authors typed the apostrophe several ways.
const CHILD_NAME_TOKENS: [&str; 3] = ["[Child's Name]", "[Child\u{2019}s Name]", "[Child`s Name]"];

/// One question's result, with the child-name token already substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub ordinal: usize,
    pub question: String,
    pub answer: Option<String>,
    pub resolution: Option<Unresolved>,
    pub identified_issue: String,
    pub strength: String,
    pub improve: String,
    pub message: String,
    pub why_this_matters: String,
}

impl ReportSection {
    fn matched(ordinal: usize, question: &str, answer: &str, feedback: &Feedback, name: &str) -> Self {
        Self {
            ordinal,
            question: question.to_string(),
            answer: Some(answer.to_string()),
            resolution: None,
            identified_issue: feedback.identified_issue.clone(),
            strength: feedback.strength.clone(),
            improve: feedback.improve.clone(),
            message: substitute_child_name(&feedback.message, name),
            why_this_matters: substitute_child_name(&feedback.why_this_matters, name),
        }
    }

    fn placeholder(ordinal: usize, question: &str, answer: Option<&str>, reason: Unresolved) -> Self {
        Self {
            ordinal,
            question: question.to_string(),
            answer: answer.map(str::to_string),
            resolution: Some(reason),
            identified_issue: NO_DATA_LABEL.to_string(),
            strength: EMPTY_FIELD.to_string(),
            improve: EMPTY_FIELD.to_string(),
            message: String::new(),
            why_this_matters: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_none()
    }

    /// Message as shown to readers: wrapped in double quotes unless empty or already quoted.
    pub fn display_message(&self) -> String {
        quote_message(&self.message)
    }

    pub fn view(&self) -> ReportSectionView {
        ReportSectionView {
            ordinal: self.ordinal,
            question: self.question.clone(),
            answer: self.answer.clone(),
            resolved: self.is_resolved(),
            identified_issue: self.identified_issue.clone(),
            strength: self.strength.clone(),
            improve: self.improve.clone(),
            message: self.display_message(),
            why_this_matters: self.why_this_matters.clone(),
        }
    }
}

/// Full results report for one respondent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentReport {
    pub age_group: AgeGroup,
    pub child_display_name: String,
    pub sections: Vec<ReportSection>,
}

impl AssessmentReport {
    pub fn title(&self) -> &'static str {
        REPORT_TITLE
    }

    pub fn subtitle(&self) -> &'static str {
        REPORT_SUBTITLE
    }

    pub fn resolved_count(&self) -> usize {
        self.sections.iter().filter(|section| section.is_resolved()).count()
    }

    pub fn view(&self) -> AssessmentReportView {
        AssessmentReportView {
            title: REPORT_TITLE,
            subtitle: REPORT_SUBTITLE,
            age_group: self.age_group,
            child_display_name: self.child_display_name.clone(),
            answered: self.resolved_count(),
            total: self.sections.len(),
            sections: self.sections.iter().map(ReportSection::view).collect(),
        }
    }
}

/// Builds report sections from a response set. Holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct ReportAssembler<'a> {
    bank: &'a QuestionBank,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    /// One section per configured question, in ordinal order, answered or not.
    pub fn assemble(
        self,
        group: AgeGroup,
        responses: &ResponseSet,
        child_display_name: &str,
    ) -> Vec<ReportSection> {
        let resolver = ResponseResolver::new(self.bank);
        let sections: Vec<ReportSection> = self
            .bank
            .questions_for(group)
            .iter()
            .map(|question| {
                let answer = responses.answer(question.ordinal);
                match resolver.resolve_optional(group, question.ordinal, answer) {
                    Resolution::Found(feedback) => ReportSection::matched(
                        question.ordinal,
                        &question.prompt,
                        answer.unwrap_or_default(),
                        feedback,
                        child_display_name,
                    ),
                    Resolution::NotFound(reason) => {
                        ReportSection::placeholder(question.ordinal, &question.prompt, answer, reason)
                    }
                }
            })
            .collect();

        debug!(
            %group,
            sections = sections.len(),
            unresolved = sections.iter().filter(|section| !section.is_resolved()).count(),
            "assembled report sections"
        );
        sections
    }

    pub fn report(
        self,
        group: AgeGroup,
        responses: &ResponseSet,
        child_display_name: &str,
    ) -> AssessmentReport {
        AssessmentReport {
            age_group: group,
            child_display_name: child_display_name.to_string(),
            sections: self.assemble(group, responses, child_display_name),
        }
    }
}

/// Trimmed child name, or "your child" when none was collected.
pub fn child_display_name(name: Option<&str>) -> String {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_string()
}

/// Literal replacement of every child-name token. No other placeholders exist.
pub fn substitute_child_name(text: &str, display_name: &str) -> String {
    CHILD_NAME_TOKENS
        .iter()
        .fold(text.to_string(), |acc, token| acc.replace(token, display_name))
}

pub fn quote_message(message: &str) -> String {
    if message.is_empty() {
        return String::new();
    }
    let already_quoted = message.starts_with('"') && message.ends_with('"');
    if already_quoted {
        message.to_string()
    } else {
        format!("\"{message}\"")
    }
}
