use serde::Serialize;

use super::bank::QuestionBank;
use super::domain::{AgeGroup, Feedback};

/// Why a lookup produced no feedback. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unresolved {
    /// The age group has no question at the requested ordinal.
    UnknownStep,
    /// The step was skipped.
    Unanswered,
    /// The text matches none of the offered options.
    UnmatchedAnswer,
}

impl Unresolved {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnknownStep => "unknown step",
            Self::Unanswered => "unanswered",
            Self::UnmatchedAnswer => "unmatched answer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found(&'a Feedback),
    NotFound(Unresolved),
}

impl<'a> Resolution<'a> {
    pub fn feedback(self) -> Option<&'a Feedback> {
        match self {
            Self::Found(feedback) => Some(feedback),
            Self::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Maps a selected answer back to the option's authored feedback.
#[derive(Debug, Clone, Copy)]
pub struct ResponseResolver<'a> {
    bank: &'a QuestionBank,
}

impl<'a> ResponseResolver<'a> {
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    /// Exact, case-sensitive lookup of `answer` among the options at `ordinal` (1-based).
    pub fn resolve(self, group: AgeGroup, ordinal: usize, answer: &str) -> Resolution<'a> {
        self.resolve_optional(group, ordinal, Some(answer))
    }

    pub(crate) fn resolve_optional(
        self,
        group: AgeGroup,
        ordinal: usize,
        answer: Option<&str>,
    ) -> Resolution<'a> {
        let Some(question) = self.bank.question(group, ordinal) else {
            return Resolution::NotFound(Unresolved::UnknownStep);
        };
        let Some(answer) = answer else {
            return Resolution::NotFound(Unresolved::Unanswered);
        };

        match question.option(answer) {
            Some(option) => Resolution::Found(&option.feedback),
            None => Resolution::NotFound(Unresolved::UnmatchedAnswer),
        }
    }
}
