use serde::{Deserialize, Serialize};
use std::fmt;

/// Age band selecting which question set and intake branch applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "Age (0-3)", alias = "0-3 years")]
    Toddler,
    #[serde(rename = "Age (3-6)", alias = "3-6 years")]
    EarlyYears,
    #[serde(rename = "Age (6-9)", alias = "6-9 years")]
    LowerPrimary,
    #[serde(rename = "Age (9-12)", alias = "9-12 years")]
    UpperPrimary,
}

impl AgeGroup {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Toddler,
            Self::EarlyYears,
            Self::LowerPrimary,
            Self::UpperPrimary,
        ]
    }

    /// Key used by the question bank asset.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Toddler => "Age (0-3)",
            Self::EarlyYears => "Age (3-6)",
            Self::LowerPrimary => "Age (6-9)",
            Self::UpperPrimary => "Age (9-12)",
        }
    }

    /// Label offered by the intake form's age selector.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Toddler => "0-3 years",
            Self::EarlyYears => "3-6 years",
            Self::LowerPrimary => "6-9 years",
            Self::UpperPrimary => "9-12 years",
        }
    }

    /// Accepts either the bank key or the intake label. Anything else is `None`.
    pub fn from_key(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|group| group.key() == trimmed || group.label() == trimmed)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Authored text attached to a single answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub identified_issue: String,
    pub strength: String,
    pub improve: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub why_this_matters: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    pub feedback: Feedback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// 1-based position within the age group.
    pub ordinal: usize,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, text: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.text == text)
    }

    pub fn option_texts(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|option| option.text.as_str())
    }
}
