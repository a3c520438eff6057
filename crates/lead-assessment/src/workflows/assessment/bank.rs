use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::domain::{AgeGroup, AnswerOption, Question};

const BUNDLED_ASSET: &str = include_str!("../../../assets/questions_by_age_group.json");
const UNVERSIONED: &str = "unversioned";

#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("unable to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question bank lists unknown age group '{0}'")]
    UnknownAgeGroup(String),
    #[error("{group} question {ordinal} has no prompt")]
    EmptyPrompt { group: AgeGroup, ordinal: usize },
    #[error("{group} question {ordinal} has no options")]
    NoOptions { group: AgeGroup, ordinal: usize },
    #[error("{group} question {ordinal} repeats option '{text}'")]
    DuplicateOption {
        group: AgeGroup,
        ordinal: usize,
        text: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    #[serde(default)]
    options: Vec<AnswerOption>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BankDocument {
    Versioned {
        version: String,
        groups: BTreeMap<String, Vec<RawQuestion>>,
    },
    Plain(BTreeMap<String, Vec<RawQuestion>>),
}

/// Immutable question and feedback table, loaded once and shared by reference.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    version: String,
    groups: BTreeMap<AgeGroup, Vec<Question>>,
}

impl QuestionBank {
    /// The asset compiled into the crate.
    pub fn bundled() -> Result<Self, QuestionBankError> {
        Self::from_json_str(BUNDLED_ASSET)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, QuestionBankError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuestionBankError> {
        let document: BankDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, QuestionBankError> {
        let document: BankDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    fn from_document(document: BankDocument) -> Result<Self, QuestionBankError> {
        let (version, raw_groups) = match document {
            BankDocument::Versioned { version, groups } => (version, groups),
            BankDocument::Plain(groups) => (UNVERSIONED.to_string(), groups),
        };

        let mut groups = BTreeMap::new();
        for (key, raw_questions) in raw_groups {
            let group = AgeGroup::from_key(&key)
                .ok_or_else(|| QuestionBankError::UnknownAgeGroup(key.clone()))?;
            let questions = build_questions(group, raw_questions)?;
            debug!(%group, questions = questions.len(), "loaded question set");
            groups.insert(group, questions);
        }

        Ok(Self { version, groups })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Ordered questions for the group; empty when the group has no entry.
    pub fn questions_for(&self, group: AgeGroup) -> &[Question] {
        self.groups.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Same as [`Self::questions_for`] for a raw key. Unknown or blank keys yield nothing.
    pub fn questions_for_key(&self, key: &str) -> &[Question] {
        match AgeGroup::from_key(key) {
            Some(group) => self.questions_for(group),
            None => &[],
        }
    }

    /// Question at a 1-based ordinal.
    pub fn question(&self, group: AgeGroup, ordinal: usize) -> Option<&Question> {
        ordinal
            .checked_sub(1)
            .and_then(|index| self.questions_for(group).get(index))
    }

    pub fn question_count(&self, group: AgeGroup) -> usize {
        self.questions_for(group).len()
    }

    pub fn age_groups(&self) -> impl Iterator<Item = AgeGroup> + '_ {
        self.groups.keys().copied()
    }
}

fn build_questions(
    group: AgeGroup,
    raw_questions: Vec<RawQuestion>,
) -> Result<Vec<Question>, QuestionBankError> {
    raw_questions
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let ordinal = index + 1;
            if raw.question.trim().is_empty() {
                return Err(QuestionBankError::EmptyPrompt { group, ordinal });
            }
            if raw.options.is_empty() {
                return Err(QuestionBankError::NoOptions { group, ordinal });
            }

            let mut seen = HashSet::new();
            for option in &raw.options {
                if !seen.insert(option.text.as_str()) {
                    return Err(QuestionBankError::DuplicateOption {
                        group,
                        ordinal,
                        text: option.text.clone(),
                    });
                }
            }

            Ok(Question {
                ordinal,
                prompt: raw.question,
                options: raw.options,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"{
        "Age (3-6)": [
            { "question": "Can your child count to ten?", "options": [
                { "text": "Yes", "feedback": { "identified_issue": "Strong counting", "strength": "Counts", "improve": "Count to twenty", "message": "[Child's Name] counts well", "why_this_matters": "Counting matters" } },
                { "text": "No", "feedback": { "identified_issue": "Counting support", "strength": "Curious", "improve": "Count daily", "message": "", "why_this_matters": "" } }
            ] },
            { "question": "Can your child name shapes?", "options": [
                { "text": "Yes", "feedback": { "identified_issue": "Shapes", "strength": "Names shapes", "improve": "Sides", "message": "Nice", "why_this_matters": "Geometry" } }
            ] }
        ]
    }"#;

    #[test]
    fn bundled_asset_has_configured_counts() {
        let bank = QuestionBank::bundled().expect("bundled bank loads");
        assert_eq!(bank.question_count(AgeGroup::Toddler), 8);
        assert_eq!(bank.question_count(AgeGroup::EarlyYears), 9);
        assert_eq!(bank.question_count(AgeGroup::LowerPrimary), 10);
        assert_eq!(bank.question_count(AgeGroup::UpperPrimary), 10);
        assert_ne!(bank.version(), UNVERSIONED);
    }

    #[test]
    fn ordinals_are_contiguous_from_one() {
        let bank = QuestionBank::bundled().expect("bundled bank loads");
        for group in AgeGroup::ordered() {
            let ordinals: Vec<usize> = bank.questions_for(group).iter().map(|q| q.ordinal).collect();
            let expected: Vec<usize> = (1..=ordinals.len()).collect();
            assert_eq!(ordinals, expected, "{group} ordinals");
        }
    }

    #[test]
    fn plain_mapping_loads_without_version() {
        let bank = QuestionBank::from_json_str(PLAIN).expect("plain mapping loads");
        assert_eq!(bank.version(), UNVERSIONED);
        assert_eq!(bank.question_count(AgeGroup::EarlyYears), 2);
        assert!(bank.questions_for(AgeGroup::Toddler).is_empty());
        assert_eq!(
            bank.question(AgeGroup::EarlyYears, 2).map(|q| q.prompt.as_str()),
            Some("Can your child name shapes?")
        );
    }

    #[test]
    fn unknown_or_blank_keys_yield_no_questions() {
        let bank = QuestionBank::bundled().expect("bundled bank loads");
        assert!(bank.questions_for_key("").is_empty());
        assert!(bank.questions_for_key("Age (12-15)").is_empty());
        assert_eq!(bank.questions_for_key("3-6 years").len(), 9);
    }

    #[test]
    fn question_lookup_rejects_zero_and_out_of_range() {
        let bank = QuestionBank::from_json_str(PLAIN).expect("plain mapping loads");
        assert!(bank.question(AgeGroup::EarlyYears, 0).is_none());
        assert!(bank.question(AgeGroup::EarlyYears, 3).is_none());
    }

    #[test]
    fn rejects_unknown_age_group() {
        let err = QuestionBank::from_json_str(r#"{ "Teens": [] }"#).expect_err("unknown group");
        assert!(matches!(err, QuestionBankError::UnknownAgeGroup(key) if key == "Teens"));
    }

    #[test]
    fn rejects_duplicate_option_text() {
        let raw = r#"{ "Age (0-3)": [ { "question": "Q", "options": [
            { "text": "Yes", "feedback": { "identified_issue": "a", "strength": "b", "improve": "c" } },
            { "text": "Yes", "feedback": { "identified_issue": "a", "strength": "b", "improve": "c" } }
        ] } ] }"#;
        let err = QuestionBank::from_json_str(raw).expect_err("duplicate option");
        assert!(matches!(
            err,
            QuestionBankError::DuplicateOption { ordinal: 1, ref text, .. } if text == "Yes"
        ));
    }

    #[test]
    fn rejects_question_without_options() {
        let raw = r#"{ "Age (0-3)": [ { "question": "Q", "options": [] } ] }"#;
        let err = QuestionBank::from_json_str(raw).expect_err("no options");
        assert!(matches!(err, QuestionBankError::NoOptions { ordinal: 1, .. }));
    }
}
