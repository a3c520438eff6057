use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::bank::QuestionBank;
use super::domain::{AgeGroup, Gender};
use super::resolver::{Resolution, ResponseResolver, Unresolved};

/// Parent contact identity collected on the final intake step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    /// WhatsApp number including country code.
    pub contact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

/// One respondent's answers keyed by 1-based step ordinal, plus intake fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSet {
    #[serde(default)]
    contact: ContactDetails,
    #[serde(default)]
    child: ChildProfile,
    #[serde(default)]
    answers: BTreeMap<usize, String>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_age_group(group: AgeGroup) -> Self {
        let mut responses = Self::new();
        responses.select_age_group(group);
        responses
    }

    /// Choosing a different band discards every recorded answer.
    pub fn select_age_group(&mut self, group: AgeGroup) {
        if self.child.age_group != Some(group) {
            self.answers.clear();
        }
        self.child.age_group = Some(group);
    }

    pub fn age_group(&self) -> Option<AgeGroup> {
        self.child.age_group
    }

    pub fn set_child_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.child.name = if name.trim().is_empty() {
            None
        } else {
            Some(name)
        };
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.child.gender = Some(gender);
    }

    pub fn set_contact(&mut self, contact: ContactDetails) {
        self.contact = contact;
    }

    pub fn child(&self) -> &ChildProfile {
        &self.child
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn record_answer(&mut self, ordinal: usize, answer: impl Into<String>) {
        self.answers.insert(ordinal, answer.into());
    }

    pub fn clear_answer(&mut self, ordinal: usize) -> Option<String> {
        self.answers.remove(&ordinal)
    }

    pub fn answer(&self, ordinal: usize) -> Option<&str> {
        self.answers.get(&ordinal).map(String::as_str)
    }

    pub fn answers(&self) -> impl Iterator<Item = (usize, &str)> {
        self.answers
            .iter()
            .map(|(ordinal, answer)| (*ordinal, answer.as_str()))
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Freeze the set once every recorded answer is one the bank actually offered.
    pub fn finalize(self, bank: &QuestionBank) -> Result<FinalizedResponses, ResponseError> {
        let group = self.child.age_group.ok_or(ResponseError::MissingAgeGroup)?;
        let resolver = ResponseResolver::new(bank);

        for (ordinal, answer) in self.answers() {
            match resolver.resolve(group, ordinal, answer) {
                Resolution::Found(_) => {}
                Resolution::NotFound(Unresolved::UnknownStep) => {
                    return Err(ResponseError::UnknownStep { group, ordinal });
                }
                Resolution::NotFound(_) => {
                    return Err(ResponseError::UnmatchedAnswer {
                        ordinal,
                        answer: answer.to_string(),
                    });
                }
            }
        }

        Ok(FinalizedResponses {
            group,
            responses: self,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    #[error("no age group selected")]
    MissingAgeGroup,
    #[error("{group} has no question at step {ordinal}")]
    UnknownStep { group: AgeGroup, ordinal: usize },
    #[error("step {ordinal} answer '{answer}' is not one of the offered options")]
    UnmatchedAnswer { ordinal: usize, answer: String },
}

/// Read-only response set that satisfied [`ResponseSet::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedResponses {
    group: AgeGroup,
    responses: ResponseSet,
}

impl FinalizedResponses {
    pub fn age_group(&self) -> AgeGroup {
        self.group
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::bundled().expect("bundled bank loads")
    }

    fn first_option(bank: &QuestionBank, group: AgeGroup, ordinal: usize) -> String {
        bank.question(group, ordinal)
            .and_then(|question| question.options.first())
            .map(|option| option.text.clone())
            .expect("option present")
    }

    #[test]
    fn changing_age_group_resets_answers() {
        let mut responses = ResponseSet::for_age_group(AgeGroup::EarlyYears);
        responses.record_answer(1, "Not yet");
        responses.select_age_group(AgeGroup::EarlyYears);
        assert_eq!(responses.answered_count(), 1);

        responses.select_age_group(AgeGroup::LowerPrimary);
        assert_eq!(responses.answered_count(), 0);
        assert_eq!(responses.age_group(), Some(AgeGroup::LowerPrimary));
    }

    #[test]
    fn blank_child_name_is_treated_as_missing() {
        let mut responses = ResponseSet::new();
        responses.set_child_name("   ");
        assert!(responses.child().name.is_none());
        responses.set_child_name("Sam");
        assert_eq!(responses.child().name.as_deref(), Some("Sam"));
    }

    #[test]
    fn finalize_accepts_offered_answers_and_gaps() {
        let bank = bank();
        let mut responses = ResponseSet::for_age_group(AgeGroup::EarlyYears);
        responses.record_answer(1, first_option(&bank, AgeGroup::EarlyYears, 1));
        responses.record_answer(4, first_option(&bank, AgeGroup::EarlyYears, 4));

        let finalized = responses.finalize(&bank).expect("answers are valid");
        assert_eq!(finalized.age_group(), AgeGroup::EarlyYears);
        assert_eq!(finalized.responses().answered_count(), 2);
    }

    #[test]
    fn finalize_rejects_unknown_steps_and_unmatched_text() {
        let bank = bank();
        let mut responses = ResponseSet::for_age_group(AgeGroup::EarlyYears);
        responses.record_answer(10, "Not yet");
        assert_eq!(
            responses.clone().finalize(&bank),
            Err(ResponseError::UnknownStep {
                group: AgeGroup::EarlyYears,
                ordinal: 10
            })
        );

        responses.clear_answer(10);
        responses.record_answer(2, "not yet");
        assert!(matches!(
            responses.finalize(&bank),
            Err(ResponseError::UnmatchedAnswer { ordinal: 2, .. })
        ));
    }

    #[test]
    fn finalize_requires_age_group() {
        let bank = bank();
        assert_eq!(
            ResponseSet::new().finalize(&bank),
            Err(ResponseError::MissingAgeGroup)
        );
    }
}
