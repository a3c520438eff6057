use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::workflows::assessment::{
    AgeGroup, ContactDetails, FinalizedResponses, Gender, QuestionBank, ResponseError,
};

const STEP_PREFIX: &str = "step";

/// Intake form body as posted by the questionnaire front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contact: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub child_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub child_age: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub child_gender: String,
    /// `step1`..`stepN` answers plus any field the form adds later.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl IntakeForm {
    /// Non-empty `stepN` answers keyed by ordinal. `null` and `""` mean unanswered;
    /// any other non-text value is rejected. Keys that are not steps are ignored.
    pub fn answers(&self) -> Result<BTreeMap<usize, String>, ResponseError> {
        let mut answers = BTreeMap::new();
        for (key, value) in &self.extra {
            let Some(ordinal) = key
                .strip_prefix(STEP_PREFIX)
                .and_then(|raw| raw.parse::<usize>().ok())
            else {
                continue;
            };
            match value {
                Value::Null => {}
                Value::String(answer) if answer.is_empty() => {}
                Value::String(answer) => {
                    answers.insert(ordinal, answer.clone());
                }
                other => {
                    return Err(ResponseError::UnmatchedAnswer {
                        ordinal,
                        answer: other.to_string(),
                    })
                }
            }
        }
        Ok(answers)
    }

    pub fn with_answer(mut self, ordinal: usize, answer: impl Into<String>) -> Self {
        self.extra
            .insert(format!("{STEP_PREFIX}{ordinal}"), Value::String(answer.into()));
        self
    }
}

/// Typed submission payload forwarded to storage and notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
    pub submitted_at: DateTime<Utc>,
    pub contact: ContactDetails,
    pub child_name: Option<String>,
    pub age_group: AgeGroup,
    pub gender: Gender,
    /// One entry per question of the age group; `None` when skipped.
    pub answers: Vec<Option<String>>,
}

impl SubmissionRecord {
    pub fn new(
        responses: &FinalizedResponses,
        gender: Gender,
        bank: &QuestionBank,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let set = responses.responses();
        let answers = bank
            .questions_for(responses.age_group())
            .iter()
            .map(|question| set.answer(question.ordinal).map(str::to_string))
            .collect();

        Self {
            submitted_at,
            contact: set.contact().clone(),
            child_name: set.child().name.clone(),
            age_group: responses.age_group(),
            gender,
            answers,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_some()).count()
    }

    /// Spreadsheet row: timestamp, parent, email, contact, age, gender, then one column per step.
    pub fn row(&self) -> Vec<String> {
        let mut row = vec![
            self.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.contact.name.clone(),
            self.contact.email.clone(),
            self.contact.contact.clone(),
            self.age_group.label().to_string(),
            self.gender.label().to_string(),
        ];
        row.extend(
            self.answers
                .iter()
                .map(|answer| answer.clone().unwrap_or_default()),
        );
        row
    }
}

/// Returned to the caller after the row is stored and the email is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub submitted_at: DateTime<Utc>,
    pub age_group: AgeGroup,
    pub answered: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::ResponseSet;
    use chrono::TimeZone;

    #[test]
    fn answers_only_pick_step_keys_with_text() {
        let form: IntakeForm = serde_json::from_value(serde_json::json!({
            "name": "Jo",
            "childAge": "3-6 years",
            "step1": "Not yet",
            "step2": "",
            "step10": "Most of them",
            "stepx": "ignored",
            "source": "landing-page",
            "step3": null
        }))
        .expect("form parses");

        let answers = form.answers().expect("text answers");
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get(&1).map(String::as_str), Some("Not yet"));
        assert_eq!(answers.get(&10).map(String::as_str), Some("Most of them"));
        assert_eq!(form.child_age, "3-6 years");
    }

    #[test]
    fn null_fields_deserialize_as_empty() {
        let form: IntakeForm = serde_json::from_value(serde_json::json!({
            "name": "Jo",
            "email": null,
            "childName": null,
            "childAge": "0-3 years"
        }))
        .expect("form parses");

        assert_eq!(form.email, "");
        assert_eq!(form.child_name, "");
        assert_eq!(form.contact, "");
        assert_eq!(form.child_age, "0-3 years");
    }

    #[test]
    fn non_text_step_value_is_rejected() {
        let form: IntakeForm = serde_json::from_value(serde_json::json!({
            "step1": "Not yet",
            "step2": 3
        }))
        .expect("form parses");

        let err = form.answers().expect_err("number is not an option text");

        assert_eq!(
            err,
            ResponseError::UnmatchedAnswer {
                ordinal: 2,
                answer: "3".to_string()
            }
        );
    }

    #[test]
    fn row_has_one_column_per_question() {
        let bank = QuestionBank::bundled().expect("bundled bank loads");
        let mut responses = ResponseSet::for_age_group(AgeGroup::Toddler);
        responses.set_contact(ContactDetails {
            name: "Jo Parent".to_string(),
            email: "jo@example.com".to_string(),
            contact: "+44 7700 900123".to_string(),
        });
        responses.record_answer(2, "Up to two or three");
        let finalized = responses.finalize(&bank).expect("valid responses");
        let submitted_at = Utc.with_ymd_and_hms(2024, 11, 5, 9, 30, 0).unwrap();

        let record = SubmissionRecord::new(&finalized, Gender::Female, &bank, submitted_at);
        let row = record.row();

        assert_eq!(row.len(), 6 + 8);
        assert_eq!(row[0], "2024-11-05T09:30:00.000Z");
        assert_eq!(row[4], "0-3 years");
        assert_eq!(row[5], "Female");
        assert_eq!(row[6], "");
        assert_eq!(row[7], "Up to two or three");
        assert_eq!(record.answered_count(), 1);
    }
}
