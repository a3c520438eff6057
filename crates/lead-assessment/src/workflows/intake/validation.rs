use std::sync::OnceLock;

use regex::Regex;

use super::domain::IntakeForm;
use crate::workflows::assessment::{
    AgeGroup, ContactDetails, FinalizedResponses, Gender, QuestionBank, ResponseError,
    ResponseSet,
};

const MIN_CONTACT_DIGITS: usize = 10;
const MAX_CONTACT_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Please provide a valid email address")]
    InvalidEmail,
    #[error("Please provide a valid WhatsApp number with country code")]
    InvalidContact,
    #[error("'{0}' is not one of the offered age groups")]
    InvalidAgeGroup(String),
    #[error("'{0}' is not one of the offered gender options")]
    InvalidGender(String),
    #[error(transparent)]
    InvalidAnswer(#[from] ResponseError),
}

impl ValidationError {
    /// Short headline returned alongside the detail message.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "Missing required fields",
            Self::InvalidEmail => "Invalid email format",
            Self::InvalidContact => "Invalid WhatsApp number",
            Self::InvalidAgeGroup(_) => "Invalid age group",
            Self::InvalidGender(_) => "Invalid gender",
            Self::InvalidAnswer(_) => "Invalid answer",
        }
    }
}

/// Form that passed every check, ready to become a submission record.
#[derive(Debug, Clone)]
pub struct ValidatedIntake {
    pub responses: FinalizedResponses,
    pub gender: Gender,
}

pub fn validate_form(
    form: &IntakeForm,
    bank: &QuestionBank,
) -> Result<ValidatedIntake, ValidationError> {
    let required = [
        ("name", &form.name),
        ("email", &form.email),
        ("contact", &form.contact),
        ("childAge", &form.child_age),
        ("childGender", &form.child_gender),
    ];
    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if !is_valid_email(&form.email) {
        return Err(ValidationError::InvalidEmail);
    }

    let digits = form.contact.chars().filter(char::is_ascii_digit).count();
    if !(MIN_CONTACT_DIGITS..=MAX_CONTACT_DIGITS).contains(&digits) {
        return Err(ValidationError::InvalidContact);
    }

    let group = AgeGroup::from_key(&form.child_age)
        .ok_or_else(|| ValidationError::InvalidAgeGroup(form.child_age.clone()))?;
    let gender = Gender::from_label(&form.child_gender)
        .ok_or_else(|| ValidationError::InvalidGender(form.child_gender.clone()))?;

    let mut responses = ResponseSet::for_age_group(group);
    responses.set_child_name(form.child_name.trim());
    responses.set_gender(gender);
    responses.set_contact(ContactDetails {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        contact: form.contact.trim().to_string(),
    });
    for (ordinal, answer) in form.answers()? {
        responses.record_answer(ordinal, answer);
    }

    let responses = responses.finalize(bank)?;
    Ok(ValidatedIntake { responses, gender })
}

fn is_valid_email(raw: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
        .is_match(raw.trim())
}
