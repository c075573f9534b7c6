use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::forms::{not_blank, FieldErrors, Form};

pub const MIN_EXPERIENCE: usize = 1;
pub const MAX_EXPERIENCE: usize = 5;

/// One work entry as submitted from the profile form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkInput {
    pub id: Option<Uuid>,
    pub profile_id: Option<Uuid>,
    /// Company name.
    #[validate(length(min = 3, max = 255))]
    pub name: String,
    #[validate(length(min = 3, max = 255))]
    pub title: String,
    #[validate(length(min = 3, max = 50))]
    pub start_date: String,
    #[validate(length(min = 3, max = 50))]
    pub end_date: String,
    #[validate(
        length(min = 6, max = 1000),
        custom(function = "at_least_three_sentences")
    )]
    pub description: String,
}

/// The description must split on `.` into more than three parts.
fn at_least_three_sentences(description: &str) -> Result<(), ValidationError> {
    if description.split('.').count() > 3 {
        Ok(())
    } else {
        Err(ValidationError::new("sentences").with_message("Must be at least 3 sentences".into()))
    }
}

/// The experience list fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceForm {
    pub experience: Vec<WorkInput>,
}

impl Form for ExperienceForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_list("experience", &self.experience, MIN_EXPERIENCE, MAX_EXPERIENCE);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWorkInput {
    #[serde(flatten)]
    pub form: ExperienceForm,
    /// When present, the profile's existing work history is replaced.
    pub profile_id: Option<Uuid>,
}

impl Form for AddWorkInput {
    fn check(&self) -> Result<(), FieldErrors> {
        self.form.check()
    }
}

/// Work entry copied into a resume snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotWork {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}
