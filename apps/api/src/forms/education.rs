use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::forms::{not_blank, FieldErrors, Form};

pub const MIN_EDUCATION: usize = 1;
pub const MAX_EDUCATION: usize = 4;

/// One education entry as submitted from the profile form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SchoolInput {
    pub id: Option<Uuid>,
    pub profile_id: Option<Uuid>,
    #[validate(length(min = 3, max = 255))]
    pub name: String,
    #[validate(length(min = 3, max = 255))]
    pub degree: String,
    #[validate(length(min = 4, max = 50))]
    pub start_date: String,
    #[validate(length(min = 4, max = 50))]
    pub end_date: String,
    #[validate(length(max = 500, message = "Must be less than 500 characters"))]
    pub description: Option<String>,
    pub gpa: Option<String>,
    #[validate(length(max = 255, message = "Must be less than 255 characters"))]
    pub location: Option<String>,
}

/// The education list fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationForm {
    pub education: Vec<SchoolInput>,
}

impl Form for EducationForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_list("education", &self.education, MIN_EDUCATION, MAX_EDUCATION);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEducationInput {
    #[serde(flatten)]
    pub form: EducationForm,
    /// When present, the profile's existing education is replaced.
    pub profile_id: Option<Uuid>,
}

impl Form for AddEducationInput {
    fn check(&self) -> Result<(), FieldErrors> {
        self.form.check()
    }
}

/// Education entry copied into a resume snapshot. Looser than [`SchoolInput`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSchool {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub gpa: Option<String>,
    pub location: Option<String>,
}
