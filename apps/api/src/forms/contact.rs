use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::forms::{FieldErrors, Form};

/// Contact details fragment, shared by the onboarding form and the resume document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    pub portfolio: Option<String>,
    #[validate(length(min = 3, message = "Must be at least 3 characters"))]
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NameFields {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(length(min = 3, max = 255))]
    pub profession: String,
    #[validate(length(min = 3, max = 255))]
    pub interests: Option<String>,
}

/// Onboarding step one: name + contact for an existing profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameAndContactForm {
    /// Profile id. Optional on the wire, required by the procedure.
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub name: NameFields,
    #[serde(flatten)]
    pub contact: ContactFields,
}

impl Form for NameAndContactForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_fragment("", &self.name);
        errors.check_fragment("", &self.contact);
        errors.into_result()
    }
}

/// Free-text profile fields edited after onboarding.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFieldsForm {
    #[validate(length(min = 3, max = 255))]
    pub profession: String,
    pub introduction: Option<String>,
    #[validate(length(min = 3, max = 255))]
    pub interests: Option<String>,
}

impl Form for ProfileFieldsForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_fragment("", self);
        errors.into_result()
    }
}
