use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::forms::contact::ContactFields;
use crate::forms::education::{EducationForm, SnapshotSchool, MAX_EDUCATION, MIN_EDUCATION};
use crate::forms::experience::{ExperienceForm, SnapshotWork, MAX_EXPERIENCE, MIN_EXPERIENCE};
use crate::forms::skills::DocumentSkillsForm;
use crate::forms::{not_blank, FieldErrors, Form};

/// Payload for freezing the current profile content into a new resume.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeInput {
    pub profile_id: Uuid,
    #[validate(custom(function = "not_blank"))]
    pub profession: String,
    pub interests: String,
    pub education: Vec<SnapshotSchool>,
    pub experience: Vec<SnapshotWork>,
}

impl Form for CreateResumeInput {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_fragment("", self);
        errors.check_list("education", &self.education, MIN_EDUCATION, MAX_EDUCATION);
        errors.check_list("experience", &self.experience, MIN_EXPERIENCE, MAX_EXPERIENCE);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    #[validate(custom(function = "not_blank"))]
    pub full_name: String,
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub profession: String,
    #[validate(length(min = 3, max = 255))]
    pub interests: Option<String>,
}

/// Everything a printable resume shows, merged from the smaller fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDocumentForm {
    #[serde(flatten)]
    pub header: DocumentHeader,
    #[serde(flatten)]
    pub contact: ContactFields,
    #[serde(flatten)]
    pub education: EducationForm,
    #[serde(flatten)]
    pub experience: ExperienceForm,
    #[serde(flatten)]
    pub skills: DocumentSkillsForm,
}

impl Form for ResumeDocumentForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_fragment("", &self.header);
        errors.check_fragment("", &self.contact);
        for fragment in [
            self.education.check(),
            self.experience.check(),
            self.skills.check(),
        ] {
            if let Err(fragment_errors) = fragment {
                errors.merge("", fragment_errors);
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> serde_json::Value {
        json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "profession": "Engineer",
            "interests": "Chess and hiking",
            "phone": "555-0100",
            "location": "London",
            "education": [{
                "name": "Cambridge",
                "degree": "Mathematics",
                "startDate": "1830",
                "endDate": "1834"
            }],
            "experience": [{
                "name": "Analytical Engines Ltd",
                "title": "Programmer",
                "startDate": "1842",
                "endDate": "1843",
                "description": "Wrote the first program. Annotated the engine. Published notes."
            }],
            "skills": [{ "category": "Math", "all": "Calculus, Algebra", "position": 0 }]
        })
    }

    #[test]
    fn test_document_merges_all_fragments() {
        let form: ResumeDocumentForm = serde_json::from_value(document()).unwrap();
        assert!(form.check().is_ok());
        assert_eq!(form.contact.location, "London");
        assert_eq!(form.skills.skills[0].items(), vec!["Calculus", "Algebra"]);
    }

    #[test]
    fn test_document_collects_errors_across_fragments() {
        let mut value = document();
        value["email"] = json!("not-an-email");
        value["location"] = json!("UK");
        value["education"] = json!([]);
        value["skills"][0]["category"] = json!("M");
        let form: ResumeDocumentForm = serde_json::from_value(value).unwrap();
        let errors = form.check().unwrap_err();
        assert_eq!(
            errors.paths().collect::<Vec<_>>(),
            vec!["education", "email", "location", "skills[0].category"]
        );
    }

    #[test]
    fn test_create_input_bounds() {
        let input: CreateResumeInput = serde_json::from_value(json!({
            "profileId": "7b0e4c3a-2f7e-4d4c-9a57-1f4c1e0f9b11",
            "profession": " ",
            "interests": "",
            "education": [],
            "experience": [{
                "name": "Acme",
                "title": "Dev",
                "startDate": "2020",
                "endDate": "2021",
                "description": "Did things."
            }]
        }))
        .unwrap();
        let errors = input.check().unwrap_err();
        assert_eq!(
            errors.paths().collect::<Vec<_>>(),
            vec!["education", "profession"]
        );
    }
}
