use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::forms::{FieldErrors, Form};

pub const MIN_SKILLS: usize = 1;
/// Upper bound for skill groups saved on a profile.
pub const MAX_PROFILE_SKILLS: usize = 20;
/// Upper bound for skill groups on a printed resume.
pub const MAX_DOCUMENT_SKILLS: usize = 4;

/// A categorized skill group as stored on a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SkillInput {
    #[validate(length(min = 3))]
    pub category: String,
    pub all: Vec<String>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSkillsInput {
    pub skills: Vec<SkillInput>,
    pub profile_id: Uuid,
}

impl Form for UpsertSkillsInput {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_list("skills", &self.skills, MIN_SKILLS, MAX_PROFILE_SKILLS);
        errors.into_result()
    }
}

/// Skill group on the resume document form, with `all` typed as one
/// comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillGroupInput {
    #[validate(length(min = 3))]
    pub category: String,
    pub all: String,
    pub position: i32,
}

impl SkillGroupInput {
    pub fn items(&self) -> Vec<String> {
        split_skills(&self.all)
    }
}

/// The document-variant skills fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSkillsForm {
    pub skills: Vec<SkillGroupInput>,
}

impl Form for DocumentSkillsForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_list("skills", &self.skills, MIN_SKILLS, MAX_DOCUMENT_SKILLS);
        errors.into_result()
    }
}

pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
