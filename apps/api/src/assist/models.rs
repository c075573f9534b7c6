use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::forms::education::MAX_EDUCATION;
use crate::forms::experience::MAX_EXPERIENCE;
use crate::forms::skills::MAX_PROFILE_SKILLS;
use crate::forms::{not_blank, FieldErrors, Form};
use crate::llm_client::{ChatRole, ChatTurn};

pub const MAX_CHAT_TURNS: usize = 40;

/// Body of the chat endpoint. The first message is the target job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatParams {
    pub experience: String,
    pub education: String,
    pub profession: String,
    pub interests: Option<String>,
    pub messages: Vec<ChatTurn>,
}

impl ChatParams {
    pub fn job_description(&self) -> &str {
        self.messages.first().map(|m| m.content.as_str()).unwrap_or_default()
    }
}

impl Form for ChatParams {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_count("messages", self.messages.len(), 1, MAX_CHAT_TURNS);
        if let Some(first) = self.messages.first() {
            if first.role != ChatRole::User {
                errors.add("messages[0].role", "The job description must be a user message");
            }
            if first.content.trim().is_empty() {
                errors.add("messages[0].content", "Job description is required");
            }
        }
        errors.into_result()
    }
}

/// Structured resume content the completion is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDraft {
    #[validate(custom(function = "not_blank"))]
    pub profession: String,
    pub education: Vec<DraftEducation>,
    pub skills: Vec<String>,
    pub experience: Vec<DraftExperience>,
    #[serde(default)]
    pub interests: String,
    #[validate(length(max = 500))]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DraftEducation {
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub school_name: String,
    pub start_date: String,
    pub end_date: String,
    pub degree: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DraftExperience {
    pub description: String,
    #[validate(custom(function = "not_blank"))]
    pub company_name: String,
    pub start_date: String,
    pub end_date: String,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
}

impl Form for ResumeDraft {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check_fragment("", self);
        errors.check_list("education", &self.education, 1, MAX_EDUCATION);
        errors.check_list("experience", &self.experience, 1, MAX_EXPERIENCE);
        errors.check_count("skills", self.skills.len(), 1, MAX_PROFILE_SKILLS);
        errors.into_result()
    }
}

/// Models sometimes emit `"gpa": 3.8` despite being asked for a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
