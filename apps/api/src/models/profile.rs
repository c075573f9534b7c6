use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profession: Option<String>,
    pub introduction: Option<String>,
    pub interests: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub phone: Option<String>,
    pub linked_in: Option<String>,
    pub portfolio: Option<String>,
    pub location: String,
}

/// Education row, owned by a profile or by a resume snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRow {
    pub id: Uuid,
    pub profile_id: Option<Uuid>,
    pub resume_id: Option<Uuid>,
    pub name: String,
    pub degree: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub gpa: Option<String>,
    pub location: Option<String>,
    pub position: i32,
}

/// Work row, owned by a profile or by a resume snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkRow {
    pub id: Uuid,
    pub profile_id: Option<Uuid>,
    pub resume_id: Option<Uuid>,
    pub name: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SkillRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub category: String,
    pub all: Vec<String>,
    pub position: i32,
}

/// Everything the profile pages show, joined into one response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: ProfileRow,
    pub email: Option<String>,
    pub contact: Option<ContactRow>,
    pub education: Vec<SchoolRow>,
    pub experience: Vec<WorkRow>,
    pub skills: Vec<SkillRow>,
}
