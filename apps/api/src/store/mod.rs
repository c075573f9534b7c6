//! Persistence seam for profile and resume data.
//!
//! `AppState` carries an `Arc<dyn ProfileStore>`. `PgStore` is the production
//! backend; every multi-row mutation runs inside a single transaction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::forms::contact::{ContactFields, NameFields, ProfileFieldsForm};
use crate::forms::skills::SkillInput;
use crate::forms::FieldErrors;
use crate::models::profile::{ProfileRow, ProfileView, SchoolRow, WorkRow};
use crate::models::resume::{ResumeSummary, ResumeView};
use crate::profile::reconcile::SkillPlan;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profile of `user_id` joined with contact, education, work, skills and email.
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<ProfileView>, AppError>;

    /// Writes name fields, then updates or creates the contact row.
    async fn upsert_name_and_contact(
        &self,
        profile_id: Uuid,
        name: &NameFields,
        contact: &ContactFields,
    ) -> Result<ProfileRow, AppError>;

    /// Returns the number of profile rows updated.
    async fn update_profile_fields(
        &self,
        user_id: Uuid,
        fields: &ProfileFieldsForm,
    ) -> Result<u64, AppError>;

    /// Deletes every school under `profile_id` (when given), then upserts `rows` by id.
    /// An id owned by a resume snapshot is rejected and nothing is written.
    async fn replace_schools(
        &self,
        profile_id: Option<Uuid>,
        rows: &[SchoolRow],
    ) -> Result<(), AppError>;

    /// Deletes every work row under `profile_id` (when given), then upserts `rows` by id.
    /// An id owned by a resume snapshot is rejected and nothing is written.
    async fn replace_works(&self, profile_id: Option<Uuid>, rows: &[WorkRow])
        -> Result<(), AppError>;

    /// Positional skill reconciliation, see [`crate::profile::reconcile::plan_skills`].
    async fn reconcile_skills(
        &self,
        profile_id: Uuid,
        skills: &[SkillInput],
    ) -> Result<SkillPlan, AppError>;

    /// Newest first.
    async fn list_resumes(&self, profile_id: Uuid) -> Result<Vec<ResumeSummary>, AppError>;

    async fn load_resume(&self, resume_id: Uuid) -> Result<Option<ResumeView>, AppError>;

    /// Inserts the resume row and its education/work copies.
    async fn insert_resume(&self, snapshot: &ResumeView) -> Result<(), AppError>;
}

/// Validation failure for a submitted id that already belongs to a resume snapshot.
pub(crate) fn frozen_row(list: &str, position: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.add(
        format!("{list}[{position}].id"),
        "Belongs to a saved resume and cannot be edited",
    );
    errors
}
