use anyhow::anyhow;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::forms::contact::{NameAndContactForm, ProfileFieldsForm};
use crate::forms::education::AddEducationInput;
use crate::forms::experience::AddWorkInput;
use crate::forms::skills::UpsertSkillsInput;
use crate::forms::Form;
use crate::models::profile::{ProfileRow, ProfileView, SchoolRow, WorkRow};
use crate::profile::reconcile::{school_rows, work_rows};
use crate::store::ProfileStore;

/// Result of a skills reconciliation, reported as row counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillsOutcome {
    pub success: bool,
    pub deleted: usize,
    pub inserted: usize,
    pub updated: usize,
}

pub async fn read_profile(store: &dyn ProfileStore, user_id: Uuid) -> Result<ProfileView, AppError> {
    store
        .load_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))
}

pub async fn upsert_name_and_contact(
    store: &dyn ProfileStore,
    form: &NameAndContactForm,
) -> Result<ProfileRow, AppError> {
    form.check()?;
    let profile_id = form
        .id
        .ok_or_else(|| AppError::Internal(anyhow!("Profile ID not found")))?;
    store
        .upsert_name_and_contact(profile_id, &form.name, &form.contact)
        .await
}

/// Only ever touches the caller's own profile.
pub async fn update_profile_fields(
    store: &dyn ProfileStore,
    user_id: Uuid,
    form: &ProfileFieldsForm,
) -> Result<(), AppError> {
    form.check()?;
    match store.update_profile_fields(user_id, form).await? {
        0 => Err(AppError::NotFound("Profile not found".into())),
        _ => Ok(()),
    }
}

pub async fn add_education(
    store: &dyn ProfileStore,
    input: &AddEducationInput,
) -> Result<Vec<SchoolRow>, AppError> {
    input.check()?;
    let rows = school_rows(input.profile_id, &input.form.education)?;
    store.replace_schools(input.profile_id, &rows).await?;
    info!("Saved {} education entries", rows.len());
    Ok(rows)
}

pub async fn add_work(
    store: &dyn ProfileStore,
    input: &AddWorkInput,
) -> Result<Vec<WorkRow>, AppError> {
    input.check()?;
    let rows = work_rows(input.profile_id, &input.form.experience)?;
    store.replace_works(input.profile_id, &rows).await?;
    info!("Saved {} work entries", rows.len());
    Ok(rows)
}

pub async fn upsert_skills(
    store: &dyn ProfileStore,
    input: &UpsertSkillsInput,
) -> Result<SkillsOutcome, AppError> {
    input.check()?;
    let plan = store.reconcile_skills(input.profile_id, &input.skills).await?;
    Ok(SkillsOutcome {
        success: true,
        deleted: plan.delete.len(),
        inserted: plan.insert.len(),
        updated: plan.update.len(),
    })
}
