use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::SessionUser;
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::forms::contact::{NameAndContactForm, ProfileFieldsForm};
use crate::forms::education::AddEducationInput;
use crate::forms::experience::AddWorkInput;
use crate::forms::skills::UpsertSkillsInput;
use crate::models::profile::{ProfileRow, ProfileView, SchoolRow, WorkRow};
use crate::profile::procedures::{self, SkillsOutcome};
use crate::state::AppState;

/// GET /api/v1/profiles/:user_id
pub async fn handle_read_profile(
    State(state): State<AppState>,
    _user: SessionUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileView>, AppError> {
    let view = procedures::read_profile(state.store.as_ref(), user_id).await?;
    Ok(Json(view))
}

/// PUT /api/v1/profile/contact
pub async fn handle_upsert_contact(
    State(state): State<AppState>,
    _user: SessionUser,
    JsonBody(form): JsonBody<NameAndContactForm>,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = procedures::upsert_name_and_contact(state.store.as_ref(), &form).await?;
    Ok(Json(profile))
}

/// PATCH /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    user: SessionUser,
    JsonBody(form): JsonBody<ProfileFieldsForm>,
) -> Result<StatusCode, AppError> {
    procedures::update_profile_fields(state.store.as_ref(), user.user_id, &form).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/profile/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    _user: SessionUser,
    JsonBody(input): JsonBody<AddEducationInput>,
) -> Result<Json<Vec<SchoolRow>>, AppError> {
    let rows = procedures::add_education(state.store.as_ref(), &input).await?;
    Ok(Json(rows))
}

/// PUT /api/v1/profile/work
pub async fn handle_add_work(
    State(state): State<AppState>,
    _user: SessionUser,
    JsonBody(input): JsonBody<AddWorkInput>,
) -> Result<Json<Vec<WorkRow>>, AppError> {
    let rows = procedures::add_work(state.store.as_ref(), &input).await?;
    Ok(Json(rows))
}

/// PUT /api/v1/profile/skills
pub async fn handle_upsert_skills(
    State(state): State<AppState>,
    _user: SessionUser,
    JsonBody(input): JsonBody<UpsertSkillsInput>,
) -> Result<Json<SkillsOutcome>, AppError> {
    let outcome = procedures::upsert_skills(state.store.as_ref(), &input).await?;
    Ok(Json(outcome))
}
