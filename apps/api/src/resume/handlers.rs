use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::auth::SessionUser;
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::forms::resume::{CreateResumeInput, ResumeDocumentForm};
use crate::forms::Form;
use crate::models::resume::{ResumeSummary, ResumeView};
use crate::resume::procedures::{self, CreatedResume};
use crate::resume::render::{render_document, render_snapshot};
use crate::state::AppState;

const MARKDOWN: &str = "text/markdown; charset=utf-8";

/// GET /api/v1/profiles/:profile_id/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    _user: SessionUser,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let resumes = procedures::list(state.store.as_ref(), profile_id).await?;
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    _user: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeView>, AppError> {
    let resume = procedures::read_by_id(state.store.as_ref(), id).await?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    _user: SessionUser,
    JsonBody(input): JsonBody<CreateResumeInput>,
) -> Result<(StatusCode, Json<CreatedResume>), AppError> {
    let created = procedures::create(state.store.as_ref(), &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/v1/resumes/export
pub async fn handle_export_document(
    _user: SessionUser,
    JsonBody(form): JsonBody<ResumeDocumentForm>,
) -> Result<impl IntoResponse, AppError> {
    form.check()?;
    Ok(([(header::CONTENT_TYPE, MARKDOWN)], render_document(&form)))
}

/// GET /api/v1/resumes/:id/export
pub async fn handle_export_resume(
    State(state): State<AppState>,
    _user: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let resume = procedures::read_by_id(state.store.as_ref(), id).await?;
    Ok(([(header::CONTENT_TYPE, MARKDOWN)], render_snapshot(&resume)))
}
