pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::assist::handlers as assist;
use crate::profile::handlers as profile;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile
        .route("/api/v1/profiles/:user_id", get(profile::handle_read_profile))
        .route("/api/v1/profile", patch(profile::handle_update_profile))
        .route("/api/v1/profile/contact", put(profile::handle_upsert_contact))
        .route(
            "/api/v1/profile/education",
            put(profile::handle_add_education),
        )
        .route("/api/v1/profile/work", put(profile::handle_add_work))
        .route("/api/v1/profile/skills", put(profile::handle_upsert_skills))
        // Resumes
        .route(
            "/api/v1/profiles/:profile_id/resumes",
            get(resume::handle_list_resumes),
        )
        .route("/api/v1/resumes", post(resume::handle_create_resume))
        .route(
            "/api/v1/resumes/export",
            post(resume::handle_export_document),
        )
        .route("/api/v1/resumes/:id", get(resume::handle_get_resume))
        .route(
            "/api/v1/resumes/:id/export",
            get(resume::handle_export_resume),
        )
        // AI assist
        .route("/api/v1/chat", post(assist::handle_chat))
        .route("/api/v1/chat/draft", post(assist::handle_draft))
        .with_state(state)
}
