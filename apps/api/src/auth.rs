//! Session extraction. Authentication itself happens upstream; the proxy
//! forwards the verified user id in a header (`AUTH_USER_HEADER`).

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The signed-in user. Handlers that take this reject anonymous requests with 401.
#[derive(Debug, Clone, Copy)]
pub struct SessionUser {
    pub user_id: Uuid,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = &state.config.auth_user_header;
        let raw = parts
            .headers
            .get(header.as_str())
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let user_id = Uuid::parse_str(raw.trim()).map_err(|_| {
            debug!("Rejecting malformed {header} header");
            AppError::Unauthorized
        })?;
        Ok(SessionUser { user_id })
    }
}
