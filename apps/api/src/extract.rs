//! Request body extraction. Malformed or incomplete JSON is reported in the
//! same field-path shape as form validation instead of axum's plain-text 422.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::AppError;
use crate::forms::FieldErrors;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// `Json<T>` whose rejection is an `AppError::Validation`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, AppError> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                Err(rejection_errors(&rejection).into())
            }
        }
    }
}

fn rejection_errors(rejection: &JsonRejection) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match rejection {
        JsonRejection::JsonDataError(e) => {
            let text = e.body_text();
            let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text.as_str());
            let (path, message) = data_error_field(detail);
            errors.add(path, message);
        }
        other => errors.add("body", other.body_text()),
    }
    errors
}

/// Splits serde's `path: message at line L column C` into a field path and a message.
fn data_error_field(detail: &str) -> (String, String) {
    let detail = match detail.rfind(" at line ") {
        Some(at) => &detail[..at],
        None => detail,
    };
    let (prefix, message) = match detail.split_once(": ") {
        Some((path, message)) if !path.contains(' ') => (path, message),
        _ => ("", detail),
    };
    let prefix = if prefix == "." { "" } else { prefix };

    if let Some(field) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        return (path, "Required".to_string());
    }

    let path = if prefix.is_empty() { "body" } else { prefix };
    (path.to_string(), message.to_string())
}
