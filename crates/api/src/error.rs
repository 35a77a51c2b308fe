use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marie_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `marie_core` (or a store).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Status code, machine-readable code and message for this error.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation { field, message } => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("{field} {message}"),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let AppError::Core(CoreError::Validation { field, .. }) = &self {
            body["field"] = json!(field);
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_with_field() {
        let err = AppError::from(CoreError::validation("name", "must not be blank"));
        let (status, code, message) = err.classify();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(message, "name must not be blank");
    }

    #[test]
    fn internal_message_is_sanitized() {
        let err = AppError::from(CoreError::Internal("connection refused on 10.0.0.3".into()));
        let (status, _, message) = err.classify();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("10.0.0.3"));
    }

    #[test]
    fn not_found_and_conflict_statuses() {
        let not_found = AppError::from(CoreError::NotFound {
            entity: "Laboratory",
            id: 4,
        });
        assert_eq!(not_found.classify().0, StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(CoreError::Conflict("dup".into())).classify().0,
            StatusCode::CONFLICT
        );
    }
}
