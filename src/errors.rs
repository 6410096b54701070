use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("cannot change a {from} booking to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("cannot export booking: {0}")]
    Export(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = match &self {
            AppError::Validation { field, message } => {
                serde_json::json!({ "error": message, "field": field })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}
