use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum QuoteError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("unknown filter field `{0}`")]
    UnknownFilterField(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),
}

impl QuoteError {
    pub fn invalid(field: impl Into<String>, reason: impl ToString) -> Self {
        QuoteError::InvalidField {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            QuoteError::MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            QuoteError::InvalidField { .. } => (StatusCode::BAD_REQUEST, "INVALID_FIELD"),
            QuoteError::UnknownFilterField(_) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_FILTER_FIELD")
            }
            QuoteError::MalformedPayload(_) => (StatusCode::BAD_REQUEST, "MALFORMED_PAYLOAD"),
            QuoteError::DatabaseError(e) => {
                error!(error = %e, "storage failure");
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiErrorResponse { error: body }),
                )
                    .into_response();
            }
        };
        let body = ApiErrorBody {
            code: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
