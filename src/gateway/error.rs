use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::Error;

fn status_code(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) | Error::DuplicateUsername(_) | Error::MarksOverflow { .. } => {
            StatusCode::BAD_REQUEST
        }
        Error::InvalidCredentials
        | Error::MissingHeader
        | Error::MissingToken
        | Error::InvalidToken
        | Error::ExpiredToken => StatusCode::UNAUTHORIZED,
        Error::NotFound => StatusCode::NOT_FOUND,
        Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let message = match &self {
            // Store details stay in the log
            Error::Database(e) => {
                error!(error = %e, "request failed in the database layer");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
