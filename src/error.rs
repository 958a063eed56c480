use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json};
use serde_json::json;
use tracing::error;

const SERVER_FAULT_MESSAGE: &str = "An error occurred on the server.";

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(&'static str),
    Server(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::Server(cause) => {
                error!(%cause, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_FAULT_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "errorMessage": message }))).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Server(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
