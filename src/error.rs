use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid user credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid user type: {0}")]
    InvalidUserType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File size exceeds {0} byte limit")]
    PayloadTooLarge(usize),

    #[error("Image upload failed: {0}")]
    UploadFailed(anyhow::Error),

    #[error("Employee provisioning failed: {0}")]
    Provisioning(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid user credentials".to_string(),
            ),
            Error::DuplicateEmail => (StatusCode::BAD_REQUEST, "Email already exists".to_string()),
            Error::InvalidUserType(raw) => {
                (StatusCode::BAD_REQUEST, format!("Invalid user type: {}", raw))
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::UnsupportedMediaType(ct) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid file type {}. Only JPEG and PNG are allowed", ct),
            ),
            Error::PayloadTooLarge(limit) => (
                StatusCode::BAD_REQUEST,
                format!("File size exceeds {} byte limit", limit),
            ),
            Error::UploadFailed(err) => {
                tracing::error!(error = ?err, "Image upload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Image upload failed: {}", err),
                )
            }
            Error::Provisioning(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Database(err) => {
                tracing::error!(error = ?err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Multipart(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Config(_) | Error::Anyhow(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
