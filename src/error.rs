use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: {0}")]
    InvalidPayload(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl Error {
    /// Stable machine-readable kind, mirrored in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_)
            | Error::InvalidPayload(_)
            | Error::Json(_)
            | Error::Multipart(_) => "validation_error",
            Error::NotFound(_) => "not_found",
            Error::Config(_) => "configuration_error",
            Error::Storage(_) | Error::Database(_) | Error::Io(_) => "storage_error",
            Error::Upstream(_) | Error::Reqwest(_) | Error::Token(_) => "upstream_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            "validation_error" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_message = match &self {
            Error::Validation(msg) | Error::NotFound(msg) => msg.clone(),
            Error::InvalidPayload(err) => err.to_string(),
            Error::Json(err) => err.to_string(),
            Error::Multipart(err) => err.to_string(),
            Error::Config(msg) => {
                tracing::error!("{}", msg);
                "Server configuration error".to_string()
            }
            Error::Storage(_) | Error::Database(_) | Error::Io(_) => {
                tracing::error!(error = %self, "storage failure");
                "Storage operation failed".to_string()
            }
            Error::Upstream(_) | Error::Reqwest(_) | Error::Token(_) => {
                tracing::error!(error = %self, "upstream failure");
                "Upstream service failed".to_string()
            }
        };

        let body = Json(json!({ "error": error_message, "code": self.kind() }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for Error {
    fn from(rejection: MultipartRejection) -> Self {
        Error::Validation(rejection.body_text())
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
