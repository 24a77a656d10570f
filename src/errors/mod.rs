use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Name and email are required!")]
    MissingFields,
    #[error("Email already registered")]
    EmailTaken,
    #[error("No file uploaded!")]
    NoFile,
    #[error("Only .jpg, .jpeg and .png images are allowed!")]
    InvalidFileType,
    #[error("File too large! Maximum size is 5MB.")]
    FileTooLarge,
    #[error("{0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("File storage error: {0}")]
    StorageError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct DetailedErrorResponse {
    error: &'static str,
    details: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_)
            | AppError::StorageError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            // The duplicate-email rejection is the one client error keyed by "message".
            AppError::EmailTaken => builder.json(MessageResponse { message: self.to_string() }),
            AppError::DatabaseError(details) => builder.json(DetailedErrorResponse {
                error: "Database error",
                details: details.clone(),
            }),
            AppError::StorageError(details) => builder.json(DetailedErrorResponse {
                error: "File storage error",
                details: details.clone(),
            }),
            AppError::InternalServerError(details) => builder.json(DetailedErrorResponse {
                error: "Internal server error",
                details: details.clone(),
            }),
            _ => builder.json(ErrorResponse { error: self.to_string() }),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
