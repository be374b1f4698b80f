//! Errors raised by feature toggle operations and their HTTP mapping.

use crate::storage::StorageError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

pub const NOT_INITIALIZED: &str = "Database not initialized";
pub const DATE_TIME_FORMAT_HINT: &str = "Invalid date format, use YYYY-MM-DD HH:MM:SS";
pub const CREATE_DATE_TIME_FORMAT_HINT: &str =
    "Invalid date format. Please use YYYY-MM-DD HH:MM:SS";
pub const DATE_FORMAT_HINT: &str = "Invalid date format, use YYYY-MM-DD";
pub const BEGINNING_AFTER_EXPIRATION: &str = "Beginning date must be before expiration date";
pub const EXPIRATION_BEFORE_CURRENT_BEGINNING: &str =
    "Expiration date cannot be before beginning date";
pub const BEGINNING_AFTER_CURRENT_EXPIRATION: &str =
    "Beginning date cannot be after expiration date";
pub const NO_DATES: &str = "No dates provided";
pub const NOT_FOUND: &str = "Feature toggle not found";

#[derive(Debug)]
pub enum ToggleError {
    /// No storage connection could be obtained
    NotInitialized,
    /// Missing, empty or malformed request fields
    InvalidRequest(String),
    /// A date string did not match the expected format
    InvalidDate(&'static str),
    /// A date ordering rule was violated
    DateOrder(&'static str),
    NotFound,
    Storage(StorageError),
}

impl std::fmt::Display for ToggleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToggleError::NotInitialized => f.write_str(NOT_INITIALIZED),
            ToggleError::InvalidRequest(msg) => f.write_str(msg),
            ToggleError::InvalidDate(msg) => f.write_str(msg),
            ToggleError::DateOrder(msg) => f.write_str(msg),
            ToggleError::NotFound => f.write_str(NOT_FOUND),
            ToggleError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ToggleError {}

impl From<StorageError> for ToggleError {
    fn from(e: StorageError) -> Self {
        ToggleError::Storage(e)
    }
}

impl ResponseError for ToggleError {
    fn status_code(&self) -> StatusCode {
        match self {
            ToggleError::NotInitialized | ToggleError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ToggleError::InvalidRequest(_)
            | ToggleError::InvalidDate(_)
            | ToggleError::DateOrder(_) => StatusCode::BAD_REQUEST,
            ToggleError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ToggleError::Storage(e) => {
                log::error!("Feature toggle storage failure: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
