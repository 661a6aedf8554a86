use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    #[error("Validation failed")]
    ValidationFailed,
    #[error("Storage unavailable")]
    StorageFailure,
    #[error("Stored data is corrupt")]
    CorruptData,
    #[error("Resource not found")]
    NotFound,
    #[error("Operation not authorized")]
    Unauthorized,
    #[error("Source unavailable")]
    SourceUnavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn storage(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self::with_details(ErrorCode::StorageFailure, message, cause.to_string())
    }

    pub fn corrupt(key: &str, cause: impl fmt::Display) -> Self {
        Self::with_details(ErrorCode::CorruptData, format!("Malformed blob under key '{key}'"), cause.to_string())
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

pub type Result<T> = std::result::Result<T, Error>;
