use crate::error::{Error, ErrorCode};
use crate::models::Rank;

pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = 3;
pub const MAX_USERNAME_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid rank: {0} (must be {MIN_RANK}-{MAX_RANK})")]
    InvalidRank(i64),
    #[error("Rank must be a number or 'clear', got {0:?}")]
    MalformedRank(String),
    #[error("Username is required")]
    EmptyUsername,
    #[error("Username exceeds maximum length of {MAX_USERNAME_LENGTH}")]
    UsernameTooLong,
    #[error("Password is required")]
    EmptyPassword,
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

/// Parses a rank as typed by a voter. `clear` and `none` withdraw the vote.
pub fn parse_rank(raw: &str) -> Result<Option<Rank>, ValidationError> {
    let raw = raw.trim();
    if ["clear", "none"].iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        return Ok(None);
    }

    let value: i64 = raw.parse().map_err(|_| ValidationError::MalformedRank(raw.to_string()))?;
    u8::try_from(value)
        .map_err(|_| ValidationError::InvalidRank(value))
        .and_then(Rank::try_from)
        .map(Some)
}

pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() { return Err(ValidationError::EmptyUsername); }
    if username.len() > MAX_USERNAME_LENGTH { return Err(ValidationError::UsernameTooLong); }
    if password.trim().is_empty() { return Err(ValidationError::EmptyPassword); }
    Ok(())
}
