use crate::error::{Error, ErrorCode};
use crate::models::{PostId, StanceKind};

pub const MAX_POST_ID_LENGTH: usize = 512;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown stance: {0}")]
    UnknownStance(String),
    #[error("Empty post identifier")]
    EmptyPostId,
    #[error("Post identifier exceeds maximum length of {MAX_POST_ID_LENGTH}")]
    PostIdTooLong,
}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Self {
        let code = match error {
            ValidationError::UnknownStance(_) => ErrorCode::InvalidStance,
            ValidationError::EmptyPostId | ValidationError::PostIdTooLong => ErrorCode::InvalidInput,
        };
        Error::new(code, error.to_string())
    }
}

pub fn parse_stance(raw: &str) -> Result<StanceKind, ValidationError> {
    raw.trim()
        .to_lowercase()
        .parse()
        .map_err(|_| ValidationError::UnknownStance(raw.to_string()))
}

pub fn validate_post_id(raw: &str) -> Result<PostId, ValidationError> {
    if raw.len() > MAX_POST_ID_LENGTH {
        return Err(ValidationError::PostIdTooLong);
    }
    PostId::parse(raw).ok_or(ValidationError::EmptyPostId)
}
