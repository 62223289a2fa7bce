use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use stance_shared::{Error, ErrorCode, ValidationError};
use thiserror::Error;
use crate::storage::StorageError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("No post found: {0}")]
    NotFound(String),
    #[error("Invalid stance: {0}")]
    InvalidStance(String),
    #[error("Stance storage unavailable: {0}")]
    StoreUnavailable(#[from] StorageError),
}

impl TrackerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TrackerError::NotFound(_) => ErrorCode::NotFound,
            TrackerError::InvalidStance(_) => ErrorCode::InvalidStance,
            TrackerError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
        }
    }
}

impl From<TrackerError> for Error {
    fn from(error: TrackerError) -> Self {
        match error {
            TrackerError::NotFound(what) => Error::not_found(what),
            TrackerError::InvalidStance(raw) => Error::with_details(ErrorCode::InvalidStance, "Unknown stance", raw),
            TrackerError::StoreUnavailable(e) => Error::store_unavailable(e.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    fn into_body(self) -> Error {
        match self {
            ApiError::Tracker(e) => e.into(),
            ApiError::Validation(e) => e.into(),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let body = self.into_body();
        let status = match body.code {
            ErrorCode::NotFound => Status::NotFound,
            ErrorCode::InvalidStance | ErrorCode::InvalidInput => Status::BadRequest,
            ErrorCode::StoreUnavailable => Status::ServiceUnavailable,
        };

        rocket::Response::build_from(Json(body).respond_to(req)?)
            .status(status)
            .ok()
    }
}
