//! HTTP error responses
//!
//! The one place where repository error kinds become status codes:
//!
//! | Kind | Status |
//! |---|---|
//! | `NotFound` | 404 |
//! | `AlreadyExists` | 409 |
//! | `Validation` | 400 |
//! | `NotImplemented` | 501 |
//! | `Backend`, `Serialization` | 500 |
//!
//! Bodies are a bare JSON string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gopher_core::GopherError;

pub const NOT_FOUND_MESSAGE: &str = "Gopher Not found";
pub const ALREADY_EXISTS_MESSAGE: &str = "Gopher already exists";
pub const INVALID_BODY_MESSAGE: &str = "Error unmarshalling request body";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    pub fn invalid_body() -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE)
    }

    /// Map a repository error; `failure` is the message used for server-side
    /// failures of the operation at hand.
    pub fn from_gopher_error(err: &GopherError, failure: &str) -> Self {
        match err {
            GopherError::NotFound(_) => Self::not_found(),
            GopherError::AlreadyExists(_) => {
                Self::new(StatusCode::CONFLICT, ALREADY_EXISTS_MESSAGE)
            }
            GopherError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg.clone()),
            GopherError::NotImplemented(_) => Self::new(StatusCode::NOT_IMPLEMENTED, failure),
            GopherError::Backend(_) | GopherError::Serialization(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.message)).into_response()
    }
}
