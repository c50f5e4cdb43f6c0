//! Handler error taxonomy.
//!
//! Every failure detected while serving a request ends up as one of these
//! variants, and every variant maps to exactly one terminal response.

use std::fmt::Display;

use thiserror::Error;

use crate::auth::store::StoreError;
use crate::http::parser::ParseError;
use crate::http::response::StatusCode;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("HTTP version not supported: {0}")]
    VersionNotSupported(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn bad_request(reason: impl Display) -> Self {
        HandlerError::BadRequest(reason.to_string())
    }

    pub fn internal(context: &str, err: impl Display) -> Self {
        HandlerError::Internal(format!("{}: {}", context, err))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::BadRequest(_) => StatusCode::BadRequest,
            HandlerError::Unauthorized => StatusCode::Unauthorized,
            HandlerError::NotFound(_) => StatusCode::NotFound,
            HandlerError::MethodNotAllowed(_) => StatusCode::MethodNotAllowed,
            HandlerError::VersionNotSupported(_) => StatusCode::HttpVersionNotSupported,
            HandlerError::Internal(_) => StatusCode::InternalServerError,
        }
    }
}

impl From<ParseError> for HandlerError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnsupportedVersion(v) => HandlerError::VersionNotSupported(v),
            other => HandlerError::bad_request(other),
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError::internal("credential store", err)
    }
}
