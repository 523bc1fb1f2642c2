//! Proxy error types.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.
//! The Display text carries backend detail for server logs; clients only ever
//! see the fixed [`ProxyError::client_message`].

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};

use crate::services::StorageError;

pub const FILE_PATH_NOT_SPECIFIED: &str = "File path not specified";
pub const INVALID_FILE_PATH: &str = "Invalid file path";
pub const BUCKET_NOT_DEFINED: &str = "bucket name not defined";

pub const ACCESS_DENIED_MESSAGE: &str = "🔐 Access Denied! The guard's security clearance is insufficient to enter this restricted wing of the prison! 👮‍♂️🚫";
pub const NOT_FOUND_MESSAGE: &str =
    "🚫 Sorry! That prisoner has escaped from the cell. The warden is still searching the facility! 👮‍♂️";
pub const NO_SUCH_BUCKET_MESSAGE: &str =
    "🏢 Prison facility not found! The entire wing seems to have vanished from the records! 📋❌";

/// Terminal outcome of a proxied request, as written to the access log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    BadRequest,
    AccessDenied,
    GenericAccessDenied,
    NoSuchKey,
    NoSuchBucket,
    UnknownError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::BadRequest => "BadRequest",
            Self::AccessDenied => "AccessDenied",
            Self::GenericAccessDenied => "GenericAccessDenied",
            Self::NoSuchKey => "NoSuchKey",
            Self::NoSuchBucket => "NoSuchBucket",
            Self::UnknownError => "UnknownError",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-level failures.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Missing or malformed key, or missing bucket configuration
    #[error("Bad request: {0}")]
    BadRequest(&'static str),

    /// Backend refused access with an explicit error code
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Backend error detail mentioned access denial without a matching code
    #[error("Access denied (from error detail): {0}")]
    GenericAccessDenied(String),

    /// Object does not exist
    #[error("Object not found: {0}")]
    NoSuchKey(String),

    /// Bucket does not exist
    #[error("Bucket not found: {0}")]
    NoSuchBucket(String),

    /// Any other backend failure
    #[error("Unclassified storage error: {0}")]
    Unknown(String),
}

impl ProxyError {
    /// Access log tag for this failure.
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::BadRequest(_) => Outcome::BadRequest,
            Self::AccessDenied(_) => Outcome::AccessDenied,
            Self::GenericAccessDenied(_) => Outcome::GenericAccessDenied,
            Self::NoSuchKey(_) => Outcome::NoSuchKey,
            Self::NoSuchBucket(_) => Outcome::NoSuchBucket,
            Self::Unknown(_) => Outcome::UnknownError,
        }
    }

    /// Fixed message returned to the client.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::BadRequest(message) => *message,
            Self::AccessDenied(_) | Self::GenericAccessDenied(_) => ACCESS_DENIED_MESSAGE,
            Self::NoSuchKey(_) | Self::Unknown(_) => NOT_FOUND_MESSAGE,
            Self::NoSuchBucket(_) => NO_SUCH_BUCKET_MESSAGE,
        }
    }
}

impl From<StorageError> for ProxyError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AccessDenied(detail) => Self::AccessDenied(detail),
            StorageError::NoSuchKey(detail) => Self::NoSuchKey(detail),
            StorageError::NoSuchBucket(detail) => Self::NoSuchBucket(detail),
            StorageError::Other(detail) if detail.contains("AccessDenied") => {
                Self::GenericAccessDenied(detail)
            }
            StorageError::Other(detail) => Self::Unknown(detail),
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AccessDenied(_) | Self::GenericAccessDenied(_) => StatusCode::FORBIDDEN,
            Self::NoSuchKey(_) | Self::NoSuchBucket(_) | Self::Unknown(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.client_message())
    }
}

/// Convenience type alias for Results with ProxyError.
pub type ProxyResult<T> = Result<T, ProxyError>;
