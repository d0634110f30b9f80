use actix_web::{error::JsonPayloadError, http::StatusCode, web, HttpResponse, ResponseError};
use database::{database::repository::RepositoryError, persistence::storage::StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of every error response
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ErrorMessage {
    pub message: String,
}

/// Single translation point from domain outcomes to HTTP responses
///
/// | Outcome | Status |
/// |---------|--------|
/// | Malformed request body | 400 |
/// | Request body over the size limit | 413 |
/// | No person with the dni | 404 |
/// | Store failure, including timeouts | 500 |
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Repository(RepositoryError::Store(err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Repository(RepositoryError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::BadRequest(_) | ApiError::PayloadTooLarge(_) => {
                log::warn!("Rejected request: {}", self)
            }
            ApiError::Repository(RepositoryError::NotFound(_)) => log::debug!("{}", self),
            ApiError::Repository(RepositoryError::Store(_)) => log::error!("{}", self),
        }

        HttpResponse::build(self.status_code()).json(ErrorMessage {
            message: self.to_string(),
        })
    }
}

impl From<JsonPayloadError> for ApiError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                ApiError::PayloadTooLarge(err.to_string())
            }
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// Body decoding for `web::Json` extractors. Bodies are read as JSON whatever their content
/// type. A body that cannot be decoded into a person is rejected, it is never replaced by an
/// empty one.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .content_type(|_| true)
        .error_handler(|err, _req| ApiError::from(err).into())
}
