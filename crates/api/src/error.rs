use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use profile::FetchError;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidUsername => Self::BadRequest(err.to_string()),
            FetchError::UserNotFound { .. } => Self::NotFound(err.to_string()),
            FetchError::RepositoryFetchFailed { .. } | FetchError::Network(_) => {
                Self::Upstream(err.to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(ErrorBody { error: message });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
