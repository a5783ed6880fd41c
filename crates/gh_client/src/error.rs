use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubApiError {
    #[error("github api error: {status} for {endpoint}")]
    Http {
        status: StatusCode,
        endpoint: String,
    },
    #[error("unexpected response shape for {endpoint}: {detail}")]
    Shape {
        endpoint: String,
        detail: &'static str,
    },
}

impl GithubApiError {
    pub fn status(status: StatusCode, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
        }
    }

    pub fn shape(endpoint: impl Into<String>, detail: &'static str) -> Self {
        Self::Shape {
            endpoint: endpoint.into(),
            detail,
        }
    }

    /// Upstream status, if the error came from a non-success response.
    pub fn status_code(&self) -> Option<StatusCode> {
        match *self {
            GithubApiError::Http { status, .. } => Some(status),
            GithubApiError::Shape { .. } => None,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            GithubApiError::Http { endpoint, .. } | GithubApiError::Shape { endpoint, .. } => {
                endpoint.as_str()
            }
        }
    }
}
