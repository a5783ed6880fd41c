pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("http error: {0}")]
    Http(#[source] anyhow::Error),
}

impl AppError {
    pub fn http(err: impl Into<anyhow::Error>) -> Self {
        Self::Http(err.into())
    }
}
