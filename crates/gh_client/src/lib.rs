pub mod client;
pub mod error;
pub mod exec;
pub mod metrics;
pub mod payloads;

pub use client::{upstream_status, GithubClient, RestGithubClient};
pub use error::GithubApiError;
pub use exec::{HttpExec, ReqwestExecutor};
pub use http::StatusCode;
pub use payloads::{RepoPayload, UserPayload};
