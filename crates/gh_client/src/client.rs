use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use http::{header, Request, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::GithubApiError;
use crate::exec::HttpExec;
use crate::metrics;

/// Read-only view of the two GitHub endpoints the profile viewer needs.
#[async_trait]
pub trait GithubClient: Send + Sync {
    async fn get_user(&self, login: &str) -> Result<Value>;
    async fn list_user_repos(
        &self,
        login: &str,
        sort: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>>;
}

pub struct RestGithubClient {
    exec: Arc<dyn HttpExec>,
    base: Url,
    user_agent: String,
}

impl RestGithubClient {
    pub fn new(exec: Arc<dyn HttpExec>, base_url: &str, user_agent: String) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("base url {base_url} cannot carry a path"));
        }
        Ok(Self {
            exec,
            base,
            user_agent,
        })
    }

    async fn get_json(&self, url: Url, kind: &'static str) -> Result<Value> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        debug!(endpoint = %endpoint, url = %url, "Dispatching GitHub request");
        let start = Instant::now();
        let response = self.execute(url).await?;
        metrics::LATENCY
            .with_label_values(&[kind])
            .observe(start.elapsed().as_secs_f64());
        let status = response.status();
        metrics::REQUESTS_TOTAL
            .with_label_values(&[kind, metrics::status_class(status)])
            .inc();
        if status.is_success() {
            let body = response.into_body();
            let value: Value = serde_json::from_slice(&body)?;
            Ok(value)
        } else {
            Err(GithubApiError::status(status, endpoint).into())
        }
    }

    async fn get_json_array(&self, url: Url, kind: &'static str) -> Result<Vec<Value>> {
        let endpoint = url.path().trim_start_matches('/').to_string();
        let value = self.get_json(url, kind).await?;
        match value {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(GithubApiError::shape(endpoint, "expected array response").into()),
        }
    }

    #[instrument(skip(self), fields(url = %url))]
    async fn execute(&self, url: Url) -> Result<http::Response<Vec<u8>>> {
        let uri: http::Uri = url.as_str().parse()?;
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::USER_AGENT, self.user_agent.clone())
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .body(Vec::new())?;

        self.exec.execute(request).await
    }

    /// Appends path segments to the base url, percent-encoding each one.
    fn join(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_query(url: &mut Url, params: &[(&str, String)]) {
        let mut query_pairs = url.query_pairs_mut();
        for (key, val) in params {
            query_pairs.append_pair(key, val);
        }
    }
}

#[async_trait]
impl GithubClient for RestGithubClient {
    async fn get_user(&self, login: &str) -> Result<Value> {
        let url = self.join(&["users", login])?;
        self.get_json(url, "user").await
    }

    async fn list_user_repos(
        &self,
        login: &str,
        sort: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let mut url = self.join(&["users", login, "repos"])?;
        let params = [
            ("sort", sort.to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        Self::with_query(&mut url, &params);
        self.get_json_array(url, "repos").await
    }
}

/// Status of the upstream response behind `err`, if it was a non-success reply.
pub fn upstream_status(err: &anyhow::Error) -> Option<StatusCode> {
    err.downcast_ref::<GithubApiError>()
        .and_then(GithubApiError::status_code)
}
