use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use common::config::FetchConfig;
use gh_client::{upstream_status, GithubClient, RepoPayload, UserPayload};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::metrics;
use crate::models::{Repository, UserProfile};
use crate::query::SortKey;

/// Page size and page ceiling for the repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    pub per_page: u32,
    pub max_pages: u32,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            per_page: 100,
            max_pages: 20,
        }
    }
}

impl From<&FetchConfig> for FetchLimits {
    fn from(config: &FetchConfig) -> Self {
        Self {
            per_page: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedProfile {
    pub user: UserProfile,
    pub repositories: Vec<Repository>,
}

/// Display strings are the messages shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Please enter a username")]
    InvalidUsername,
    #[error("User not found")]
    UserNotFound { login: String },
    #[error("Failed to fetch repositories")]
    RepositoryFetchFailed { page: u32 },
    #[error("An error occurred")]
    Network(#[source] anyhow::Error),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUsername => "invalid_username",
            FetchError::UserNotFound { .. } => "user_not_found",
            FetchError::RepositoryFetchFailed { .. } => "repository_fetch_failed",
            FetchError::Network(_) => "network",
        }
    }
}

pub struct ProfileFetcher<C: GithubClient + ?Sized> {
    client: Arc<C>,
    limits: FetchLimits,
}

impl<C: GithubClient + ?Sized> ProfileFetcher<C> {
    pub fn new(client: Arc<C>, limits: FetchLimits) -> Self {
        Self { client, limits }
    }

    pub fn limits(&self) -> FetchLimits {
        self.limits
    }

    /// Fetches the user, then walks repository pages one at a time until a
    /// short page or the page ceiling. Any failure discards everything.
    #[instrument(skip(self, username), fields(login = %username.trim()))]
    pub async fn fetch(
        &self,
        username: &str,
        sort: Option<SortKey>,
    ) -> Result<FetchedProfile, FetchError> {
        let started = Instant::now();
        let result = self.fetch_inner(username.trim(), sort).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(err) => err.kind(),
        };
        metrics::FETCHES_TOTAL.with_label_values(&[outcome]).inc();
        metrics::FETCH_DURATION
            .with_label_values(&[outcome])
            .observe(started.elapsed().as_secs_f64());
        match &result {
            Ok(profile) => {
                metrics::REPOSITORIES_FETCHED_TOTAL.inc_by(profile.repositories.len() as u64);
                info!(
                    repositories = profile.repositories.len(),
                    public_repos = profile.user.public_repos,
                    "fetched profile"
                );
            }
            Err(FetchError::Network(err)) => warn!(error = ?err, "profile fetch failed"),
            Err(err) => warn!(error = %err, kind = err.kind(), "profile fetch failed"),
        }
        result
    }

    async fn fetch_inner(
        &self,
        login: &str,
        sort: Option<SortKey>,
    ) -> Result<FetchedProfile, FetchError> {
        if login.is_empty() {
            return Err(FetchError::InvalidUsername);
        }

        let user_value = self.client.get_user(login).await.map_err(|err| {
            if upstream_status(&err).is_some() {
                FetchError::UserNotFound {
                    login: login.to_string(),
                }
            } else {
                FetchError::Network(err)
            }
        })?;
        let payload: UserPayload = decode(user_value)?;
        let user = UserProfile::from_payload(&payload);

        let upstream_sort = SortKey::upstream_param(sort);
        let per_page = self.limits.per_page;
        let mut repositories = Vec::new();
        let mut seen = HashSet::new();
        let mut page = 1;

        while page <= self.limits.max_pages {
            let items = self
                .client
                .list_user_repos(login, upstream_sort, page, per_page)
                .await
                .map_err(|err| {
                    if upstream_status(&err).is_some() {
                        FetchError::RepositoryFetchFailed { page }
                    } else {
                        FetchError::Network(err)
                    }
                })?;
            metrics::REPOSITORY_PAGES_TOTAL.inc();
            let count = items.len();
            debug!(page, count, "received repository page");

            for value in items {
                let payload: RepoPayload = decode(value)?;
                if seen.insert(payload.id) {
                    repositories.push(Repository::from_payload(&payload));
                }
            }

            if count < per_page as usize {
                break;
            }
            page += 1;
        }

        Ok(FetchedProfile { user, repositories })
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|err| FetchError::Network(err.into()))
}
