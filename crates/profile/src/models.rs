use chrono::{DateTime, Utc};
use gh_client::{RepoPayload, UserPayload};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    pub public_gists: u64,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Empty strings from the API are treated as absent.
    pub fn from_payload(payload: &UserPayload) -> Self {
        Self {
            login: payload.login.clone(),
            name: non_empty(&payload.name),
            avatar_url: payload.avatar_url.clone(),
            html_url: non_empty(&payload.html_url),
            bio: non_empty(&payload.bio),
            location: non_empty(&payload.location),
            blog: non_empty(&payload.blog),
            followers: payload.followers,
            following: payload.following,
            public_repos: payload.public_repos,
            public_gists: payload.public_gists,
            created_at: payload.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub watchers: u64,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub html_url: String,
    pub is_fork: bool,
    pub is_archived: bool,
}

impl Repository {
    pub fn from_payload(payload: &RepoPayload) -> Self {
        Self {
            id: payload.id,
            name: payload.name.clone(),
            description: non_empty(&payload.description),
            language: non_empty(&payload.language),
            stars: payload.stargazers_count,
            forks: payload.forks_count,
            open_issues: payload.open_issues_count,
            watchers: payload.watchers_count,
            size: payload.size,
            created_at: payload.created_at,
            updated_at: payload.updated_at,
            pushed_at: payload.pushed_at,
            html_url: payload.html_url.clone(),
            is_fork: payload.fork,
            is_archived: payload.archived,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}
