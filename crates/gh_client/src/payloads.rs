use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body of `GET /users/{login}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: i64,
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub public_gists: u64,
    pub created_at: DateTime<Utc>,
}

/// One element of `GET /users/{login}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoPayload {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub html_url: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
}
