#![allow(dead_code)]

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use gh_client::{GithubApiError, GithubClient};
use http::StatusCode;
use serde_json::{json, Value};

pub enum Reply<T> {
    Ok(T),
    Status(StatusCode),
    Transport,
}

impl<T: Clone> Reply<T> {
    fn resolve(&self, endpoint: String) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status) => Err(GithubApiError::status(*status, endpoint).into()),
            Reply::Transport => Err(anyhow!("connection refused")),
        }
    }
}

/// Serves a fixed user reply and a fixed list of repository pages.
pub struct ScriptedClient {
    user: Reply<Value>,
    pages: Vec<Reply<Vec<Value>>>,
    pub repo_calls: Mutex<Vec<(u32, String, u32)>>,
    pub user_calls: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(user: Reply<Value>, pages: Vec<Reply<Vec<Value>>>) -> Self {
        Self {
            user,
            pages,
            repo_calls: Mutex::new(Vec::new()),
            user_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn repo_pages_requested(&self) -> Vec<u32> {
        self.repo_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(page, _, _)| *page)
            .collect()
    }
}

#[async_trait]
impl GithubClient for ScriptedClient {
    async fn get_user(&self, login: &str) -> Result<Value> {
        self.user_calls.lock().unwrap().push(login.to_string());
        self.user.resolve(format!("users/{login}"))
    }

    async fn list_user_repos(
        &self,
        login: &str,
        sort: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        self.repo_calls
            .lock()
            .unwrap()
            .push((page, sort.to_string(), per_page));
        match self.pages.get(page as usize - 1) {
            Some(reply) => reply.resolve(format!("users/{login}/repos")),
            None => Ok(Vec::new()),
        }
    }
}

pub fn user_json(login: &str, public_repos: u64) -> Value {
    json!({
        "id": 583231,
        "login": login,
        "name": "The Octocat",
        "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
        "html_url": format!("https://github.com/{login}"),
        "bio": null,
        "location": "San Francisco",
        "blog": "https://github.blog",
        "followers": 20000,
        "following": 9,
        "public_repos": public_repos,
        "public_gists": 8,
        "created_at": "2011-01-25T18:44:36Z"
    })
}

/// `day` drives `updated_at`, so higher ids are more recently updated.
pub fn repo_json(id: i64, day: u32) -> Value {
    json!({
        "id": id,
        "name": format!("repo-{id}"),
        "description": format!("Repository number {id}"),
        "language": "Rust",
        "stargazers_count": id * 3,
        "forks_count": id,
        "open_issues_count": 0,
        "watchers_count": id * 3,
        "size": 100 + id,
        "created_at": "2015-01-01T00:00:00Z",
        "updated_at": format!("2023-01-{:02}T12:00:00Z", day),
        "pushed_at": format!("2023-01-{:02}T12:00:00Z", day),
        "html_url": format!("https://github.com/octocat/repo-{id}"),
        "fork": id % 2 == 0,
        "archived": false
    })
}

pub fn full_page(start_id: i64, len: usize) -> Vec<Value> {
    (0..len as i64)
        .map(|offset| repo_json(start_id + offset, 1 + (offset % 28) as u32))
        .collect()
}
