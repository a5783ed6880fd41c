//! Presentation records handed to the browser. Nothing here fetches or filters;
//! it only shapes already-derived data for rendering.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Repository, UserProfile};
use crate::paginator::{page_window, paginate, PageSlice};
use crate::query::{apply, QueryState, SortKey};

const FALLBACK_LANGUAGE_COLOR: &str = "#8b949e";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#2b7489"),
    ("Python", "#3572A5"),
    ("Java", "#b07219"),
    ("C++", "#f34b7d"),
    ("C", "#555555"),
    ("C#", "#239120"),
    ("PHP", "#4F5D95"),
    ("Ruby", "#701516"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Swift", "#ffac45"),
    ("Kotlin", "#F18E33"),
    ("Dart", "#00B4AB"),
    ("HTML", "#e34c26"),
    ("CSS", "#1572B6"),
    ("Vue", "#2c3e50"),
    ("React", "#61DAFB"),
];

pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_LANGUAGE_COLOR)
}

/// `Jan 25, 2011`
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y").to_string()
}

/// Profile blogs are often bare hosts; links need a scheme.
pub fn blog_href(blog: &str) -> String {
    if blog.starts_with("http") {
        blog.to_string()
    } else {
        format!("https://{blog}")
    }
}

/// Sum over the whole fetched set, independent of the active filters.
pub fn total_stars(repos: &[Repository]) -> u64 {
    repos.iter().map(|repo| repo.stars).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn sort_options() -> Vec<SortOption> {
    SortKey::ALL
        .iter()
        .map(|key| SortOption {
            value: key.as_str(),
            label: key.label(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogLink {
    pub href: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileCard {
    pub login: String,
    pub display_name: String,
    pub initial: String,
    pub avatar_url: String,
    pub profile_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<BlogLink>,
    pub joined: String,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    pub public_gists: u64,
    pub total_stars: u64,
}

impl ProfileCard {
    pub fn build(user: &UserProfile, repos: &[Repository]) -> Self {
        Self {
            login: user.login.clone(),
            display_name: user.name.clone().unwrap_or_else(|| user.login.clone()),
            initial: user
                .login
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default(),
            avatar_url: user.avatar_url.clone(),
            profile_url: user.html_url.clone(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            blog: user.blog.as_deref().map(|blog| BlogLink {
                href: blog_href(blog),
                label: blog.to_string(),
            }),
            joined: format_date(&user.created_at),
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
            public_gists: user.public_gists,
            total_stars: total_stars(repos),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryRow {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub language_color: Option<&'static str>,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    /// Only set when there is something to show.
    pub open_issues: Option<u64>,
    pub is_fork: bool,
    pub is_archived: bool,
    pub updated: String,
}

impl From<&Repository> for RepositoryRow {
    fn from(repo: &Repository) -> Self {
        Self {
            id: repo.id,
            name: repo.name.clone(),
            url: repo.html_url.clone(),
            description: repo.description.clone(),
            language: repo.language.clone(),
            language_color: repo.language.as_deref().map(language_color),
            stars: repo.stars,
            forks: repo.forks,
            watchers: repo.watchers,
            open_issues: (repo.open_issues > 0).then_some(repo.open_issues),
            is_fork: repo.is_fork,
            is_archived: repo.is_archived,
            updated: format_date(&repo.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationInfo {
    pub page: usize,
    pub total_pages: usize,
    pub buttons: Vec<usize>,
    pub showing_from: usize,
    pub showing_to: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> From<&PageSlice<T>> for PaginationInfo {
    fn from(slice: &PageSlice<T>) -> Self {
        Self {
            page: slice.page,
            total_pages: slice.total_pages,
            buttons: page_window(slice.page, slice.total_pages),
            showing_from: slice.first_index(),
            showing_to: slice.last_index(),
            total: slice.total_items,
            has_previous: slice.has_previous(),
            has_next: slice.has_next(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub filtered_count: usize,
    pub repositories: Vec<RepositoryRow>,
    pub pagination: PaginationInfo,
}

impl ResultsView {
    /// Query engine, then paginator, then row shaping.
    pub fn build(repos: &[Repository], query: &QueryState, page_size: usize) -> Self {
        let filtered = apply(repos, query);
        let slice = paginate(&filtered, query.page, page_size);
        let pagination = PaginationInfo::from(&slice);
        Self {
            filtered_count: filtered.len(),
            repositories: slice.items.into_iter().map(RepositoryRow::from).collect(),
            pagination,
        }
    }
}
