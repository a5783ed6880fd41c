use serde::Serialize;
use tracing::debug;

use crate::display::{sort_options, ProfileCard, ResultsView, SortOption};
use crate::fetcher::{FetchError, FetchedProfile};
use crate::models::Repository;
use crate::paginator::{is_valid_page, total_pages};
use crate::query::{apply, QueryState, SortKey};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    Idle,
    Loading { username: String },
    Ready(FetchedProfile),
    Error { username: String, message: String },
}

impl ViewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewStatus::Idle => "idle",
            ViewStatus::Loading { .. } => "loading",
            ViewStatus::Ready(_) => "ready",
            ViewStatus::Error { .. } => "error",
        }
    }
}

/// Handed out by [`ProfileView::begin_search`]; only the newest ticket may complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    username: String,
}

impl SearchTicket {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// The single stateful view: idle -> loading -> ready | error, plus the query.
#[derive(Debug, Clone)]
pub struct ProfileView {
    status: ViewStatus,
    query: QueryState,
    generation: u64,
    page_size: usize,
}

impl ProfileView {
    pub fn new(page_size: usize) -> Self {
        Self {
            status: ViewStatus::Idle,
            query: QueryState::default(),
            generation: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn begin_search(&mut self, username: &str) -> SearchTicket {
        self.generation += 1;
        let username = username.trim().to_string();
        self.status = ViewStatus::Loading {
            username: username.clone(),
        };
        self.query.reset_page();
        SearchTicket {
            generation: self.generation,
            username,
        }
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a fetch outcome. Returns `false` and changes nothing when a newer
    /// search has started since `ticket` was issued.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        result: Result<FetchedProfile, FetchError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                username = %ticket.username,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale search result"
            );
            return false;
        }
        self.status = match result {
            Ok(profile) => ViewStatus::Ready(profile),
            Err(err) => ViewStatus::Error {
                username: ticket.username.clone(),
                message: err.to_string(),
            },
        };
        self.query.reset_page();
        true
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.query.set_term(term);
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.query.set_sort(sort);
    }

    pub fn set_include_forks(&mut self, include: bool) {
        self.query.set_include_forks(include);
    }

    pub fn set_include_archived(&mut self, include: bool) {
        self.query.set_include_archived(include);
    }

    fn repositories(&self) -> &[Repository] {
        match &self.status {
            ViewStatus::Ready(profile) => &profile.repositories,
            _ => &[],
        }
    }

    pub fn filtered(&self) -> Vec<&Repository> {
        apply(self.repositories(), &self.query)
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len(), self.page_size)
    }

    /// Ignores targets outside `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if !is_valid_page(page, self.total_pages()) {
            return false;
        }
        self.query.page = page;
        true
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let (username, error) = match &self.status {
            ViewStatus::Idle | ViewStatus::Ready(_) => (None, None),
            ViewStatus::Loading { username } => (Some(username.clone()), None),
            ViewStatus::Error { username, message } => {
                (Some(username.clone()), Some(message.clone()))
            }
        };
        let (profile, results) = match &self.status {
            ViewStatus::Ready(fetched) => (
                Some(ProfileCard::build(&fetched.user, &fetched.repositories)),
                Some(ResultsView::build(
                    &fetched.repositories,
                    &self.query,
                    self.page_size,
                )),
            ),
            _ => (None, None),
        };
        ViewSnapshot {
            status: self.status.as_str(),
            username: username.or_else(|| profile.as_ref().map(|card| card.login.clone())),
            error,
            query: self.query.clone(),
            sort_options: sort_options(),
            profile,
            results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub status: &'static str,
    pub username: Option<String>,
    pub error: Option<String>,
    pub query: QueryState,
    pub sort_options: Vec<SortOption>,
    pub profile: Option<ProfileCard>,
    pub results: Option<ResultsView>,
}
