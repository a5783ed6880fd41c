use profile::display::{sort_options, ProfileCard, ResultsView, SortOption};
use profile::{QueryState, SortKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub username: String,
}

/// Absent fields leave the current value alone.
#[derive(Debug, Default, Deserialize)]
pub struct QueryUpdate {
    pub term: Option<String>,
    pub sort: Option<String>,
    pub include_forks: Option<bool>,
    pub include_archived: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

/// Query string of the one-shot profile endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub forks: Option<bool>,
    pub archived: Option<bool>,
    pub page: Option<usize>,
}

impl ProfileQuery {
    pub fn to_state(&self) -> QueryState {
        let defaults = QueryState::default();
        QueryState {
            term: self.q.clone().unwrap_or_default(),
            sort: match self.sort.as_deref() {
                Some(raw) => SortKey::parse(raw),
                None => defaults.sort,
            },
            include_forks: self.forks.unwrap_or(defaults.include_forks),
            include_archived: self.archived.unwrap_or(defaults.include_archived),
            page: self.page.unwrap_or(1).max(1),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub query: QueryState,
    pub sort_options: Vec<SortOption>,
    pub profile: ProfileCard,
    pub results: ResultsView,
}

impl ProfileResponse {
    pub fn new(query: QueryState, profile: ProfileCard, results: ResultsView) -> Self {
        Self {
            query,
            sort_options: sort_options(),
            profile,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_string_uses_view_defaults() {
        let state = ProfileQuery::default().to_state();
        assert_eq!(state, QueryState::default());
    }

    #[test]
    fn unknown_sort_means_no_reordering() {
        let query = ProfileQuery {
            sort: Some("popularity".into()),
            page: Some(0),
            ..ProfileQuery::default()
        };
        let state = query.to_state();
        assert_eq!(state.sort, None);
        assert_eq!(state.page, 1);
    }
}
