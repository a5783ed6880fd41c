use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Updated,
    Created,
    Pushed,
    FullName,
    Stars,
    Forks,
    Size,
    Watchers,
}

impl SortKey {
    /// Selector order.
    pub const ALL: [SortKey; 8] = [
        SortKey::Updated,
        SortKey::Created,
        SortKey::Pushed,
        SortKey::FullName,
        SortKey::Stars,
        SortKey::Forks,
        SortKey::Size,
        SortKey::Watchers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Updated => "updated",
            SortKey::Created => "created",
            SortKey::Pushed => "pushed",
            SortKey::FullName => "full_name",
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
            SortKey::Size => "size",
            SortKey::Watchers => "watchers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Updated => "Recently updated",
            SortKey::Created => "Recently created",
            SortKey::Pushed => "Recently pushed",
            SortKey::FullName => "Name",
            SortKey::Stars => "Most stars",
            SortKey::Forks => "Most forks",
            SortKey::Size => "Largest size",
            SortKey::Watchers => "Most watchers",
        }
    }

    /// `None` for anything outside the fixed set; callers treat that as "keep order".
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(input))
    }

    /// GitHub's listing only sorts by these four; anything else asks for `updated`.
    pub fn upstream_param(key: Option<SortKey>) -> &'static str {
        match key {
            Some(
                key @ (SortKey::Updated | SortKey::Created | SortKey::Pushed | SortKey::FullName),
            ) => key.as_str(),
            _ => SortKey::Updated.as_str(),
        }
    }

    /// Names go through `collator`; without one they fall back to a
    /// case-insensitive code point order.
    fn compare(&self, a: &Repository, b: &Repository, collator: Option<&Collator>) -> Ordering {
        match self {
            SortKey::Stars => b.stars.cmp(&a.stars),
            SortKey::Forks => b.forks.cmp(&a.forks),
            SortKey::Size => b.size.cmp(&a.size),
            SortKey::Watchers => b.watchers.cmp(&a.watchers),
            SortKey::Updated => b.updated_at.cmp(&a.updated_at),
            SortKey::Created => b.created_at.cmp(&a.created_at),
            // never-pushed repositories sink to the end
            SortKey::Pushed => b.pushed_at.cmp(&a.pushed_at),
            SortKey::FullName => match collator {
                Some(collator) => collator.compare(&a.name, &b.name),
                None => a
                    .name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name)),
            },
        }
    }
}

/// Transient UI query. Every setter sends the view back to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub term: String,
    pub sort: Option<SortKey>,
    pub include_forks: bool,
    pub include_archived: bool,
    pub page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            term: String::new(),
            sort: Some(SortKey::Updated),
            include_forks: true,
            include_archived: true,
            page: 1,
        }
    }
}

impl QueryState {
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: Option<SortKey>) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_include_forks(&mut self, include: bool) {
        self.include_forks = include;
        self.page = 1;
    }

    pub fn set_include_archived(&mut self, include: bool) {
        self.include_archived = include;
        self.page = 1;
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    pub fn matches(&self, repo: &Repository) -> bool {
        if !self.include_forks && repo.is_fork {
            return false;
        }
        if !self.include_archived && repo.is_archived {
            return false;
        }
        let needle = self.term.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        repo.name.to_lowercase().contains(&needle)
            || repo
                .description
                .as_deref()
                .is_some_and(|desc| desc.to_lowercase().contains(&needle))
    }
}

/// Root-locale collation at tertiary strength: accents and case only break
/// ties between otherwise equal names.
fn name_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            warn!(error = %err, "name collator unavailable");
            None
        }
    }
}

/// Filters then sorts `repos`. Pure: identical inputs give an identical order.
pub fn apply<'a>(repos: &'a [Repository], query: &QueryState) -> Vec<&'a Repository> {
    let mut view: Vec<&Repository> = repos.iter().filter(|repo| query.matches(repo)).collect();
    if let Some(key) = query.sort {
        let collator = match key {
            SortKey::FullName => name_collator(),
            _ => None,
        };
        view.sort_by(|a, b| key.compare(a, b, collator.as_ref()));
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn repo(id: i64, name: &str) -> Repository {
        let ts = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        Repository {
            id,
            name: name.to_string(),
            description: None,
            language: None,
            stars: 0,
            forks: 0,
            open_issues: 0,
            watchers: 0,
            size: 0,
            created_at: ts,
            updated_at: ts,
            pushed_at: Some(ts),
            html_url: format!("https://github.com/octocat/{name}"),
            is_fork: false,
            is_archived: false,
        }
    }

    fn names(view: &[&Repository]) -> Vec<String> {
        view.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn parse_accepts_wire_names_only() {
        assert_eq!(SortKey::parse("full_name"), Some(SortKey::FullName));
        assert_eq!(SortKey::parse("Stars"), Some(SortKey::Stars));
        assert_eq!(SortKey::parse("name"), None);
        assert_eq!(SortKey::parse(""), None);
    }

    #[test]
    fn upstream_param_falls_back_to_updated() {
        assert_eq!(SortKey::upstream_param(Some(SortKey::Pushed)), "pushed");
        assert_eq!(SortKey::upstream_param(Some(SortKey::FullName)), "full_name");
        assert_eq!(SortKey::upstream_param(Some(SortKey::Stars)), "updated");
        assert_eq!(SortKey::upstream_param(None), "updated");
    }

    #[test]
    fn term_matches_name_or_description_case_insensitively() {
        let mut a = repo(1, "Spoon-Knife");
        a.description = Some("This repo is for demonstration purposes only.".into());
        let b = repo(2, "linguist");
        let repos = vec![a, b];

        let mut query = QueryState::default();
        query.set_term("DEMONSTRATION");
        assert_eq!(names(&apply(&repos, &query)), vec!["Spoon-Knife"]);

        query.set_term("LING");
        assert_eq!(names(&apply(&repos, &query)), vec!["linguist"]);
    }

    #[test]
    fn missing_description_matches_on_name_only() {
        let repos = vec![repo(1, "octocat.github.io")];
        let mut query = QueryState::default();
        query.set_term("pages");
        assert!(apply(&repos, &query).is_empty());
    }

    #[test]
    fn fork_toggle_removes_exactly_the_forks() {
        let mut forked = repo(1, "forked");
        forked.is_fork = true;
        let mut archived = repo(2, "archived");
        archived.is_archived = true;
        let plain = repo(3, "plain");
        let repos = vec![forked, archived, plain];

        let mut query = QueryState {
            sort: None,
            ..QueryState::default()
        };
        assert_eq!(apply(&repos, &query).len(), 3);

        query.set_include_forks(false);
        assert_eq!(names(&apply(&repos, &query)), vec!["archived", "plain"]);

        query.set_include_forks(true);
        query.set_include_archived(false);
        assert_eq!(names(&apply(&repos, &query)), vec!["forked", "plain"]);
    }

    #[test]
    fn numeric_keys_sort_descending() {
        let mut repos = Vec::new();
        for (id, stars) in [(1, 5u64), (2, 50), (3, 0), (4, 50), (5, 12)] {
            let mut r = repo(id, &format!("r{id}"));
            r.stars = stars;
            r.forks = 100 - stars;
            repos.push(r);
        }
        let mut query = QueryState::default();
        query.set_sort(Some(SortKey::Stars));
        let view = apply(&repos, &query);
        assert!(view.windows(2).all(|pair| pair[0].stars >= pair[1].stars));
        // stable: equal stars keep fetch order
        assert_eq!(names(&view[..2]), vec!["r2", "r4"]);

        query.set_sort(Some(SortKey::Forks));
        let view = apply(&repos, &query);
        assert!(view.windows(2).all(|pair| pair[0].forks >= pair[1].forks));
    }

    #[test]
    fn size_and_watchers_sort_descending() {
        let mut repos = Vec::new();
        for (id, size, watchers) in [(1, 300u64, 2u64), (2, 10, 40), (3, 5000, 7)] {
            let mut r = repo(id, &format!("r{id}"));
            r.size = size;
            r.watchers = watchers;
            repos.push(r);
        }
        let mut query = QueryState::default();
        query.set_sort(Some(SortKey::Size));
        assert_eq!(names(&apply(&repos, &query)), vec!["r3", "r1", "r2"]);

        query.set_sort(Some(SortKey::Watchers));
        assert_eq!(names(&apply(&repos, &query)), vec!["r2", "r3", "r1"]);
    }

    #[test]
    fn timestamp_keys_sort_newest_first() {
        let mut old = repo(1, "old");
        old.updated_at = Utc.with_ymd_and_hms(2015, 3, 1, 0, 0, 0).unwrap();
        let mut new = repo(2, "new");
        new.updated_at = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
        let mut never_pushed = repo(3, "never-pushed");
        never_pushed.pushed_at = None;
        let repos = vec![never_pushed, old, new];

        let query = QueryState::default();
        assert_eq!(names(&apply(&repos, &query))[0], "new");

        let mut query = QueryState::default();
        query.set_sort(Some(SortKey::Pushed));
        assert_eq!(names(&apply(&repos, &query))[2], "never-pushed");
    }

    #[test]
    fn created_sorts_newest_first() {
        let mut first = repo(1, "first");
        first.created_at = Utc.with_ymd_and_hms(2009, 6, 1, 0, 0, 0).unwrap();
        let mut latest = repo(2, "latest");
        latest.created_at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut middle = repo(3, "middle");
        middle.created_at = Utc.with_ymd_and_hms(2016, 6, 1, 0, 0, 0).unwrap();
        let repos = vec![first, latest, middle];

        let mut query = QueryState::default();
        query.set_sort(Some(SortKey::Created));
        assert_eq!(
            names(&apply(&repos, &query)),
            vec!["latest", "middle", "first"]
        );
    }

    #[test]
    fn name_sort_ignores_case() {
        let repos = vec![repo(1, "zeta"), repo(2, "Alpha"), repo(3, "beta")];
        let mut query = QueryState::default();
        query.set_sort(Some(SortKey::FullName));
        assert_eq!(names(&apply(&repos, &query)), vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn name_sort_places_accented_letters_with_their_base_letter() {
        let repos = vec![
            repo(1, "zeta"),
            repo(2, "éclair"),
            repo(3, "Ärger"),
            repo(4, "beta"),
        ];
        let mut query = QueryState::default();
        query.set_sort(Some(SortKey::FullName));
        assert_eq!(
            names(&apply(&repos, &query)),
            vec!["Ärger", "beta", "éclair", "zeta"]
        );
    }

    #[test]
    fn name_sort_orders_underscore_before_hyphen() {
        let repos = vec![repo(1, "dot-files"), repo(2, "dot_files")];
        let mut query = QueryState::default();
        query.set_sort(Some(SortKey::FullName));
        assert_eq!(
            names(&apply(&repos, &query)),
            vec!["dot_files", "dot-files"]
        );
    }

    #[test]
    fn unrecognised_key_preserves_filtered_order() {
        let repos = vec![repo(3, "c"), repo(1, "a"), repo(2, "b")];
        let mut query = QueryState::default();
        query.set_sort(SortKey::parse("popularity"));
        assert_eq!(names(&apply(&repos, &query)), vec!["c", "a", "b"]);
    }

    #[test]
    fn apply_is_deterministic() {
        let mut repos = Vec::new();
        for id in 0..40 {
            let mut r = repo(id, &format!("repo-{}", id % 7));
            r.stars = (id as u64 * 37) % 11;
            r.is_fork = id % 3 == 0;
            repos.push(r);
        }
        let mut query = QueryState::default();
        query.set_sort(Some(SortKey::Stars));
        query.set_include_forks(false);
        query.set_term("repo-1");
        let first: Vec<i64> = apply(&repos, &query).iter().map(|r| r.id).collect();
        let second: Vec<i64> = apply(&repos, &query).iter().map(|r| r.id).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|id| id % 3 != 0));
    }

    #[test]
    fn mutations_reset_page() {
        let mut query = QueryState {
            page: 4,
            ..QueryState::default()
        };
        query.set_sort(Some(SortKey::Size));
        assert_eq!(query.page, 1);
        query.page = 3;
        query.set_term("x");
        assert_eq!(query.page, 1);
        query.page = 2;
        query.set_include_archived(false);
        assert_eq!(query.page, 1);
    }
}
