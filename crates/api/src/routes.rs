use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use gh_client::GithubClient;
use once_cell::sync::Lazy;
use profile::display::{ProfileCard, ResultsView};
use profile::paginator::{is_valid_page, total_pages};
use profile::{apply, ProfileFetcher, ProfileView, SortKey, ViewSnapshot};
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec};
use serde_json::json;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::dto::{PageRequest, ProfileQuery, ProfileResponse, QueryUpdate, SearchRequest};
use crate::error::{ApiError, ApiResult};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub type SharedFetcher = Arc<ProfileFetcher<dyn GithubClient>>;

#[derive(Clone)]
pub struct ApiState {
    pub fetcher: SharedFetcher,
    pub view: Arc<Mutex<ProfileView>>,
    pub inflight: Arc<Mutex<Option<JoinHandle<()>>>>,
    pub page_size: usize,
    pub metrics_path: &'static str,
}

impl ApiState {
    pub fn new(fetcher: SharedFetcher, page_size: usize, metrics_path: &'static str) -> Self {
        Self {
            fetcher,
            view: Arc::new(Mutex::new(ProfileView::new(page_size))),
            inflight: Arc::new(Mutex::new(None)),
            page_size: page_size.max(1),
            metrics_path,
        }
    }
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    let metrics_path: &'static str = state.metrics_path;
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/search", post(start_search))
        .route("/view", get(current_view))
        .route("/view/query", put(update_query))
        .route("/view/page", put(change_page))
        .route("/users/:login", get(get_profile))
        .route(metrics_path, get(metrics))
        .with_state(state)
}

static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "api_searches_total",
        "Searches started through the view, grouped by how they were resolved",
        &["resolution"]
    )
    .expect("searches total")
});

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Starts a fetch for the view. A search still in flight is aborted; if it
/// finishes anyway its ticket is stale and the result is dropped.
#[instrument(skip(state))]
async fn start_search(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<(StatusCode, Json<ViewSnapshot>)> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(ApiError::bad_request("username must not be empty"));
    }

    let mut inflight = state.inflight.lock().await;
    if let Some(previous) = inflight.take() {
        if !previous.is_finished() {
            debug!("aborting previous search");
            SEARCHES_TOTAL.with_label_values(&["superseded"]).inc();
        }
        previous.abort();
    }

    let (ticket, sort) = {
        let mut view = state.view.lock().await;
        let ticket = view.begin_search(&username);
        (ticket, view.query().sort)
    };
    info!(username = %ticket.username(), "search started");

    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        let result = task_state.fetcher.fetch(ticket.username(), sort).await;
        let mut view = task_state.view.lock().await;
        let resolution = if view.complete(&ticket, result) {
            "applied"
        } else {
            "stale"
        };
        SEARCHES_TOTAL.with_label_values(&[resolution]).inc();
    });
    *inflight = Some(handle);
    drop(inflight);

    let snapshot = state.view.lock().await.snapshot();
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

async fn current_view(State(state): State<Arc<ApiState>>) -> Json<ViewSnapshot> {
    Json(state.view.lock().await.snapshot())
}

#[instrument(skip(state))]
async fn update_query(
    State(state): State<Arc<ApiState>>,
    Json(update): Json<QueryUpdate>,
) -> Json<ViewSnapshot> {
    let mut view = state.view.lock().await;
    if let Some(term) = update.term {
        view.set_term(term);
    }
    if let Some(sort) = update.sort.as_deref() {
        view.set_sort(SortKey::parse(sort));
    }
    if let Some(include) = update.include_forks {
        view.set_include_forks(include);
    }
    if let Some(include) = update.include_archived {
        view.set_include_archived(include);
    }
    Json(view.snapshot())
}

#[instrument(skip(state))]
async fn change_page(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PageRequest>,
) -> ApiResult<Json<ViewSnapshot>> {
    let mut view = state.view.lock().await;
    if !view.go_to_page(request.page) {
        return Err(ApiError::bad_request(format!(
            "page {} is out of range (1..={})",
            request.page,
            view.total_pages()
        )));
    }
    Ok(Json(view.snapshot()))
}

/// Stateless fetch + query + paginate for a single login.
#[instrument(skip(state, query))]
async fn get_profile(
    State(state): State<Arc<ApiState>>,
    Path(login): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<ProfileResponse>> {
    let query = query.to_state();
    let fetched = state.fetcher.fetch(&login, query.sort).await?;

    let pages = total_pages(apply(&fetched.repositories, &query).len(), state.page_size);
    if pages > 0 && !is_valid_page(query.page, pages) {
        return Err(ApiError::bad_request(format!(
            "page {} is out of range (1..={pages})",
            query.page
        )));
    }

    let profile = ProfileCard::build(&fetched.user, &fetched.repositories);
    let results = ResultsView::build(&fetched.repositories, &query, state.page_size);
    Ok(Json(ProfileResponse::new(query, profile, results)))
}

async fn metrics() -> ApiResult<impl IntoResponse> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let content_type = encoder.format_type().to_string();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok((
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, content_type)],
        buffer,
    ))
}
