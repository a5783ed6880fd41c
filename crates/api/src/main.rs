use std::sync::Arc;

use anyhow::Result;
use api::{build_router, ApiState};
use axum::Router;
use common::{config::AppConfig, logging};
use gh_client::{GithubClient, ReqwestExecutor, RestGithubClient};
use profile::{FetchLimits, ProfileFetcher};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init_logging(&config.observability.log_level);

    let exec = Arc::new(ReqwestExecutor::new(&config.github.user_agent)?);
    let client: Arc<dyn GithubClient> = Arc::new(RestGithubClient::new(
        exec,
        &config.github.base_url,
        config.github.user_agent.clone(),
    )?);
    let limits = FetchLimits::from(&config.fetch);
    let fetcher = Arc::new(ProfileFetcher::new(client, limits));

    let metrics_path: &'static str =
        Box::leak(config.observability.metrics_path.clone().into_boxed_str());
    let state = Arc::new(ApiState::new(fetcher, config.view.page_size, metrics_path));
    let app: Router = build_router(state);

    let addr: std::net::SocketAddr = config.api.bind.parse()?;
    info!(
        %addr,
        per_page = limits.per_page,
        max_pages = limits.max_pages,
        "api listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
