use anyhow::{Context, Result};
use std::{future::IntoFuture, path::PathBuf, sync::Arc, time::Duration};

use tower_http::services::ServeDir;
use tracing::{debug, info};

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::metrics::{metrics_handler, record_report};
use super::{http_cache, log_requests, state::*, RequestsLoggingLevel, ServerConfig};
use crate::dataset::{Dataset, LoadStats};
use crate::filter::{FilterEngine, FilterOptions, Selection, SelectionRequest};
use crate::report::DashboardView;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub source: String,
    pub records: usize,
    pub load_stats: LoadStats,
}

#[derive(Serialize)]
struct FiltersResponse {
    pub options: FilterOptions,
    pub selection: Selection,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        source: state.source_path.display().to_string(),
        records: state.dataset.len(),
        load_stats: state.dataset.stats().clone(),
    };
    Json(stats)
}

fn resolve_filters(dataset: &Dataset, request: &SelectionRequest) -> FiltersResponse {
    let (options, selection) = FilterEngine::new(dataset).resolve(request);
    FiltersResponse { options, selection }
}

async fn get_filters(State(dataset): State<GuardedDataset>) -> impl IntoResponse {
    Json(resolve_filters(&dataset, &SelectionRequest::default()))
}

async fn post_filters(
    State(dataset): State<GuardedDataset>,
    Json(request): Json<SelectionRequest>,
) -> impl IntoResponse {
    debug!("post_filters() called with {:?}", request);
    Json(resolve_filters(&dataset, &request))
}

fn compute_view(dataset: &Dataset, request: &SelectionRequest) -> DashboardView {
    let view = DashboardView::compute(dataset, request);
    record_report(&view.report);
    view
}

async fn get_report(State(dataset): State<GuardedDataset>) -> impl IntoResponse {
    Json(compute_view(&dataset, &SelectionRequest::default()))
}

async fn post_report(
    State(dataset): State<GuardedDataset>,
    Json(request): Json<SelectionRequest>,
) -> impl IntoResponse {
    debug!("post_report() called with {:?}", request);
    Json(compute_view(&dataset, &request))
}

pub fn make_app(config: ServerConfig, state: ServerState) -> Router {
    let dashboard_routes: Router = Router::new()
        .route("/filters", get(get_filters).post(post_filters))
        .route("/report", get(get_report).post(post_report))
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ))
        .route("/stats", get(home))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new().route("/", get(home)).with_state(state.clone()),
    };

    home_router
        .nest("/v1", dashboard_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(
    dataset: Dataset,
    source_path: PathBuf,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    metrics_port: u16,
    content_cache_age_sec: usize,
    frontend_dir_path: Option<String>,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
        content_cache_age_sec,
        frontend_dir_path,
    };
    let state = ServerState::new(config.clone(), Arc::new(dataset), source_path);
    let app = make_app(config, state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Listening on {}", listener.local_addr()?);

    tokio::try_join!(
        axum::serve(listener, app).into_future(),
        axum::serve(metrics_listener, make_metrics_app()).into_future(),
    )?;
    Ok(())
}
