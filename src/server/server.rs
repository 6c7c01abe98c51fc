use anyhow::Result;
use chrono::Utc;
use std::{sync::Arc, time::Duration, time::Instant};

use tracing::{debug, info};

use crate::export::{export_filename, render_jobs_xlsx, XLSX_CONTENT_TYPE};
use crate::job_store::{JobInput, JobStore, Pagination, ValidationError};
use crate::scrape::JobScraper;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use super::error::ApiError;
use super::{log_requests, state::*, ServerConfig};

pub const CREATED_MESSAGE: &str = "Successfully created job data!";
pub const UPDATED_MESSAGE: &str = "Successfully updated job data!";
pub const DELETED_MESSAGE: &str = "Successfully deleted job data!";

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
    pub jobs_count: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug, Default)]
struct ListJobsQuery {
    keyword: Option<String>,
    page: Option<String>,
    size: Option<String>,
}

fn parse_positive(name: &'static str, value: Option<&str>, default: usize) -> ApiResult<usize> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(value) => value,
    };
    match value.parse::<usize>() {
        Ok(parsed) if parsed >= 1 => Ok(parsed),
        _ => Err(ValidationError::Malformed(format!(
            "Parameter {} must be a positive integer, got {:?}",
            name, value
        ))
        .into()),
    }
}

impl ListJobsQuery {
    fn pagination(&self, config: &ServerConfig) -> ApiResult<Pagination> {
        let page = parse_positive("page", self.page.as_deref(), 1)?;
        let size = parse_positive("size", self.size.as_deref(), config.default_page_size)?;
        let pagination = Pagination {
            page,
            size: size.min(config.max_page_size),
        };
        if pagination.offset().is_none() {
            return Err(ValidationError::Malformed(format!(
                "Parameter page is too large, got {}",
                page
            ))
            .into());
        }
        Ok(pagination)
    }

    fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|keyword| !keyword.is_empty())
    }
}

fn json_body(body: std::result::Result<Json<JobInput>, JsonRejection>) -> ApiResult<JobInput> {
    body.map(|Json(input)| input)
        .map_err(|rejection| ValidationError::Malformed(rejection.body_text()).into())
}

async fn health(State(state): State<ServerState>) -> ApiResult<Json<ServerStats>> {
    Ok(Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        jobs_count: state.job_store.get_jobs_count()?,
    }))
}

async fn list_jobs(
    State(config): State<ServerConfig>,
    State(job_store): State<GuardedJobStore>,
    query: std::result::Result<Query<ListJobsQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) =
        query.map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;
    let pagination = query.pagination(&config)?;
    let page = job_store.list_jobs(query.keyword(), pagination)?;
    Ok(Json(page).into_response())
}

async fn create_job(
    State(job_store): State<GuardedJobStore>,
    body: std::result::Result<Json<JobInput>, JsonRejection>,
) -> ApiResult<Response> {
    let input = json_body(body)?;
    let id = input
        .job_id()?
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let fields = input.into_fields()?;

    match job_store.create_job(&id, fields)? {
        Some(job) => {
            debug!("Created job {}", job.id);
            Ok((StatusCode::CREATED, Json(CREATED_MESSAGE)).into_response())
        }
        None => Err(ApiError::Conflict(id)),
    }
}

async fn get_job(
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    match job_store.get_job(&id)? {
        Some(job) => Ok(Json(job).into_response()),
        None => Err(ApiError::NotFound),
    }
}

async fn put_job(
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<String>,
    body: std::result::Result<Json<JobInput>, JsonRejection>,
) -> ApiResult<Response> {
    let fields = json_body(body)?.into_fields()?;
    match job_store.update_job(&id, fields.into())? {
        Some(_) => Ok(Json(UPDATED_MESSAGE).into_response()),
        None => Err(ApiError::NotFound),
    }
}

async fn patch_job(
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<String>,
    body: std::result::Result<Json<JobInput>, JsonRejection>,
) -> ApiResult<Response> {
    let patch = json_body(body)?.into_patch()?;
    match job_store.update_job(&id, patch)? {
        Some(_) => Ok(Json(UPDATED_MESSAGE).into_response()),
        None => Err(ApiError::NotFound),
    }
}

async fn delete_job(
    State(job_store): State<GuardedJobStore>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    if job_store.delete_job(&id)? {
        // 204 carries no body, the message only reaches the logs.
        debug!("Deleted job {}: {}", id, DELETED_MESSAGE);
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(ApiError::NotFound)
    }
}

async fn scrape_jobs(
    State(scraper): State<GuardedJobScraper>,
    State(job_store): State<GuardedJobStore>,
    Path(keyword): Path<String>,
) -> ApiResult<Response> {
    let inserted = scraper.scrape_into(job_store.as_ref(), &keyword).await?;
    Ok(Json(format!(
        "Successfully scraped {} jobs data with {} keyword!",
        inserted, keyword
    ))
    .into_response())
}

async fn export_jobs(State(job_store): State<GuardedJobStore>) -> ApiResult<Response> {
    let jobs = job_store.get_all_jobs()?;
    let bytes = render_jobs_xlsx(&jobs)
        .map_err(|err| anyhow::anyhow!("Failed to render workbook: {}", err))?;
    let filename = export_filename(Utc::now());
    info!("Exported {} jobs to {}", jobs.len(), filename);

    let disposition = HeaderValue::from_str(&format!("attachment; filename={}", filename))
        .map_err(|err| anyhow::anyhow!("Invalid export filename {:?}: {}", filename, err))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                HeaderValue::from_static("Content-Disposition"),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn get_keywords(State(job_store): State<GuardedJobStore>) -> ApiResult<Response> {
    Ok(Json(job_store.get_keywords()?).into_response())
}

/// Registers `method_router` at `prefix + path`, with and without a trailing slash.
fn route_both_slashes(
    router: Router<ServerState>,
    prefix: &str,
    path: &str,
    method_router: MethodRouter<ServerState>,
) -> Router<ServerState> {
    let full_path = format!("{}{}", prefix, path);
    if full_path.is_empty() {
        return router.route("/", method_router);
    }
    router
        .route(&format!("{}/", full_path), method_router.clone())
        .route(&full_path, method_router)
}

fn make_job_routes(prefix: &str) -> Router<ServerState> {
    let routes: Vec<(&str, MethodRouter<ServerState>)> = vec![
        ("", get(list_jobs).post(create_job)),
        ("/scrape/{keyword}", get(scrape_jobs)),
        ("/excel", get(export_jobs)),
        ("/keywords", get(get_keywords)),
        (
            "/{id}",
            get(get_job)
                .put(put_job)
                .patch(patch_job)
                .delete(delete_job),
        ),
    ];

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            route_both_slashes(router, prefix, path, method_router)
        })
}

pub fn make_app(
    config: ServerConfig,
    job_store: Arc<dyn JobStore>,
    scraper: Arc<JobScraper>,
) -> Result<Router> {
    let state = ServerState {
        config: config.clone(),
        start_time: Instant::now(),
        job_store,
        scraper,
    };

    let app: Router = make_job_routes(&config.path_prefix)
        .route("/health", get(health))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .layer(CorsLayer::permissive().expose_headers([header::CONTENT_DISPOSITION]))
        .with_state(state);

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    job_store: Arc<dyn JobStore>,
    scraper: Arc<JobScraper>,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, job_store, scraper)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}
