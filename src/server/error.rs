//! Conversion of domain failures into HTTP responses.

use crate::job_store::ValidationError;
use crate::scrape::{ScrapeError, ScrapeErrorKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

pub const JOB_NOT_FOUND_MESSAGE: &str = "JobId not found";

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    NotFound,
    Conflict(String),
    Scrape(ScrapeError),
    Internal(anyhow::Error),
}

#[derive(Serialize)]
struct ValidationErrorBody {
    message: String,
    fields: Vec<String>,
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        ApiError::Scrape(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

fn scrape_error_response(err: ScrapeError) -> Response {
    match err.kind() {
        ScrapeErrorKind::Fetch => {
            warn!("Scrape fetch failed: {}", err);
            let status = match err {
                ScrapeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, err.to_string()).into_response()
        }
        ScrapeErrorKind::Parse => {
            warn!("Scraped page could not be parsed: {}", err);
            (
                StatusCode::BAD_GATEWAY,
                format!("Listings page layout is incompatible: {}", err),
            )
                .into_response()
        }
        ScrapeErrorKind::Store => {
            error!("{}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => {
                let body = ValidationErrorBody {
                    message: err.to_string(),
                    fields: err.fields(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, JOB_NOT_FOUND_MESSAGE).into_response(),
            ApiError::Conflict(id) => (
                StatusCode::CONFLICT,
                format!("Job with id {} already exists", id),
            )
                .into_response(),
            ApiError::Scrape(err) => scrape_error_response(err),
            ApiError::Internal(err) => {
                error!("Request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
