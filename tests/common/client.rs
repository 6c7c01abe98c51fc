//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all jobfeed-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn jobs_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, JOBS_PREFIX, path)
    }

    // ========================================================================
    // Job CRUD
    // ========================================================================

    /// GET /jobs with raw query parameters
    pub async fn list_jobs(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.jobs_url(""))
            .query(query)
            .send()
            .await
            .expect("List jobs request failed")
    }

    /// POST /jobs
    pub async fn create_job(&self, body: &Value) -> Response {
        self.client
            .post(self.jobs_url("/"))
            .json(body)
            .send()
            .await
            .expect("Create job request failed")
    }

    /// POST /jobs with a raw, possibly malformed, body
    pub async fn create_job_raw(&self, body: &str) -> Response {
        self.client
            .post(self.jobs_url("/"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Create job request failed")
    }

    /// GET /jobs/{id}
    pub async fn get_job(&self, id: &str) -> Response {
        self.client
            .get(self.jobs_url(&format!("/{}", id)))
            .send()
            .await
            .expect("Get job request failed")
    }

    /// PUT /jobs/{id}
    pub async fn put_job(&self, id: &str, body: &Value) -> Response {
        self.client
            .put(self.jobs_url(&format!("/{}/", id)))
            .json(body)
            .send()
            .await
            .expect("Put job request failed")
    }

    /// PATCH /jobs/{id}
    pub async fn patch_job(&self, id: &str, body: &Value) -> Response {
        self.client
            .patch(self.jobs_url(&format!("/{}", id)))
            .json(body)
            .send()
            .await
            .expect("Patch job request failed")
    }

    /// DELETE /jobs/{id}
    pub async fn delete_job(&self, id: &str) -> Response {
        self.client
            .delete(self.jobs_url(&format!("/{}", id)))
            .send()
            .await
            .expect("Delete job request failed")
    }

    /// GET /jobs/keywords
    pub async fn get_keywords(&self) -> Response {
        self.client
            .get(self.jobs_url("/keywords"))
            .send()
            .await
            .expect("Get keywords request failed")
    }

    // ========================================================================
    // Scrape & Export
    // ========================================================================

    /// GET /jobs/scrape/{keyword}
    pub async fn scrape(&self, keyword: &str) -> Response {
        self.client
            .get(self.jobs_url(&format!("/scrape/{}", urlencoding::encode(keyword))))
            .send()
            .await
            .expect("Scrape request failed")
    }

    /// GET /jobs/excel
    pub async fn export_excel(&self) -> Response {
        self.client
            .get(self.jobs_url("/excel"))
            .send()
            .await
            .expect("Export request failed")
    }

    // ========================================================================
    // Server
    // ========================================================================

    /// GET /health
    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }
}
