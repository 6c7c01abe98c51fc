//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database.

use super::constants::*;
use super::fake_site::FakeListingsSite;
use jobfeed_server::job_store::{JobStore, SqliteJobStore};
use jobfeed_server::scrape::{JobScraper, PayloadExtraction, ScraperConfig};
use jobfeed_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Scrape target for servers that are not expected to scrape.
const UNREACHABLE_URL_TEMPLATE: &str = "http://127.0.0.1:1/id/{keyword}-jobs";

/// Test server instance with an isolated database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Job store for direct database access in tests
    pub job_store: Arc<dyn JobStore>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, scraping from nowhere
    pub async fn spawn() -> Self {
        Self::spawn_with_scrape_target(UNREACHABLE_URL_TEMPLATE, PayloadExtraction::LineIndex)
            .await
    }

    /// Spawns a new test server whose scraper fetches from `site`
    pub async fn spawn_with_site(site: &FakeListingsSite) -> Self {
        Self::spawn_with_scrape_target(&site.url_template(), PayloadExtraction::LineIndex).await
    }

    /// Spawns a new test server whose scraper fetches from `site` with the
    /// given payload extraction
    pub async fn spawn_with_site_and_extraction(
        site: &FakeListingsSite,
        payload_extraction: PayloadExtraction,
    ) -> Self {
        Self::spawn_with_scrape_target(&site.url_template(), payload_extraction).await
    }

    /// This function:
    /// 1. Creates a temporary SQLite database
    /// 2. Binds to a random port (127.0.0.1:0)
    /// 3. Spawns the server in a background task
    /// 4. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if any of the steps fails or the server doesn't become ready
    /// within timeout.
    async fn spawn_with_scrape_target(
        url_template: &str,
        payload_extraction: PayloadExtraction,
    ) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_db_dir.path().join("jobs.db");

        let job_store: Arc<dyn JobStore> =
            Arc::new(SqliteJobStore::new(&db_path).expect("Failed to open job store"));

        let scraper = Arc::new(
            JobScraper::new(&ScraperConfig {
                url_template: url_template.to_string(),
                timeout_sec: SCRAPE_TIMEOUT_SECS,
                payload_extraction,
            })
            .expect("Failed to create scraper"),
        );

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            path_prefix: JOBS_PREFIX.to_string(),
            ..Default::default()
        };

        let app = make_app(config, job_store.clone(), scraper).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            job_store,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the /health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
