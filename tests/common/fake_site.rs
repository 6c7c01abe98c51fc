//! Stand-in for the job site the scraper fetches from
//!
//! Serves a fixed page for every listings path and counts the requests it
//! receives, so tests can point a server's scraper at it.

use super::fixtures::{LISTINGS_PAGE_HTML, MAINTENANCE_PAGE_HTML};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// What the fake site answers to listings requests.
#[derive(Clone, Debug)]
pub enum SiteResponse {
    /// 200 with the given page
    Page(String),
    /// 404 with an empty body
    NotFound,
}

#[derive(Clone)]
struct SiteState {
    response: Arc<Mutex<SiteResponse>>,
    requested_paths: Arc<Mutex<Vec<String>>>,
    hits: Arc<AtomicUsize>,
}

async fn serve_listings(State(state): State<SiteState>, Path(page): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requested_paths.lock().unwrap().push(page);

    let response = state.response.lock().unwrap().clone();
    match response {
        SiteResponse::Page(html) => Html(html).into_response(),
        SiteResponse::NotFound => StatusCode::NOT_FOUND.into_response(),
    }
}

pub struct FakeListingsSite {
    /// Base URL, e.g. "http://127.0.0.1:12345"
    pub base_url: String,

    state: SiteState,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeListingsSite {
    /// Serves the listings fixture
    pub async fn spawn() -> Self {
        Self::spawn_with(SiteResponse::Page(LISTINGS_PAGE_HTML.to_string())).await
    }

    /// Serves a page without server state, as after a site redesign
    pub async fn spawn_maintenance() -> Self {
        Self::spawn_with(SiteResponse::Page(MAINTENANCE_PAGE_HTML.to_string())).await
    }

    pub async fn spawn_with(response: SiteResponse) -> Self {
        let state = SiteState {
            response: Arc::new(Mutex::new(response)),
            requested_paths: Arc::new(Mutex::new(Vec::new())),
            hits: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/id/{page}", get(serve_listings))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake site");
        let port = listener
            .local_addr()
            .expect("Failed to get fake site address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake site failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// URL template to configure a scraper with
    pub fn url_template(&self) -> String {
        format!("{}/id/{{keyword}}-jobs", self.base_url)
    }

    /// Changes what subsequent requests receive
    pub fn set_response(&self, response: SiteResponse) {
        *self.state.response.lock().unwrap() = response;
    }

    /// Number of listings requests served so far
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Last path segment of every request, e.g. "rust-developer-jobs"
    pub fn requested_pages(&self) -> Vec<String> {
        self.state.requested_paths.lock().unwrap().clone()
    }
}

impl Drop for FakeListingsSite {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
