use thiserror::Error;

/// Errors that abort a scrape. A scrape either stores every listing of the
/// page or none of them.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("{url} responded with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("No server-state element found, the listings page layout may have changed")]
    MissingServerState,

    #[error("Embedded payload not found: {0}")]
    MissingPayload(String),

    #[error("Embedded payload is not valid listings JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Unrecognized listing date {0:?}")]
    InvalidListingDate(String),

    #[error("Failed to store scraped jobs: {0:#}")]
    Store(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeErrorKind {
    /// The listings site could not be reached or answered with an error.
    Fetch,
    /// The listings page did not have the expected shape.
    Parse,
    /// The local store failed.
    Store,
}

impl ScrapeError {
    pub fn kind(&self) -> ScrapeErrorKind {
        match self {
            ScrapeError::Fetch { .. } | ScrapeError::Timeout { .. } | ScrapeError::Status { .. } => {
                ScrapeErrorKind::Fetch
            }
            ScrapeError::MissingServerState
            | ScrapeError::MissingPayload(_)
            | ScrapeError::InvalidPayload(_)
            | ScrapeError::InvalidListingDate(_) => ScrapeErrorKind::Parse,
            ScrapeError::Store(_) => ScrapeErrorKind::Store,
        }
    }
}
