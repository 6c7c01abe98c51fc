//! HTTP side of the scrape pipeline: fetch the listings page for a keyword,
//! pull the embedded payload out of it and hand the listings to the store.

use super::error::ScrapeError;
use super::listing::parse_listings;
use super::payload::{PayloadExtraction, PayloadExtractor};
use crate::job_store::{JobStore, NewJob};
use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_LISTINGS_URL_TEMPLATE: &str = "https://id.jobstreet.com/id/{keyword}-jobs";
pub const KEYWORD_PLACEHOLDER: &str = "{keyword}";

const SERVER_STATE_SELECTOR: &str = r#"[data-automation="server-state"]"#;

const USER_AGENT: &str = concat!("jobfeed-server/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Listings page URL, `{keyword}` is replaced by the keyword slug.
    pub url_template: String,
    pub timeout_sec: u64,
    pub payload_extraction: PayloadExtraction,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            url_template: DEFAULT_LISTINGS_URL_TEMPLATE.to_string(),
            timeout_sec: 30,
            payload_extraction: PayloadExtraction::default(),
        }
    }
}

/// Lower-cases the keyword and turns spaces into hyphens, the way the site
/// builds its listing paths.
pub fn keyword_slug(keyword: &str) -> String {
    keyword.to_lowercase().replace(' ', "-")
}

/// Returns the text of the element carrying the server-rendered state.
pub fn extract_server_state(html: &str) -> Result<String, ScrapeError> {
    let selector = Selector::parse(SERVER_STATE_SELECTOR).map_err(|err| {
        ScrapeError::MissingPayload(format!("invalid server-state selector: {:?}", err))
    })?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or(ScrapeError::MissingServerState)
}

/// Scrapes listings pages from the job site.
pub struct JobScraper {
    client: reqwest::Client,
    url_template: String,
    extractor: Box<dyn PayloadExtractor>,
}

impl JobScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url_template: config.url_template.clone(),
            extractor: config.payload_extraction.extractor(),
        })
    }

    /// URL of the listings page for `keyword`.
    pub fn listing_url(&self, keyword: &str) -> String {
        let slug = keyword_slug(keyword);
        self.url_template
            .replace(KEYWORD_PLACEHOLDER, &urlencoding::encode(&slug))
    }

    async fn fetch_listings_page(&self, url: &str) -> Result<String, ScrapeError> {
        let to_fetch_error = |source: reqwest::Error| {
            if source.is_timeout() {
                ScrapeError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ScrapeError::Fetch {
                    url: url.to_string(),
                    source,
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(to_fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(to_fetch_error)
    }

    /// Parses a listings page into jobs tagged with `keyword`.
    pub fn parse_listings_page(&self, html: &str, keyword: &str) -> Result<Vec<NewJob>, ScrapeError> {
        let server_state = extract_server_state(html)?;
        let payload = self.extractor.extract(&server_state)?;
        parse_listings(payload, keyword)
    }

    /// Fetches and parses the listings page for `keyword`.
    pub async fn fetch_jobs(&self, keyword: &str) -> Result<Vec<NewJob>, ScrapeError> {
        let url = self.listing_url(keyword);
        debug!("Fetching listings for {:?} from {}", keyword, url);

        let html = self.fetch_listings_page(&url).await?;
        let jobs = self.parse_listings_page(&html, keyword)?;
        debug!("Found {} listings for {:?}", jobs.len(), keyword);

        Ok(jobs)
    }

    /// Runs the whole pipeline and returns how many jobs were new.
    ///
    /// Listings whose id is already stored are skipped, never updated.
    pub async fn scrape_into(&self, store: &dyn JobStore, keyword: &str) -> Result<usize, ScrapeError> {
        let jobs = self.fetch_jobs(keyword).await?;
        let inserted = store
            .insert_jobs_ignoring_duplicates(&jobs)
            .map_err(ScrapeError::Store)?;

        info!(
            "Scraped {} listings for {:?}, {} new",
            jobs.len(),
            keyword,
            inserted
        );
        Ok(inserted)
    }
}
