//! Scrape-and-normalize pipeline for the job listings site.

mod client;
mod error;
mod listing;
mod payload;

pub use client::{
    extract_server_state, keyword_slug, JobScraper, ScraperConfig, DEFAULT_LISTINGS_URL_TEMPLATE,
    KEYWORD_PLACEHOLDER,
};
pub use error::{ScrapeError, ScrapeErrorKind};
pub use listing::{parse_listing_date, parse_listings};
pub use payload::{BoundaryScanExtractor, LineIndexExtractor, PayloadExtraction, PayloadExtractor};
