//! Jobfeed Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod export;
pub mod job_store;
pub mod scrape;
pub mod server;

// Re-export commonly used types for convenience
pub use job_store::{JobStore, SqliteJobStore};
pub use scrape::{JobScraper, ScraperConfig};
pub use server::{run_server, RequestsLoggingLevel};
