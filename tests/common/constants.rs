//! Shared constants for end-to-end tests
//!
//! When the listings fixture changes, update only this file.

// ============================================================================
// Server Lifecycle
// ============================================================================

/// Maximum time to wait for a spawned server to answer
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Delay between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Timeout of every request made by the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Scrape timeout configured on test servers
pub const SCRAPE_TIMEOUT_SECS: u64 = 5;

/// Path prefix the job routes are mounted under
pub const JOBS_PREFIX: &str = "/jobs";

// ============================================================================
// Listings Fixture
// ============================================================================

/// Number of listings in `fixtures/listings_page.html`
pub const FIXTURE_LISTINGS_COUNT: usize = 3;

/// First listing of the fixture, with every field present
pub const FIXTURE_JOB_1_ID: &str = "78000001";
pub const FIXTURE_JOB_1_TITLE: &str = "Senior Rust Developer";

/// Second listing, whose id is published as a number
pub const FIXTURE_JOB_2_ID: &str = "78000002";

/// Third listing, with only the required fields
pub const FIXTURE_JOB_3_ID: &str = "78000003";

/// Keyword used to scrape the fixture in tests
pub const SCRAPE_KEYWORD: &str = "Rust Developer";

/// Slug the fake site expects for `SCRAPE_KEYWORD`
pub const SCRAPE_KEYWORD_SLUG: &str = "rust-developer";
