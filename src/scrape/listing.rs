//! Listings as published by the job site, and their mapping to [`NewJob`].

use super::error::ScrapeError;
use crate::job_store::{JobFields, NewJob, TEASER_MAX_CHARS};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// `results.results.jobs` of the embedded payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ListingsEnvelope {
    results: ListingsResults,
}

#[derive(Debug, Deserialize)]
struct ListingsResults {
    results: ListingsPage,
}

#[derive(Debug, Deserialize)]
struct ListingsPage {
    jobs: Vec<Listing>,
}

/// The site sends ids as strings but older payloads used numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingId {
    Text(String),
    Number(serde_json::Number),
}

impl ListingId {
    fn into_string(self) -> String {
        match self {
            ListingId::Text(id) => id,
            ListingId::Number(id) => id.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Listing {
    id: ListingId,
    title: String,
    teaser: Option<String>,
    company_name: Option<String>,
    location: Option<String>,
    work_type: Option<String>,
    role_id: Option<String>,
    salary: Option<String>,
    listing_date: String,
    bullet_points: Vec<String>,
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

impl Listing {
    fn into_new_job(self, keyword: &str) -> Result<NewJob, ScrapeError> {
        let listing_date = parse_listing_date(&self.listing_date)?;
        Ok(NewJob {
            id: self.id.into_string(),
            listing_date,
            fields: JobFields {
                title: self.title,
                teaser: truncate_chars(self.teaser.unwrap_or_default(), TEASER_MAX_CHARS),
                company_name: self.company_name.unwrap_or_default(),
                location: self.location.unwrap_or_default(),
                work_type: self.work_type.unwrap_or_default(),
                role: self.role_id.unwrap_or_default(),
                salary: self.salary.unwrap_or_default(),
                keyword: keyword.to_string(),
                bullet_points: self.bullet_points,
            },
        })
    }
}

/// Parses the free-form listing date used by the site.
///
/// Accepts RFC 3339 timestamps, naive date-times (taken as UTC) and bare dates
/// (taken as midnight UTC).
pub fn parse_listing_date(text: &str) -> Result<DateTime<Utc>, ScrapeError> {
    let text = text.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Ok(date.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
    ] {
        if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(date.and_utc());
        }
    }
    if let Some(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(date.and_utc());
    }

    Err(ScrapeError::InvalidListingDate(text.to_string()))
}

/// Parses the embedded payload and maps every listing, tagging each with the
/// keyword it was scraped for. Fails as a whole if any listing is invalid.
pub fn parse_listings(payload: &str, keyword: &str) -> Result<Vec<NewJob>, ScrapeError> {
    let envelope: ListingsEnvelope = serde_json::from_str(payload)?;
    envelope
        .results
        .results
        .jobs
        .into_iter()
        .map(|listing| listing.into_new_job(keyword))
        .collect()
}
