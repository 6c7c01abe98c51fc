//! Test data builders

use serde_json::{json, Value};

/// A listings page in the layout the job site currently serves.
pub const LISTINGS_PAGE_HTML: &str = include_str!("../fixtures/listings_page.html");

/// A page from the job site without any embedded server state.
pub const MAINTENANCE_PAGE_HTML: &str =
    "<!DOCTYPE html><html><body><h1>We'll be back soon</h1></body></html>";

/// A complete job creation body.
pub fn job_body(id: &str, keyword: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Job {}", id),
        "teaser": "Work on interesting problems",
        "companyName": "Test Company",
        "location": "Jakarta",
        "workType": "Full time",
        "role": "software-engineer",
        "salary": "IDR 10.000.000",
        "keyword": keyword,
        "bulletPoints": ["First perk", "Second perk"]
    })
}
