//! Job record types shared by the store, the scraper and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters a teaser may hold.
pub const TEASER_MAX_CHARS: usize = 255;

/// A stored job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub teaser: String,
    pub company_name: String,
    pub location: String,
    pub work_type: String,
    pub role: String,
    pub salary: String,
    pub keyword: String,
    pub listing_date: DateTime<Utc>,
    #[serde(default)]
    pub bullet_points: Vec<String>,
}

/// The replaceable part of a job, everything except `id` and `listing_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFields {
    pub title: String,
    pub teaser: String,
    pub company_name: String,
    pub location: String,
    pub work_type: String,
    pub role: String,
    pub salary: String,
    pub keyword: String,
    pub bullet_points: Vec<String>,
}

/// A job ready to be inserted with a listing date chosen by the caller.
///
/// Used by the scraper, where the listing date comes from the source site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub id: String,
    pub listing_date: DateTime<Utc>,
    pub fields: JobFields,
}

/// A partial update. `None` leaves the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPatch {
    pub title: Option<String>,
    pub teaser: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub role: Option<String>,
    pub salary: Option<String>,
    pub keyword: Option<String>,
    pub bullet_points: Option<Vec<String>>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        *self == JobPatch::default()
    }

    /// Applies the patch on top of existing fields.
    pub fn apply(self, fields: JobFields) -> JobFields {
        JobFields {
            title: self.title.unwrap_or(fields.title),
            teaser: self.teaser.unwrap_or(fields.teaser),
            company_name: self.company_name.unwrap_or(fields.company_name),
            location: self.location.unwrap_or(fields.location),
            work_type: self.work_type.unwrap_or(fields.work_type),
            role: self.role.unwrap_or(fields.role),
            salary: self.salary.unwrap_or(fields.salary),
            keyword: self.keyword.unwrap_or(fields.keyword),
            bullet_points: self.bullet_points.unwrap_or(fields.bullet_points),
        }
    }
}

impl From<JobFields> for JobPatch {
    fn from(fields: JobFields) -> Self {
        JobPatch {
            title: Some(fields.title),
            teaser: Some(fields.teaser),
            company_name: Some(fields.company_name),
            location: Some(fields.location),
            work_type: Some(fields.work_type),
            role: Some(fields.role),
            salary: Some(fields.salary),
            keyword: Some(fields.keyword),
            bullet_points: Some(fields.bullet_points),
        }
    }
}

impl Job {
    pub fn fields(&self) -> JobFields {
        JobFields {
            title: self.title.clone(),
            teaser: self.teaser.clone(),
            company_name: self.company_name.clone(),
            location: self.location.clone(),
            work_type: self.work_type.clone(),
            role: self.role.clone(),
            salary: self.salary.clone(),
            keyword: self.keyword.clone(),
            bullet_points: self.bullet_points.clone(),
        }
    }
}

/// 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub size: usize,
}

impl Pagination {
    /// Rows to skip, or None when the offset does not fit an SQLite integer.
    pub fn offset(&self) -> Option<i64> {
        let offset = self.page.saturating_sub(1).checked_mul(self.size)?;
        i64::try_from(offset).ok()
    }
}

/// One page of jobs plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub total_data: usize,
    pub jobs: Vec<Job>,
}
