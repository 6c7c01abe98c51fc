//! JobStore trait definition.

use super::models::{Job, JobFields, JobPage, JobPatch, NewJob, Pagination};
use anyhow::Result;

/// Trait for job storage backends.
///
/// Every call is atomic on its own. Identifiers are unique: inserting a job
/// whose id already exists never modifies the stored one.
pub trait JobStore: Send + Sync {
    /// Returns one page of jobs in insertion order.
    /// When `keyword` is Some, only jobs whose keyword matches exactly are
    /// considered, both for the page and for `total_data`.
    fn list_jobs(&self, keyword: Option<&str>, pagination: Pagination) -> Result<JobPage>;

    /// Returns all jobs in insertion order.
    fn get_all_jobs(&self) -> Result<Vec<Job>>;

    /// Returns Ok(None) if the job does not exist.
    fn get_job(&self, id: &str) -> Result<Option<Job>>;

    /// Creates a job, stamping the listing date with the current time.
    /// Returns Ok(None) if a job with the same id already exists.
    fn create_job(&self, id: &str, fields: JobFields) -> Result<Option<Job>>;

    /// Applies `patch` to the job and returns the updated job.
    /// Returns Ok(None) if the job does not exist.
    fn update_job(&self, id: &str, patch: JobPatch) -> Result<Option<Job>>;

    /// Returns Ok(false) if the job did not exist.
    fn delete_job(&self, id: &str) -> Result<bool>;

    /// Inserts all jobs in one transaction, skipping ids that already exist.
    /// Returns how many jobs were actually added.
    fn insert_jobs_ignoring_duplicates(&self, jobs: &[NewJob]) -> Result<usize>;

    /// Distinct keywords in order of first appearance.
    fn get_keywords(&self) -> Result<Vec<String>>;

    fn get_jobs_count(&self) -> Result<usize>;
}
