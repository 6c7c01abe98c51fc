//! Persistent storage for job postings.

mod models;
mod schema;
mod store;
mod trait_def;
mod validation;

pub use models::*;
pub use schema::JOBS_VERSIONED_SCHEMAS;
pub use store::SqliteJobStore;
pub use trait_def::JobStore;
pub use validation::{JobInput, ValidationError, RESERVED_JOB_IDS};
