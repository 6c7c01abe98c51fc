//! Schema definition for the jobs table.

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use tracing::info;

/// A single step of the jobs database schema.
pub struct JobsSchema {
    pub version: usize,
    pub up: &'static str,
}

pub const JOBS_VERSIONED_SCHEMAS: &[JobsSchema] = &[JobsSchema {
    version: 1,
    up: r#"
            CREATE TABLE IF NOT EXISTS jobs (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                teaser TEXT NOT NULL,
                company_name TEXT NOT NULL,
                location TEXT NOT NULL,
                work_type TEXT NOT NULL,
                role TEXT NOT NULL,
                salary TEXT NOT NULL,
                keyword TEXT NOT NULL,
                listing_date INTEGER NOT NULL,
                bullet_points TEXT NOT NULL DEFAULT '[]'
            );

            CREATE INDEX IF NOT EXISTS idx_jobs_keyword ON jobs(keyword);
        "#,
}];

/// Brings the database up to the latest known schema version.
///
/// Versions are tracked through `PRAGMA user_version`. A database written by a
/// newer binary is rejected rather than silently downgraded.
pub fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    let latest_version = JOBS_VERSIONED_SCHEMAS
        .last()
        .map(|schema| schema.version)
        .unwrap_or(0);

    if db_version < 0 || db_version as usize > latest_version {
        bail!(
            "Jobs database is at version {}, this binary only knows up to version {}",
            db_version,
            latest_version
        );
    }

    let current_version = db_version as usize;
    if current_version == latest_version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for schema in JOBS_VERSIONED_SCHEMAS
        .iter()
        .filter(|schema| schema.version > current_version)
    {
        info!("Migrating jobs db to version {}", schema.version);
        tx.execute_batch(schema.up)
            .with_context(|| format!("Failed to apply jobs schema version {}", schema.version))?;
        tx.pragma_update(None, "user_version", schema.version as i64)?;
    }
    tx.commit()?;

    Ok(())
}
