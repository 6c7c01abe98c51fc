//! SQLite-backed job store.

use super::models::{Job, JobFields, JobPage, JobPatch, NewJob, Pagination};
use super::schema::migrate_if_needed;
use super::trait_def::JobStore;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const JOB_COLUMNS: &str = "id, title, teaser, company_name, location, work_type, role, salary, keyword, listing_date, bullet_points";

const INSERT_OR_IGNORE_JOB: &str = "INSERT OR IGNORE INTO jobs
    (id, title, teaser, company_name, location, work_type, role, salary, keyword, listing_date, bullet_points)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

/// Job store persisted in a single SQLite table.
#[derive(Clone)]
pub struct SqliteJobStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteJobStore {
    /// Opens (or creates) the database at `db_path` and migrates it.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let mut conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open jobs database at {:?}", db_path))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrate_if_needed(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates a store backed by a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migrate_if_needed(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Jobs database connection mutex is poisoned"))
    }
}

fn bullet_points_to_sql(bullet_points: &[String]) -> Result<String> {
    serde_json::to_string(bullet_points).context("Failed to serialize bullet points")
}

fn job_from_row(row: &Row) -> rusqlite::Result<Job> {
    let listing_date_ms: i64 = row.get(9)?;
    let listing_date = DateTime::<Utc>::from_timestamp_millis(listing_date_ms)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(9, listing_date_ms))?;

    let bullet_points_json: Option<String> = row.get(10)?;
    let bullet_points = match bullet_points_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?,
        None => Vec::new(),
    };

    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        teaser: row.get(2)?,
        company_name: row.get(3)?,
        location: row.get(4)?,
        work_type: row.get(5)?,
        role: row.get(6)?,
        salary: row.get(7)?,
        keyword: row.get(8)?,
        listing_date,
        bullet_points,
    })
}

fn get_job_with(conn: &Connection, id: &str) -> Result<Option<Job>> {
    let job = conn
        .query_row(
            &format!("SELECT {} FROM jobs WHERE id = ?1", JOB_COLUMNS),
            params![id],
            job_from_row,
        )
        .optional()?;
    Ok(job)
}

fn count_with(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM jobs", [], |r| r.get(0))?;
    Ok(count as usize)
}

fn insert_or_ignore_with(
    conn: &Connection,
    id: &str,
    listing_date: DateTime<Utc>,
    fields: &JobFields,
) -> Result<usize> {
    let changed = conn.execute(
        INSERT_OR_IGNORE_JOB,
        params![
            id,
            fields.title,
            fields.teaser,
            fields.company_name,
            fields.location,
            fields.work_type,
            fields.role,
            fields.salary,
            fields.keyword,
            listing_date.timestamp_millis(),
            bullet_points_to_sql(&fields.bullet_points)?,
        ],
    )?;
    Ok(changed)
}

impl JobStore for SqliteJobStore {
    fn list_jobs(&self, keyword: Option<&str>, pagination: Pagination) -> Result<JobPage> {
        let keyword = keyword.filter(|k| !k.is_empty());
        let conn = self.conn()?;

        let total_data: i64 = conn.query_row(
            "SELECT COUNT(*) FROM jobs WHERE (?1 IS NULL OR keyword = ?1)",
            params![keyword],
            |r| r.get(0),
        )?;

        // An offset past i64 is past any table SQLite can hold.
        let offset = match pagination.offset() {
            Some(offset) => offset,
            None => {
                return Ok(JobPage {
                    total_data: total_data as usize,
                    jobs: Vec::new(),
                })
            }
        };

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM jobs
             WHERE (?1 IS NULL OR keyword = ?1)
             ORDER BY seq ASC
             LIMIT ?2 OFFSET ?3",
            JOB_COLUMNS
        ))?;
        let jobs = stmt
            .query_map(
                params![
                    keyword,
                    i64::try_from(pagination.size).unwrap_or(i64::MAX),
                    offset
                ],
                job_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(JobPage {
            total_data: total_data as usize,
            jobs,
        })
    }

    fn get_all_jobs(&self) -> Result<Vec<Job>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM jobs ORDER BY seq ASC",
            JOB_COLUMNS
        ))?;
        let jobs = stmt
            .query_map([], job_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    fn get_job(&self, id: &str) -> Result<Option<Job>> {
        let conn = self.conn()?;
        get_job_with(&conn, id)
    }

    fn create_job(&self, id: &str, fields: JobFields) -> Result<Option<Job>> {
        let conn = self.conn()?;
        if insert_or_ignore_with(&conn, id, Utc::now(), &fields)? == 0 {
            debug!("Job {} already exists, not creating it", id);
            return Ok(None);
        }
        get_job_with(&conn, id)
    }

    fn update_job(&self, id: &str, patch: JobPatch) -> Result<Option<Job>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing = match get_job_with(&tx, id)? {
            Some(job) => job,
            None => return Ok(None),
        };
        let fields = patch.apply(existing.fields());

        tx.execute(
            "UPDATE jobs SET
                title = ?2, teaser = ?3, company_name = ?4, location = ?5,
                work_type = ?6, role = ?7, salary = ?8, keyword = ?9, bullet_points = ?10
             WHERE id = ?1",
            params![
                id,
                fields.title,
                fields.teaser,
                fields.company_name,
                fields.location,
                fields.work_type,
                fields.role,
                fields.salary,
                fields.keyword,
                bullet_points_to_sql(&fields.bullet_points)?,
            ],
        )?;
        let updated = get_job_with(&tx, id)?;
        tx.commit()?;

        Ok(updated)
    }

    fn delete_job(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM jobs WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn insert_jobs_ignoring_duplicates(&self, jobs: &[NewJob]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let before = count_with(&tx)?;
        for job in jobs {
            insert_or_ignore_with(&tx, &job.id, job.listing_date, &job.fields)?;
        }
        let after = count_with(&tx)?;
        tx.commit()?;

        Ok(after.saturating_sub(before))
    }

    fn get_keywords(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT keyword FROM jobs GROUP BY keyword ORDER BY MIN(seq) ASC",
        )?;
        let keywords = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keywords)
    }

    fn get_jobs_count(&self) -> Result<usize> {
        let conn = self.conn()?;
        count_with(&conn)
    }
}
