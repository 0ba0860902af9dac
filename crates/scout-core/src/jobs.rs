//! Persisted insight-compilation jobs.
//!
//! A job records one run of an [`InsightSource`] against a stored query:
//! `pending` when created, `running` while insights are being stored, then
//! `done` or `failed`. Jobs live in the same database as the queries they
//! refer to and are removed with them.

use crate::error::is_foreign_key_violation;
use crate::source::InsightSource;
use crate::store::{
    format_ts, now, open_connection, parse_ts, parse_uuid, parse_variant, prepare_connection,
};
use crate::{QueryStore, Result, ScoutError};
use rusqlite::{params, Connection, OptionalExtension};
use scout_types::{CompileJob, JobStatus};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// SQLite-backed store for compile jobs.
pub struct JobStore {
    conn: Mutex<Connection>,
}

impl JobStore {
    /// Open or create the job store at the given path.
    ///
    /// Uses the same database file as [`QueryStore`].
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(open_connection(path)?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        prepare_connection(&conn)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS compile_jobs (
                id TEXT PRIMARY KEY,
                query_id TEXT NOT NULL,
                status TEXT NOT NULL,
                progress REAL NOT NULL DEFAULT 0.0,
                insights_added INTEGER NOT NULL DEFAULT 0,
                error TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (query_id) REFERENCES queries(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_compile_jobs_query_id ON compile_jobs(query_id);
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ScoutError::LockPoisoned)
    }

    /// Record a new pending job for `query_id`.
    ///
    /// Fails with [`ScoutError::QueryNotFound`] when the query does not exist.
    pub fn create(&self, query_id: Uuid) -> Result<CompileJob> {
        let mut job = CompileJob::new(query_id);
        let ts = now();
        job.created_at = ts;
        job.updated_at = ts;

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO compile_jobs (id, query_id, status, progress, insights_added, error, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?7)
            "#,
            params![
                job.id.to_string(),
                job.query_id.to_string(),
                job.status.as_str(),
                job.progress,
                job.insights_added,
                format_ts(&job.created_at),
                format_ts(&job.updated_at),
            ],
        )
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                ScoutError::QueryNotFound(query_id)
            } else {
                e.into()
            }
        })?;
        debug!(target: "scout::jobs", "Created compile job {} for query {}", job.id, query_id);
        Ok(job)
    }

    /// Get a job by ID.
    pub fn get(&self, job_id: Uuid) -> Result<CompileJob> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, query_id, status, progress, insights_added, error, created_at, updated_at
             FROM compile_jobs WHERE id = ?1",
            params![job_id.to_string()],
            row_to_job,
        )
        .optional()?
        .ok_or(ScoutError::JobNotFound(job_id))
    }

    /// Jobs for one query, newest first.
    pub fn list_for_query(&self, query_id: Uuid) -> Result<Vec<CompileJob>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, query_id, status, progress, insights_added, error, created_at, updated_at
             FROM compile_jobs WHERE query_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let jobs = stmt
            .query_map(params![query_id.to_string()], row_to_job)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(jobs)
    }

    pub fn mark_running(&self, job_id: Uuid) -> Result<CompileJob> {
        self.update(job_id, JobStatus::Running, None, None, None)
    }

    pub fn set_progress(&self, job_id: Uuid, progress: f64, insights_added: u32) -> Result<CompileJob> {
        self.update(job_id, JobStatus::Running, Some(progress), Some(insights_added), None)
    }

    pub fn mark_done(&self, job_id: Uuid, insights_added: u32) -> Result<CompileJob> {
        self.update(job_id, JobStatus::Done, Some(1.0), Some(insights_added), None)
    }

    pub fn mark_failed(&self, job_id: Uuid, error: &str) -> Result<CompileJob> {
        self.update(job_id, JobStatus::Failed, None, None, Some(error))
    }

    fn update(
        &self,
        job_id: Uuid,
        status: JobStatus,
        progress: Option<f64>,
        insights_added: Option<u32>,
        error: Option<&str>,
    ) -> Result<CompileJob> {
        {
            let conn = self.conn()?;
            let changed = conn.execute(
                r#"
                UPDATE compile_jobs SET
                    status = ?1,
                    progress = COALESCE(?2, progress),
                    insights_added = COALESCE(?3, insights_added),
                    error = COALESCE(?4, error),
                    updated_at = ?5
                WHERE id = ?6
                "#,
                params![
                    status.as_str(),
                    progress.map(|p| p.clamp(0.0, 1.0)),
                    insights_added,
                    error,
                    format_ts(&now()),
                    job_id.to_string(),
                ],
            )?;
            if changed == 0 {
                return Err(ScoutError::JobNotFound(job_id));
            }
        }
        self.get(job_id)
    }
}

fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<CompileJob> {
    let id: String = row.get(0)?;
    let query_id: String = row.get(1)?;
    let status: String = row.get(2)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;
    Ok(CompileJob {
        id: parse_uuid(0, &id)?,
        query_id: parse_uuid(1, &query_id)?,
        status: parse_variant(2, &status, JobStatus::from_db(&status))?,
        progress: row.get(3)?,
        insights_added: row.get(4)?,
        error: row.get(5)?,
        created_at: parse_ts(6, &created_at)?,
        updated_at: parse_ts(7, &updated_at)?,
    })
}

/// Run a compile job to completion.
///
/// Generates insights for the job's query and appends each one. Insights
/// that already exist on the query are skipped. Any other failure ends the
/// job in `failed`; the error is recorded on the job rather than returned.
pub fn run_compile_job(
    queries: &QueryStore,
    jobs: &JobStore,
    source: &dyn InsightSource,
    job_id: Uuid,
) -> Result<CompileJob> {
    let job = jobs.mark_running(job_id)?;
    info!(target: "scout::jobs", "Compiling insights for query {} (job {})", job.query_id, job_id);

    match compile(queries, jobs, source, &job) {
        Ok(added) => {
            info!(target: "scout::jobs", "Job {} done: {} insights added", job_id, added);
            jobs.mark_done(job_id, added)
        }
        Err(e) => {
            warn!(target: "scout::jobs", "Job {} failed: {}", job_id, e);
            jobs.mark_failed(job_id, &e.to_string())
        }
    }
}

fn compile(
    queries: &QueryStore,
    jobs: &JobStore,
    source: &dyn InsightSource,
    job: &CompileJob,
) -> Result<u32> {
    let (query, _) = queries.fetch_query(job.query_id)?;
    let candidates = source.generate(&query.content);
    let total = candidates.len();
    let mut added = 0u32;

    for (idx, candidate) in candidates.into_iter().enumerate() {
        match queries.append_insight(query.id, candidate) {
            Ok(_) => added += 1,
            Err(ScoutError::Conflict) => {
                debug!(target: "scout::jobs", "Job {} skipped a duplicate insight", job.id);
            }
            Err(e) => return Err(e),
        }
        jobs.set_progress(job.id, (idx + 1) as f64 / total as f64, added)?;
    }
    Ok(added)
}
