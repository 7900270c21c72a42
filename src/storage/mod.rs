// storage/mod.rs — SQLite-backed task store.

use anyhow::{Context as _, Result};
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use tracing::info;

use crate::tasks::query::build_update;
use crate::tasks::{NewTask, Task, TaskError, TaskPatch};

/// Default timeout for individual SQLite queries.
/// Prevents a hung query from wedging its request indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
async fn with_timeout<T>(
    fut: impl std::future::Future<Output = Result<T, TaskError>>,
) -> Result<T, TaskError> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(TaskError::Store(sqlx::Error::PoolTimedOut)),
    }
}

/// The tasks table, created at startup when absent. No migration
/// machinery: the schema is a single table and never evolves in place.
///
/// AUTOINCREMENT keeps deleted ids from being reused. title/priority
/// NOT NULL is the only presence enforcement in the system.
const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    priority TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE
)";

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        Self::new_with_slow_query(data_dir, 0).await
    }

    /// Create storage with slow-query logging enabled.
    ///
    /// `slow_query_ms` is the threshold in milliseconds — queries exceeding
    /// it are logged at WARN level. Set to 0 to disable.
    pub async fn new_with_slow_query(data_dir: &Path, slow_query_ms: u64) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("taskd.db");
        let mut opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        if slow_query_ms > 0 {
            opts = opts.log_slow_statements(
                log::LevelFilter::Warn,
                std::time::Duration::from_millis(slow_query_ms),
            );
        }

        let pool = SqlitePool::connect_with(opts).await?;
        Self::bootstrap(&pool).await?;
        info!(path = %db_path.display(), "task store ready");
        Ok(Self { pool })
    }

    async fn bootstrap(pool: &SqlitePool) -> Result<()> {
        sqlx::query(SCHEMA_TASKS)
            .execute(pool)
            .await
            .context("failed to create tasks table")?;
        Ok(())
    }

    // ─── Tasks ────────────────────────────────────────────────────────────────

    /// All tasks, ordered by priority descending. The ordering is
    /// lexicographic on the text value ("medium" sorts above "low" sorts
    /// above "high"), not a severity ranking.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskError> {
        with_timeout(async {
            Ok(sqlx::query_as("SELECT * FROM tasks ORDER BY priority DESC")
                .fetch_all(&self.pool)
                .await?)
        })
        .await
    }

    /// Insert a new task. `completed` is forced to false regardless of
    /// anything the client sent. Missing title/priority hit the NOT NULL
    /// constraints and come back as a store error.
    pub async fn create_task(&self, new: &NewTask) -> Result<Task, TaskError> {
        with_timeout(async {
            Ok(sqlx::query_as(
                "INSERT INTO tasks (title, description, priority, completed)
                 VALUES ($1, $2, $3, FALSE) RETURNING *",
            )
            .bind(&new.title)
            .bind(&new.description)
            .bind(&new.priority)
            .fetch_one(&self.pool)
            .await?)
        })
        .await
    }

    /// Replace the completion flag only. Returns None when the id matched
    /// no row; callers pass that through as-is rather than erroring.
    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<Option<Task>, TaskError> {
        with_timeout(async {
            Ok(
                sqlx::query_as("UPDATE tasks SET completed = $1 WHERE id = $2 RETURNING *")
                    .bind(completed)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?,
            )
        })
        .await
    }

    /// Partial update: writes exactly the supplied fields, leaving the
    /// rest untouched. The statement is built per request by the query
    /// builder; the id binds at the final placeholder position.
    pub async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task, TaskError> {
        let query = build_update(patch)?;
        with_timeout(async {
            let mut q = sqlx::query_as(&query.sql);
            for value in &query.params {
                q = q.bind(value);
            }
            q.bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(TaskError::NotFound)
        })
        .await
    }

    /// Unconditional delete. A non-existent id is not an error: the row
    /// count is deliberately ignored, matching the endpoint's contract.
    pub async fn delete_task(&self, id: i64) -> Result<(), TaskError> {
        with_timeout(async {
            sqlx::query("DELETE FROM tasks WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(())
        })
        .await
    }
}
