//! Task store trait and `SQLite` implementation.

use crate::error::Result;
use crate::tasks::models::{Task, TaskStatus, UNASSIGNED_ID};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Columns selected for every task query, in `parse_task` order.
const TASK_COLUMNS: &str = "id, title, description, creation_date, due_date, status";

/// Trait for task storage operations.
///
/// All methods return a `Result` and may fail with database errors.
#[allow(clippy::missing_errors_doc)]
pub trait TaskStore {
    /// List every stored task.
    fn find_all(&self) -> Result<Vec<Task>>;

    /// Get a task by id.
    fn find_by_id(&self, id: i64) -> Result<Option<Task>>;

    /// Check whether a task with the given id exists.
    fn exists_by_id(&self, id: i64) -> Result<bool>;

    /// Persist a task: insert when its id is [`UNASSIGNED_ID`], otherwise
    /// update the matching row. Returns the stored row.
    fn save(&self, task: &Task) -> Result<Task>;

    /// Delete a task by id. Returns whether a row was deleted.
    fn delete_by_id(&self, id: i64) -> Result<bool>;

    /// Count tasks with the given status.
    fn count_by_status(&self, status: TaskStatus) -> Result<i64>;

    /// List tasks with the given status.
    fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>>;

    /// List tasks whose due date is strictly before the cutoff.
    /// Tasks without a due date are excluded.
    fn find_by_due_date_before(&self, cutoff: NaiveDate) -> Result<Vec<Task>>;

    /// List tasks whose due date is strictly after the cutoff.
    /// Tasks without a due date are excluded.
    fn find_by_due_date_after(&self, cutoff: NaiveDate) -> Result<Vec<Task>>;

    /// List every task ascending by due date. Tasks without a due date
    /// sort last.
    fn find_all_order_by_due_date(&self) -> Result<Vec<Task>>;
}

/// SQLite-based task store.
///
/// Holds only the database path and opens a connection per call, so the
/// handle is cheap to clone and safe to share with the HTTP layer.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    db_path: PathBuf,
}

impl SqliteTaskStore {
    /// Create a new `SQLite` task store at the given database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let store = Self { db_path: db_path.as_ref().to_path_buf() };
        store.init_schema()?;
        Ok(store)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the database.
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS tareas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                creation_date TEXT NOT NULL,
                due_date TEXT,
                status TEXT NOT NULL DEFAULT 'PENDIENTE'
                    CHECK (status IN ('PENDIENTE', 'EN_PROGRESO', 'COMPLETADA'))
            );

            CREATE INDEX IF NOT EXISTS idx_tareas_status ON tareas(status);
            CREATE INDEX IF NOT EXISTS idx_tareas_due_date ON tareas(due_date);
            ",
        )?;

        Ok(())
    }

    /// Parse a task from a row (column order per [`TASK_COLUMNS`]).
    fn parse_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        let status_str: String = row.get(5)?;

        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            creation_date: row.get(3)?,
            due_date: row.get(4)?,
            status: TaskStatus::from_str(&status_str).unwrap_or_default(),
        })
    }

    /// Run a task query with the given WHERE/ORDER BY tail and parameters.
    fn query_tasks(
        conn: &Connection,
        tail: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tareas {tail}");
        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt.query_map(params, Self::parse_task)?.flatten().collect();
        Ok(tasks)
    }
}

impl TaskStore for SqliteTaskStore {
    fn find_all(&self) -> Result<Vec<Task>> {
        let conn = self.open()?;
        Self::query_tasks(&conn, "ORDER BY id", params![])
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.open()?;
        let task = conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tareas WHERE id = ?1"),
                params![id],
                Self::parse_task,
            )
            .optional()?;
        Ok(task)
    }

    fn exists_by_id(&self, id: i64) -> Result<bool> {
        let conn = self.open()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tareas WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn save(&self, task: &Task) -> Result<Task> {
        let conn = self.open()?;

        let id = if task.id == UNASSIGNED_ID {
            conn.execute(
                "INSERT INTO tareas (title, description, creation_date, due_date, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    task.title,
                    task.description,
                    task.creation_date,
                    task.due_date,
                    task.status.as_str()
                ],
            )?;
            conn.last_insert_rowid()
        } else {
            conn.execute(
                "UPDATE tareas
                 SET title = ?1, description = ?2, creation_date = ?3, due_date = ?4, status = ?5
                 WHERE id = ?6",
                params![
                    task.title,
                    task.description,
                    task.creation_date,
                    task.due_date,
                    task.status.as_str(),
                    task.id
                ],
            )?;
            task.id
        };

        let stored = conn.query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tareas WHERE id = ?1"),
            params![id],
            Self::parse_task,
        )?;
        Ok(stored)
    }

    fn delete_by_id(&self, id: i64) -> Result<bool> {
        let conn = self.open()?;
        let rows = conn.execute("DELETE FROM tareas WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn count_by_status(&self, status: TaskStatus) -> Result<i64> {
        let conn = self.open()?;
        let count: i64 = conn.query_row(
            "SELECT count(*) FROM tareas WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn find_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        let conn = self.open()?;
        Self::query_tasks(&conn, "WHERE status = ?1 ORDER BY id", params![status.as_str()])
    }

    fn find_by_due_date_before(&self, cutoff: NaiveDate) -> Result<Vec<Task>> {
        let conn = self.open()?;
        Self::query_tasks(
            &conn,
            "WHERE due_date IS NOT NULL AND due_date < ?1 ORDER BY id",
            params![cutoff],
        )
    }

    fn find_by_due_date_after(&self, cutoff: NaiveDate) -> Result<Vec<Task>> {
        let conn = self.open()?;
        Self::query_tasks(
            &conn,
            "WHERE due_date IS NOT NULL AND due_date > ?1 ORDER BY id",
            params![cutoff],
        )
    }

    fn find_all_order_by_due_date(&self) -> Result<Vec<Task>> {
        let conn = self.open()?;
        // Dates are ISO-8601 text, so lexicographic order is chronological.
        Self::query_tasks(&conn, "ORDER BY due_date IS NULL, due_date, id", params![])
    }
}
