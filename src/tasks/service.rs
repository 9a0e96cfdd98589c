//! Business rules for tasks: creation stamping, update whitelisting,
//! status-transition guards, and read-side projections.
//!
//! The service holds an injected store handle and delegates every read
//! and write to it; each mutating operation writes through immediately.

use chrono::{Local, NaiveDate};

use crate::tasks::models::{Task, TaskPayload, TaskStatus, UNASSIGNED_ID};
use crate::tasks::store::TaskStore;

/// Errors surfaced by the task service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No task with the referenced id exists.
    #[error("task not found: {0}")]
    NotFound(i64),

    /// The path id and the body id of an update disagree.
    #[error("path id {path_id} does not match body id {body_id}")]
    Conflict {
        /// Id taken from the request path.
        path_id: i64,
        /// Id carried in the request body.
        body_id: i64,
    },

    /// The payload sets a field the operation does not allow.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A status-transition guard was violated.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// The task's current status.
        from: TaskStatus,
        /// The requested status.
        to: TaskStatus,
    },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] crate::error::Error),
}

/// Task service over an injected store handle.
#[derive(Debug, Clone)]
pub struct TaskService<S> {
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    /// Create a service backed by the given store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// List every task.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn find_all(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.find_all()?)
    }

    /// Get a task by id.
    ///
    /// # Errors
    ///
    /// Fails with [`ServiceError::NotFound`] if no task with that id exists.
    pub fn find_by_id(&self, id: i64) -> Result<Task, ServiceError> {
        self.store.find_by_id(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Check whether a task with the given id exists.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.store.exists_by_id(id)?)
    }

    /// Create a task from a payload.
    ///
    /// Client-supplied `id`, `creation_date` and `status` are ignored:
    /// the creation date is stamped with today's date, the status is set
    /// to [`TaskStatus::Pending`], and the store assigns the id.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn create(&self, payload: TaskPayload) -> Result<Task, ServiceError> {
        let task = Task {
            id: UNASSIGNED_ID,
            title: payload.title,
            description: payload.description,
            creation_date: today(),
            due_date: payload.due_date,
            status: TaskStatus::Pending,
        };
        Ok(self.store.save(&task)?)
    }

    /// Update a task's title, description and due date.
    ///
    /// `creation_date` and `status` are carried over from the stored row
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Conflict`] if the payload carries an id that
    ///   differs from `id`.
    /// - [`ServiceError::InvalidRequest`] if the payload sets
    ///   `creation_date` or `status`.
    /// - [`ServiceError::NotFound`] if no task with that id exists.
    pub fn update(&self, id: i64, payload: TaskPayload) -> Result<Task, ServiceError> {
        if let Some(body_id) = payload.id {
            if body_id != id {
                return Err(ServiceError::Conflict { path_id: id, body_id });
            }
        }
        if payload.creation_date.is_some() {
            return Err(ServiceError::InvalidRequest(
                "creationDate is immutable and must not be set".to_string(),
            ));
        }
        if payload.status.is_some() {
            return Err(ServiceError::InvalidRequest(
                "status can only change through the transition operations".to_string(),
            ));
        }

        let mut task = self.find_by_id(id)?;
        task.title = payload.title;
        task.description = payload.description;
        task.due_date = payload.due_date;
        Ok(self.store.save(&task)?)
    }

    /// Delete a task by id.
    ///
    /// # Errors
    ///
    /// Fails with [`ServiceError::NotFound`] if no task with that id exists.
    pub fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        if self.store.delete_by_id(id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound(id))
        }
    }

    /// Move a pending task to in-progress.
    ///
    /// # Errors
    ///
    /// Fails with [`ServiceError::NotFound`] if the task is absent and
    /// with [`ServiceError::InvalidTransition`] unless its current status
    /// is [`TaskStatus::Pending`].
    pub fn start_task(&self, id: i64) -> Result<Task, ServiceError> {
        self.transition(id, TaskStatus::Pending, TaskStatus::InProgress)
    }

    /// Move an in-progress task to completed.
    ///
    /// # Errors
    ///
    /// Fails with [`ServiceError::NotFound`] if the task is absent and
    /// with [`ServiceError::InvalidTransition`] unless its current status
    /// is [`TaskStatus::InProgress`].
    pub fn complete_task(&self, id: i64) -> Result<Task, ServiceError> {
        self.transition(id, TaskStatus::InProgress, TaskStatus::Completed)
    }

    /// Guarded forward transition shared by `start_task`/`complete_task`.
    fn transition(&self, id: i64, from: TaskStatus, to: TaskStatus) -> Result<Task, ServiceError> {
        let mut task = self.find_by_id(id)?;
        if task.status != from {
            return Err(ServiceError::InvalidTransition { from: task.status, to });
        }
        task.status = to;
        Ok(self.store.save(&task)?)
    }

    /// List pending tasks. An empty result is returned as an empty list.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn pending_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.find_by_status(TaskStatus::Pending)?)
    }

    /// List in-progress tasks.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn in_progress_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.find_by_status(TaskStatus::InProgress)?)
    }

    /// List completed tasks.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn completed_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.find_by_status(TaskStatus::Completed)?)
    }

    /// List tasks whose due date is strictly before today, evaluated at
    /// call time. Tasks without a due date are never overdue.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn overdue_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.find_by_due_date_before(today())?)
    }

    /// List tasks whose due date is strictly after today, evaluated at
    /// call time.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn not_overdue_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.find_by_due_date_after(today())?)
    }

    /// Count completed tasks.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn total_completed(&self) -> Result<i64, ServiceError> {
        Ok(self.store.count_by_status(TaskStatus::Completed)?)
    }

    /// Due dates of all in-progress tasks, in store order. Tasks without
    /// a due date are skipped.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn due_dates_in_progress(&self) -> Result<Vec<NaiveDate>, ServiceError> {
        let tasks = self.store.find_by_status(TaskStatus::InProgress)?;
        Ok(tasks.into_iter().filter_map(|task| task.due_date).collect())
    }

    /// Titles of all pending tasks, in store order.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn pending_titles(&self) -> Result<Vec<String>, ServiceError> {
        let tasks = self.store.find_by_status(TaskStatus::Pending)?;
        Ok(tasks.into_iter().map(|task| task.title).collect())
    }

    /// List every task ascending by due date (undated tasks last).
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn ordered_by_due_date(&self) -> Result<Vec<Task>, ServiceError> {
        Ok(self.store.find_all_order_by_due_date()?)
    }

    /// Tasks whose title contains `text` (case-sensitive), in full-scan
    /// order.
    ///
    /// # Errors
    ///
    /// Fails only on store errors.
    pub fn tasks_by_title_substring(&self, text: &str) -> Result<Vec<Task>, ServiceError> {
        let tasks = self.store.find_all()?;
        Ok(tasks.into_iter().filter(|task| task.title.contains(text)).collect())
    }
}

/// Current local date, read once per operation.
fn today() -> NaiveDate {
    Local::now().date_naive()
}
