//! Task tracking: models, persistence, and business rules.
//!
//! This module provides the two inner layers of the backend:
//! - [`store`]: a `TaskStore` trait over a single `tareas` table, with a
//!   `SQLite` implementation
//! - [`service`]: creation stamping, update-field whitelisting, guarded
//!   status transitions, and the read-side projections
//!
//! # Example
//!
//! ```no_run
//! use tareas::tasks::{SqliteTaskStore, TaskPayload, TaskService};
//!
//! let store = SqliteTaskStore::new("/tmp/tareas.sqlite3").unwrap();
//! let service = TaskService::new(store);
//!
//! let task = service
//!     .create(TaskPayload { title: "Comprar pan".to_string(), ..TaskPayload::default() })
//!     .unwrap();
//!
//! let task = service.start_task(task.id).unwrap();
//! service.complete_task(task.id).unwrap();
//! ```

pub mod models;
pub mod service;
pub mod store;

pub use models::{InvalidStatus, Task, TaskPayload, TaskStatus, UNASSIGNED_ID};
pub use service::{ServiceError, TaskService};
pub use store::{SqliteTaskStore, TaskStore};
