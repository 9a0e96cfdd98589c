//! # `tareas`
//!
//! A minimal task-tracking REST backend: a `SQLite` store, a service
//! layer holding every behavioral rule, and an axum controller exposing
//! five endpoints under `/tareas`.

pub mod api;
pub mod error;
pub mod tasks;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
