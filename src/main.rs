//! HTTP server binary for `tareas`.
//!
//! Binds the axum router to a socket and serves the task API over a
//! `SQLite` database.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tareas::api::{router, AppState};
use tareas::tasks::{SqliteTaskStore, TaskService};

/// Command-line arguments for the server.
#[derive(Debug, Parser)]
#[command(name = "tareas-server", version, about = "Task-tracking REST backend")]
struct Args {
    /// Address to bind the HTTP listener to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Path to the SQLite database file (created if missing).
    #[arg(long, default_value = "tareas.sqlite3")]
    db_path: PathBuf,
}

#[tokio::main]
async fn main() -> tareas::error::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tareas=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = SqliteTaskStore::new(&args.db_path)?;
    tracing::info!(db_path = %args.db_path.display(), "opened task store");

    let app = router(AppState::new(TaskService::new(store)));

    tracing::info!("listening on {}", args.bind);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
