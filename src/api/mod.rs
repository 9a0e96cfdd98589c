//! HTTP surface for the task tracker.
//!
//! Five REST endpoints under `/tareas`, mapped one-to-one onto service
//! calls; the handlers hold no logic beyond parameter extraction and
//! error mapping.

// axum handlers must be async even though the service is blocking.
#![allow(clippy::unused_async)]

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::tasks::{SqliteTaskStore, Task, TaskPayload, TaskService};

pub mod error;

pub use error::{ApiError, ErrorResponse};

/// Shared application state: the task service behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    service: Arc<TaskService<SqliteTaskStore>>,
}

impl AppState {
    /// Wrap a service for sharing across handlers.
    #[must_use]
    pub fn new(service: TaskService<SqliteTaskStore>) -> Self {
        Self { service: Arc::new(service) }
    }
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tareas", get(list_tasks).post(create_task))
        .route("/tareas/{id}", get(get_task).put(update_task).delete(delete_task))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /tareas
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.service.find_all()?))
}

/// GET /tareas/{id}
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.service.find_by_id(id)?))
}

/// POST /tareas
async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.service.create(payload)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /tareas/{id}
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.service.update(id, payload)?))
}

/// DELETE /tareas/{id}
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_by_id(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let store = SqliteTaskStore::new(dir.path().join("tareas.sqlite3")).unwrap();
        let state = AppState::new(TaskService::new(store));
        (dir, router(state))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn create_task_via_http(app: &Router, body: &str) -> serde_json::Value {
        let response =
            app.clone().oneshot(json_request("POST", "/tareas", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (_dir, app) = test_app();

        let response = app.oneshot(get_request("/tareas")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_returns_created_task() {
        let (_dir, app) = test_app();

        let created = create_task_via_http(
            &app,
            r#"{"title": "Comprar pan", "dueDate": "2099-01-01"}"#,
        )
        .await;

        assert_eq!(created["title"], "Comprar pan");
        assert_eq!(created["status"], "PENDIENTE");
        assert_eq!(created["dueDate"], "2099-01-01");
        assert!(created["id"].as_i64().unwrap() > 0);
        assert!(created["creationDate"].is_string());
    }

    #[tokio::test]
    async fn test_create_ignores_client_status() {
        let (_dir, app) = test_app();

        let created =
            create_task_via_http(&app, r#"{"title": "A", "status": "COMPLETADA", "id": 77}"#)
                .await;
        assert_eq!(created["status"], "PENDIENTE");
        assert_ne!(created["id"], 77);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (_dir, app) = test_app();
        let created = create_task_via_http(&app, r#"{"title": "A"}"#).await;
        let id = created["id"].as_i64().unwrap();

        let response = app.oneshot(get_request(&format!("/tareas/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn test_get_missing_is_404_with_code() {
        let (_dir, app) = test_app();

        let response = app.oneshot(get_request("/tareas/42")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body["message"].as_str().unwrap().contains("42"));
    }

    #[tokio::test]
    async fn test_update_roundtrip() {
        let (_dir, app) = test_app();
        let created = create_task_via_http(&app, r#"{"title": "Before"}"#).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/tareas/{id}"),
                r#"{"title": "After", "description": "more"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated = body_json(response).await;
        assert_eq!(updated["title"], "After");
        assert_eq!(updated["description"], "more");
        assert_eq!(updated["creationDate"], created["creationDate"]);
        assert_eq!(updated["status"], "PENDIENTE");
    }

    #[tokio::test]
    async fn test_update_id_mismatch_is_409() {
        let (_dir, app) = test_app();
        let created = create_task_via_http(&app, r#"{"title": "A"}"#).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/tareas/{id}"),
                &format!(r#"{{"id": {}, "title": "B"}}"#, id + 1),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_update_with_status_is_400() {
        let (_dir, app) = test_app();
        let created = create_task_via_http(&app, r#"{"title": "A"}"#).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/tareas/{id}"),
                r#"{"title": "B", "status": "EN_PROGRESO"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_update_missing_is_404() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(json_request("PUT", "/tareas/42", r#"{"title": "B"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let (_dir, app) = test_app();
        let created = create_task_via_http(&app, r#"{"title": "A"}"#).await;
        let id = created["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/tareas/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.oneshot(get_request(&format!("/tareas/{id}"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_missing_is_404() {
        let (_dir, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/tareas/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_returns_all_created_tasks() {
        let (_dir, app) = test_app();
        create_task_via_http(&app, r#"{"title": "A"}"#).await;
        create_task_via_http(&app, r#"{"title": "B"}"#).await;

        let response = app.oneshot(get_request("/tareas")).await.unwrap();
        let body = body_json(response).await;
        let titles: Vec<_> =
            body.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }
}
