use crate::models::{
    CreateTaskRequest, Label, LabelInput, Task, TaskResponse, UpdateLabelRequest,
    UpdateTaskRequest,
};
use crate::store::{Store, StoreError};
use crate::validate::{self, FieldError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

// ── Shared state ───────────────────────────────────────────────

pub struct AppState {
    pub store: Store,
}

pub type SharedState = Arc<AppState>;

// ── Error bodies ───────────────────────────────────────────────
//
// 400: {error, details: [{field, message}]}
// 404/409: {error}
// 500: {error, message} with the underlying error text, logged here.

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn validation_failed(details: Vec<FieldError>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: "Validation failed".to_string(),
            message: None,
            details: Some(details),
        }),
    )
}

fn internal_error(context: &str, err: &StoreError) -> ApiError {
    tracing::error!("{context}: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: context.to_string(),
            message: Some(err.to_string()),
            details: None,
        }),
    )
}

fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody { error: format!("{what} not found"), message: None, details: None }),
    )
}

fn name_conflict() -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(ErrorBody {
            error: "Label name already in use".to_string(),
            message: None,
            details: None,
        }),
    )
}

// ── Task handlers ──────────────────────────────────────────────

// GET /api/tasks
pub async fn list_tasks(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = state
        .store
        .list_tasks()
        .map_err(|e| internal_error("Failed to fetch tasks", &e))?;

    Ok(Json(tasks))
}

// POST /api/tasks
pub async fn create_task(
    State(state): State<SharedState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let valid = validate::validate_create(&payload).map_err(validation_failed)?;

    let now = Utc::now();
    let task = Task {
        id: Uuid::new_v4(),
        title: valid.title,
        description: valid.description,
        status: valid.status,
        priority: valid.priority,
        due_date: valid.due_date,
        label_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let created = state
        .store
        .create_task_with_labels(task, &valid.labels)
        .map_err(|e| internal_error("Failed to create task", &e))?;

    Ok(Json(created))
}

// GET /api/tasks/:id
pub async fn get_task(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .store
        .get_task(id)
        .map_err(|e| internal_error("Failed to fetch task", &e))?
        .ok_or_else(|| not_found("Task"))?;

    Ok(Json(task))
}

// PATCH /api/tasks/:id
pub async fn update_task(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let patch = validate::validate_update(&payload).map_err(validation_failed)?;

    let updated = state
        .store
        .update_task_with_labels(id, &patch)
        .map_err(|e| internal_error("Failed to update task", &e))?
        .ok_or_else(|| not_found("Task"))?;

    Ok(Json(updated))
}

// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store
        .delete_task(id)
        .map_err(|e| internal_error("Failed to delete task", &e))?;

    if !deleted {
        return Err(not_found("Task"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ── Label handlers ─────────────────────────────────────────────

// GET /api/labels
pub async fn list_labels(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Label>>, ApiError> {
    let labels = state
        .store
        .list_labels()
        .map_err(|e| internal_error("Failed to fetch labels", &e))?;

    Ok(Json(labels))
}

// POST /api/labels
pub async fn create_label(
    State(state): State<SharedState>,
    Json(payload): Json<LabelInput>,
) -> Result<Json<Label>, ApiError> {
    let valid = validate::validate_label(&payload).map_err(validation_failed)?;

    let label = state
        .store
        .create_label(&valid)
        .map_err(|e| internal_error("Failed to create label", &e))?;

    Ok(Json(label))
}

// PATCH /api/labels/:id
pub async fn update_label(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLabelRequest>,
) -> Result<Json<Label>, ApiError> {
    let patch = validate::validate_label_update(&payload).map_err(validation_failed)?;

    match state.store.update_label(id, &patch) {
        Ok(Some(label)) => Ok(Json(label)),
        Ok(None) => Err(not_found("Label")),
        Err(StoreError::LabelNameTaken) => Err(name_conflict()),
        Err(e) => Err(internal_error("Failed to update label", &e)),
    }
}

// DELETE /api/labels/:id
pub async fn delete_label(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store
        .delete_label(id)
        .map_err(|e| internal_error("Failed to delete label", &e))?;

    if !deleted {
        return Err(not_found("Label"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ── Tests ──────────────────────────────────────────────────────
