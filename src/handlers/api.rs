use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::info;

use crate::db::{create_todo, delete_todo, get_todo, list_todos, update_todo};
use crate::error::AppError;
use crate::models::{ListQuery, UpdateTodo};
use crate::validation::{validate_create, validate_update};
use crate::AppState;

const TODO_NOT_FOUND: &str = "The requested todo does not exist.";

pub async fn greeting() -> Json<Value> {
    Json(json!({ "message": "Hi!" }))
}

pub async fn create_new_todo(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = body?;
    let req = validate_create(&body)?;

    let todo = create_todo(&state.db, &req.value)?;
    info!(id = todo.id, order = todo.order, "Created todo");
    Ok((StatusCode::CREATED, Json(json!({ "todo": todo }))))
}

pub async fn list_all_todos(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let todos = list_todos(&state.db, query.sort)?;
    info!(count = todos.len(), "Listed todos");
    Ok(Json(json!({ "todos": todos })))
}

pub async fn update_existing_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if get_todo(&state.db, id)?.is_none() {
        return Err(AppError::NotFound(TODO_NOT_FOUND));
    }

    let Json(req) = body?;
    validate_update(&req)?;

    match update_todo(&state.db, id, &req, OffsetDateTime::now_utc())? {
        Some(todo) => {
            info!(id = todo.id, order = todo.order, done = todo.done_at.is_some(), "Updated todo");
            Ok(Json(json!({})))
        }
        None => Err(AppError::NotFound(TODO_NOT_FOUND)),
    }
}

pub async fn delete_existing_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;

    if !delete_todo(&state.db, id)? {
        return Err(AppError::NotFound(TODO_NOT_FOUND));
    }

    info!(id, "Deleted todo");
    Ok(Json(json!({})))
}

// ids are store-generated integers; anything else cannot name a todo
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound(TODO_NOT_FOUND))
}
