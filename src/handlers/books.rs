//! Book handlers: list, read, create, replace, patch, delete.

use crate::error::AppError;
use crate::model::{parse_id, BookFilter};
use crate::response::{success_created, success_many, success_message, success_one};
use crate::service::BookService;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match body {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(_) => Err(AppError::Validation("body must be a JSON object".into())),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    }
}

fn service(state: &AppState) -> BookService<'_> {
    BookService::new(state.store.as_ref(), state.policy.as_ref())
}

/// Blank query values do not constrain the result.
fn normalize_filter(filter: BookFilter) -> BookFilter {
    let keep = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    BookFilter {
        title: keep(filter.title),
        author: keep(filter.author),
        genre: keep(filter.genre),
    }
}

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<BookFilter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let books = service(&state).list(&normalize_filter(filter)).await?;
    Ok(success_many(books))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let book = service(&state).read(id).await?;
    Ok(success_one(book))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let book = service(&state).create(&body).await?;
    Ok(success_created(book))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    let book = service(&state).replace(id, &body).await?;
    Ok(success_one(book))
}

/// `PATCH /books/:title`: the path segment is a title, not an id.
pub async fn patch_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let book = service(&state).patch_by_title(&title, &body).await?;
    Ok(success_one(book))
}

/// `PATCH /books` with `{title, newAuthor}`.
pub async fn change_author(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let book = service(&state).change_author(&body).await?;
    Ok(success_one(book))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    service(&state).delete(id).await?;
    Ok(success_message("Book deleted successfully", None))
}

pub async fn delete_all(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let n = service(&state).delete_all().await?;
    Ok(success_message("All books deleted successfully", Some(n)))
}
