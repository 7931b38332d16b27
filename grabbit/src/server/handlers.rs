//! HTTP endpoint handlers
//!
//! Thin mappings from requests onto facade operations.

use super::dashboard;
use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::services::{
    ActionResponse, ListQuery, ListResponse, RecentResponse, StoresResponse, SummaryResponse,
};
use crate::store::{ItemUpdate, NewItem};
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

type ApiResult<T> = Result<Json<T>>;

/// Body naming a single item
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: String,
}

/// Body for mark_bought: an id, a name, or both
#[derive(Debug, Deserialize)]
pub struct MarkBoughtRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    Ok(Html(dashboard::render(&state.grabbit, &state.secret).await?))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<ListResponse> {
    Json(state.grabbit.list(query).await)
}

pub async fn summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(state.grabbit.summary().await)
}

pub async fn stores(State(state): State<Arc<AppState>>) -> Json<StoresResponse> {
    Json(state.grabbit.stores().await)
}

pub async fn recent(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentQuery>,
) -> Json<RecentResponse> {
    Json(state.grabbit.recent_purchases(query.days).await)
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Json<ListResponse> {
    Json(state.grabbit.search(&query.q).await)
}

pub async fn urgent(State(state): State<Arc<AppState>>) -> Json<ListResponse> {
    Json(state.grabbit.urgent().await)
}

pub async fn at_store(
    State(state): State<Arc<AppState>>,
    Path(store): Path<String>,
) -> Json<ListResponse> {
    Json(state.grabbit.at_store(&store).await)
}

pub async fn for_person(
    State(state): State<Arc<AppState>>,
    Path(person): Path<String>,
) -> Json<ListResponse> {
    Json(state.grabbit.for_person(&person).await)
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<ActionResponse> {
    Json(state.grabbit.get(&id).await)
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewItem>,
) -> ApiResult<ActionResponse> {
    Ok(Json(state.grabbit.add(req).await?))
}

pub async fn mark_bought(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MarkBoughtRequest>,
) -> ApiResult<ActionResponse> {
    let response = state
        .grabbit
        .mark_bought(req.id.as_deref(), req.name.as_deref())
        .await?;
    Ok(Json(response))
}

pub async fn archive(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> ApiResult<ActionResponse> {
    Ok(Json(state.grabbit.archive(&req.id).await?))
}

pub async fn restore(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> ApiResult<ActionResponse> {
    Ok(Json(state.grabbit.restore(&req.id).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest>,
) -> ApiResult<ActionResponse> {
    Ok(Json(state.grabbit.delete(&req.id).await?))
}

/// Body is `{ "id": ..., <field>: <value>, ... }`; fields other than the
/// known item fields are rejected
pub async fn update(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<Map<String, Value>>,
) -> ApiResult<ActionResponse> {
    let id = match body.remove("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id,
        _ => return Err(AppError::InvalidInput("Missing id".to_string())),
    };

    let update: ItemUpdate = serde_json::from_value(Value::Object(body))
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    Ok(Json(state.grabbit.update(&id, update).await?))
}
