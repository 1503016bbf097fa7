use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    error::AppError,
    guard::GuardStatus,
    search,
    sessions::bearer_token,
    state::AppState,
    store::{Group, ImportantLink},
    utils::client_ip,
};

#[derive(Deserialize)]
pub struct AdminLogin {
    // A missing password is an ordinary mismatch, not a 4xx rejection.
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct GroupCreate {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
pub struct GroupUpdate {
    id: u64,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
pub struct PinGroup {
    group_id: u64,
    pinned: bool,
}

#[derive(Deserialize)]
pub struct LinkCreate {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
pub struct LinkUpdate {
    id: u64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
}

#[derive(Deserialize)]
pub struct ListParams {
    q: Option<String>,
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    match bearer_token(headers) {
        Some(token) if state.sessions.verify(token) => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<AdminLogin>,
) -> Result<Json<Value>, AppError> {
    let client = client_ip(&headers);

    state.guard.attempt_login(&payload.password).map_err(|denial| {
        warn!(%client, "admin login rejected");
        denial
    })?;

    let token = state.sessions.issue();
    info!(%client, "admin session issued");
    Ok(Json(json!({ "success": true, "token": token })))
}

pub async fn admin_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.guard.status() {
        GuardStatus::Locked { remaining_secs } => Json(json!({
            "locked": true,
            "remaining_seconds": remaining_secs,
        })),
        GuardStatus::Unlocked { attempts_remaining } => Json(json!({
            "locked": false,
            "attempts_remaining": attempts_remaining,
        })),
    }
}

pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Group>> {
    let groups = state.store.list_groups();

    match params.q.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => Json(search::rank(query, groups)),
        _ => Json(groups),
    }
}

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<GroupCreate>,
) -> Result<Json<Group>, AppError> {
    require_admin(&state, &headers)?;

    let group = state
        .store
        .create_group(&payload.name, &payload.description, &payload.url)?;
    info!(id = group.id, name = %group.name, "group created");
    Ok(Json(group))
}

pub async fn update_group(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<GroupUpdate>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state, &headers)?;

    let group = state.store.update_group(
        payload.id,
        &payload.name,
        &payload.description,
        &payload.url,
    )?;
    Ok(Json(json!({ "success": true, "group": group })))
}

pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state, &headers)?;

    state.store.delete_group(id)?;
    info!(id, "group deleted");
    Ok(Json(json!({ "success": true })))
}

pub async fn pin_group(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<PinGroup>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state, &headers)?;

    let group = state.store.set_pinned(payload.group_id, payload.pinned)?;
    Ok(Json(json!({ "success": true, "group": group })))
}

pub async fn list_links(State(state): State<Arc<AppState>>) -> Json<Vec<ImportantLink>> {
    Json(state.store.list_links())
}

pub async fn create_link(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<LinkCreate>,
) -> Result<Json<ImportantLink>, AppError> {
    require_admin(&state, &headers)?;

    let link = state
        .store
        .create_link(&payload.title, &payload.description, &payload.url)?;
    info!(id = link.id, title = %link.title, "link created");
    Ok(Json(link))
}

pub async fn update_link(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<LinkUpdate>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state, &headers)?;

    let link = state.store.update_link(
        payload.id,
        &payload.title,
        &payload.description,
        &payload.url,
    )?;
    Ok(Json(json!({ "success": true, "link": link })))
}

pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state, &headers)?;

    state.store.delete_link(id)?;
    info!(id, "link deleted");
    Ok(Json(json!({ "success": true })))
}
