use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use handsup_core::domain::{
    Event, EventId, HistoryEntry, NewHistoryEntry, VolunteerId,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::infra::api_response::ApiResponse;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub volunteer_id: Option<VolunteerId>,
}

/// A history row with the event it refers to, when that event still exists.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    #[serde(flatten)]
    pub entry: HistoryEntry,
    pub event: Option<Event>,
}

/// The caller's own history. Admins may pass `?volunteer_id=`.
pub async fn own_history_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<ApiResponse<Vec<HistoryItem>>>> {
    let volunteer_id = query.volunteer_id.unwrap_or(user.volunteer_id);
    user.ensure_can_access(volunteer_id)?;
    history_for(&state, volunteer_id).await.map(wrap)
}

pub async fn volunteer_history_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(volunteer_id): Path<VolunteerId>,
) -> AppResult<Json<ApiResponse<Vec<HistoryItem>>>> {
    user.ensure_can_access(volunteer_id)?;
    history_for(&state, volunteer_id).await.map(wrap)
}

pub async fn record_history_handler(
    State(state): State<AppState>,
    Json(entry): Json<NewHistoryEntry>,
) -> AppResult<(StatusCode, Json<ApiResponse<HistoryEntry>>)> {
    let recorded = state.store().history.record(entry).await?;
    info!(
        history_id = %recorded.id,
        volunteer_id = %recorded.volunteer_id,
        event_id = %recorded.event_id,
        status = %recorded.status,
        "participation recorded"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::success(recorded))))
}

fn wrap(items: Vec<HistoryItem>) -> Json<ApiResponse<Vec<HistoryItem>>> {
    Json(ApiResponse::success(items))
}

async fn history_for(
    state: &AppState,
    volunteer_id: VolunteerId,
) -> AppResult<Vec<HistoryItem>> {
    let entries = state.store().history.list_for_volunteer(volunteer_id).await?;

    let mut events: HashMap<EventId, Option<Event>> = HashMap::new();
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let event = match events.get(&entry.event_id) {
            Some(cached) => cached.clone(),
            None => {
                let fetched = state.store().events.get(entry.event_id).await?;
                events.insert(entry.event_id, fetched.clone());
                fetched
            }
        };
        items.push(HistoryItem { entry, event });
    }
    Ok(items)
}
