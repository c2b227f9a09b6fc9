use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use handsup_core::domain::{Event, EventId, EventPayload, ensure_event_payload};
use handsup_core::seed;
use serde::Serialize;
use tracing::info;

use crate::infra::api_response::ApiResponse;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct DeletedEvent {
    pub id: EventId,
}

/// All events, soonest first.
pub async fn list_events_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Event>>>> {
    let events = state.store().events.list().await?;
    Ok(Json(ApiResponse::success(events)))
}

pub async fn get_event_handler(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> AppResult<Json<ApiResponse<Event>>> {
    let event = state
        .store()
        .events
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("event {id} not found")))?;
    Ok(Json(ApiResponse::success(event)))
}

pub async fn create_event_handler(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<Event>>)> {
    let draft = ensure_event_payload(&payload)?;
    let event = state.store().events.create(draft).await?;
    info!(event_id = %event.id, name = %event.name, "event created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(event))))
}

pub async fn update_event_handler(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    Json(payload): Json<EventPayload>,
) -> AppResult<Json<ApiResponse<Event>>> {
    let draft = ensure_event_payload(&payload)?;
    let event = state
        .store()
        .events
        .update(id, draft)
        .await?
        .ok_or_else(|| AppError::not_found(format!("event {id} not found")))?;
    info!(event_id = %event.id, "event updated");
    Ok(Json(ApiResponse::success(event)))
}

/// Delete an event together with its assignments.
pub async fn delete_event_handler(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> AppResult<Json<ApiResponse<DeletedEvent>>> {
    if !state.store().events.delete(id).await? {
        return Err(AppError::not_found(format!("event {id} not found")));
    }
    info!(event_id = %id, "event deleted");
    Ok(Json(
        ApiResponse::success(DeletedEvent { id }).with_message("event deleted"),
    ))
}

/// Replace every event with the built-in catalogue.
pub async fn reset_events_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Event>>>> {
    let events = state
        .store()
        .events
        .reset(seed::default_events(Utc::now()))
        .await?;
    info!(count = events.len(), "events reset to the default catalogue");
    Ok(Json(ApiResponse::success(events)))
}
