use std::time::Duration;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use chrono::Utc;
use futures_util::{Stream, stream};
use handsup_core::domain::{NewNotice, Notice, VolunteerId};
use handsup_core::notify::topic_for;
use handsup_core::reminder::TickReport;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::auth::AuthUser;
use crate::infra::api_response::ApiResponse;
use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

#[derive(Debug, Serialize)]
pub struct ReminderRun {
    /// Set when another tick was still running and this one did nothing.
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<TickReport>,
}

/// Notices for one volunteer, newest first.
pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(volunteer_id): Path<VolunteerId>,
) -> AppResult<Json<ApiResponse<Vec<Notice>>>> {
    user.ensure_can_access(volunteer_id)?;
    let notices = state.notices().list_for(volunteer_id).await?;
    Ok(Json(ApiResponse::success(notices)))
}

pub async fn create_notification_handler(
    State(state): State<AppState>,
    Json(notice): Json<NewNotice>,
) -> AppResult<(StatusCode, Json<ApiResponse<Notice>>)> {
    let notice = state.notices().create(notice).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(notice))))
}

/// Live feed of `notice:<volunteerId>` as server-sent events.
///
/// The bus handler only pushes into an unbounded channel; the subscription
/// is dropped together with the response stream.
pub async fn notification_stream_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(volunteer_id): Path<VolunteerId>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, anyhow::Error>>>> {
    user.ensure_can_access(volunteer_id)?;

    let (tx, rx) = mpsc::unbounded_channel::<Notice>();
    let subscription = state.notices().bus().subscribe_scoped(
        topic_for(volunteer_id),
        move |notice: &Notice| {
            let _ = tx.send(notice.clone());
        },
    );
    debug!(volunteer_id = %volunteer_id, "notice stream opened");

    let stream = stream::unfold(
        (rx, subscription),
        |(mut receiver, subscription)| async move {
            let notice = receiver.recv().await?;
            let event = Event::default()
                .event("notice")
                .id(notice.id.to_string())
                .json_data(&notice)
                .map_err(anyhow::Error::from);
            Some((event, (receiver, subscription)))
        },
    );

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keepalive"),
    ))
}

/// Run one reminder tick now instead of waiting for the timer.
pub async fn run_reminders_handler(
    State(state): State<AppState>,
) -> Json<ApiResponse<ReminderRun>> {
    let report = state.reminders().run_tick(Utc::now()).await;
    match &report {
        Some(report) => {
            info!(sent = report.sent, "manual reminder tick finished")
        }
        None => {
            info!("manual reminder tick skipped: a tick is already running")
        }
    }
    Json(ApiResponse::success(ReminderRun {
        skipped: report.is_none(),
        report,
    }))
}
