use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use handsup_core::domain::event::parse_event_date;
use handsup_core::domain::{
    Assignment, Event, EventId, NewNotice, Notice, Urgency, Volunteer,
    VolunteerId, normalize_skills,
};
use handsup_core::matching::{self, RankedEvent, ScoreBreakdown};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::infra::api_response::ApiResponse;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct RankQuery {
    pub limit: Option<usize>,
}

/// Either stored ids or inline records to score.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScoreRequest {
    Ids(ScorePair),
    Inline(InlineScore),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePair {
    pub volunteer_id: VolunteerId,
    pub event_id: EventId,
}

#[derive(Debug, Deserialize)]
pub struct InlineScore {
    pub volunteer: InlineVolunteer,
    pub event: InlineEvent,
}

#[derive(Debug, Deserialize)]
pub struct InlineVolunteer {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineEvent {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub location: String,
    pub event_date: String,
    pub urgency: Option<Urgency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub volunteer_id: VolunteerId,
    pub event_id: EventId,
}

#[derive(Debug, Serialize)]
pub struct AssignOutcome {
    pub assignment: Assignment,
    /// `None` when the assignment was stored but the notice was not.
    pub notice: Option<Notice>,
}

/// Every event ranked for one volunteer, best match first.
pub async fn rank_handler(
    State(state): State<AppState>,
    Path(volunteer_id): Path<VolunteerId>,
    Query(query): Query<RankQuery>,
) -> AppResult<Json<ApiResponse<Vec<RankedEvent>>>> {
    let volunteer = state
        .store()
        .volunteers
        .get(volunteer_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("volunteer {volunteer_id} not found"))
        })?;
    let events = state.store().events.list().await?;

    let mut ranked = matching::rank_events(&volunteer, &events, Utc::now());
    if let Some(limit) = query.limit {
        ranked.truncate(limit);
    }
    Ok(Json(ApiResponse::success(ranked)))
}

pub async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> AppResult<Json<ApiResponse<ScoreBreakdown>>> {
    let now = Utc::now();
    let (volunteer, event) = match request {
        ScoreRequest::Ids(pair) => {
            let volunteer = state
                .store()
                .volunteers
                .get(pair.volunteer_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "volunteer {} not found",
                        pair.volunteer_id
                    ))
                })?;
            let event = state
                .store()
                .events
                .get(pair.event_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!(
                        "event {} not found",
                        pair.event_id
                    ))
                })?;
            (volunteer, event)
        }
        ScoreRequest::Inline(inline) => inline_records(inline)?,
    };

    Ok(Json(ApiResponse::success(matching::breakdown(
        &volunteer, &event, now,
    ))))
}

/// Assign a volunteer to an event and tell them about it.
pub async fn assign_handler(
    State(state): State<AppState>,
    Json(request): Json<AssignRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AssignOutcome>>)> {
    let store = state.store();
    let assignment = store
        .assignments
        .assign(request.volunteer_id, request.event_id)
        .await?;
    info!(
        assignment_id = %assignment.id,
        volunteer_id = %assignment.volunteer_id,
        event_id = %assignment.event_id,
        "volunteer assigned"
    );

    let event = store.events.get(assignment.event_id).await?.ok_or_else(|| {
        AppError::not_found(format!("event {} not found", assignment.event_id))
    })?;

    let notice = match state
        .notices()
        .create(NewNotice::assigned(assignment.volunteer_id, &event))
        .await
    {
        Ok(notice) => Some(notice),
        Err(err) => {
            warn!(
                volunteer_id = %assignment.volunteer_id,
                event_id = %event.id,
                error = %err,
                "assignment stored but its notice was not"
            );
            None
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AssignOutcome { assignment, notice })),
    ))
}

fn inline_records(inline: InlineScore) -> AppResult<(Volunteer, Event)> {
    let now = Utc::now();
    let volunteer = Volunteer {
        id: VolunteerId(0),
        name: String::new(),
        location: inline.volunteer.location.trim().to_string(),
        skills: normalize_skills(&inline.volunteer.skills),
        preferences: None,
        availability: Vec::new(),
        updated_at: now,
    };
    let event = Event {
        id: EventId(0),
        name: String::new(),
        description: String::new(),
        location: inline.event.location.trim().to_string(),
        required_skills: normalize_skills(&inline.event.required_skills),
        date: parse_event_date(&inline.event.event_date)?,
        urgency: inline.event.urgency.unwrap_or_default(),
        created_at: now,
    };
    Ok((volunteer, event))
}
