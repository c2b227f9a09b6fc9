use axum::{
    Extension, Json,
    extract::{Path, State},
};
use handsup_core::domain::{Volunteer, VolunteerId, VolunteerProfile};
use tracing::info;

use crate::auth::AuthUser;
use crate::infra::api_response::ApiResponse;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};

pub async fn get_profile_handler(
    State(state): State<AppState>,
    Path(volunteer_id): Path<VolunteerId>,
) -> AppResult<Json<ApiResponse<Volunteer>>> {
    let volunteer = state
        .store()
        .volunteers
        .get(volunteer_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("volunteer {volunteer_id} not found"))
        })?;
    Ok(Json(ApiResponse::success(volunteer)))
}

/// Create or replace a profile. Serves both `POST` and `PUT`.
pub async fn upsert_profile_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(volunteer_id): Path<VolunteerId>,
    Json(profile): Json<VolunteerProfile>,
) -> AppResult<Json<ApiResponse<Volunteer>>> {
    user.ensure_can_access(volunteer_id)?;

    let draft = profile.validate()?;
    let volunteer = state.store().volunteers.upsert(volunteer_id, draft).await?;
    info!(volunteer_id = %volunteer.id, "profile saved");
    Ok(Json(ApiResponse::success(volunteer)))
}
