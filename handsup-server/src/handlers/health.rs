use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::infra::api_response::ApiResponse;
use crate::infra::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub store: &'static str,
    pub reminders_enabled: bool,
    pub time: DateTime<Utc>,
}

pub async fn health_handler(
    State(state): State<AppState>,
) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        store: state.store().backend(),
        reminders_enabled: state.config().reminders.enabled,
        time: Utc::now(),
    }))
}
