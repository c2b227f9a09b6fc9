use std::fmt;

use axum::{Json, extract::State, http::StatusCode};
use handsup_core::auth::{hash_password, verify_password};
use handsup_core::domain::{
    Account, NewAccount, Role, Volunteer, VolunteerProfile, normalize_email,
};
use handsup_core::CoreError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::infra::api_response::ApiResponse;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: VolunteerProfile,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub account: Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer: Option<Volunteer>,
}

/// Create an account and its volunteer profile, then sign a token.
///
/// The first account on an empty store becomes the admin.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthToken>>)> {
    let email = normalize_email(&request.email)?;
    let profile = request.profile.validate()?;
    let password_hash = hash_password(&request.password)?;

    let accounts = &state.store().accounts;
    let role = if accounts.count().await? == 0 {
        Role::Admin
    } else {
        Role::Volunteer
    };

    let (account, volunteer) = accounts
        .create_account(NewAccount {
            email,
            password_hash,
            role,
            profile,
        })
        .await?;

    info!(
        account_id = %account.id,
        volunteer_id = %volunteer.id,
        role = %account.role,
        "account registered"
    );

    let token = sign(&state, account, Some(volunteer))?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(token))))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthToken>>> {
    let email = normalize_email(&request.email)
        .map_err(|_| AppError::from(CoreError::InvalidCredentials))?;

    let account = state
        .store()
        .accounts
        .find_by_email(&email)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;
    verify_password(&request.password, &account.password_hash)?;

    let volunteer = state.store().volunteers.get(account.volunteer_id).await?;
    info!(account_id = %account.id, "login succeeded");

    let token = sign(&state, account, volunteer)?;
    Ok(Json(ApiResponse::success(token)))
}

fn sign(
    state: &AppState,
    account: Account,
    volunteer: Option<Volunteer>,
) -> AppResult<AuthToken> {
    let issued = state
        .jwt()
        .issue(&account)
        .map_err(|e| AppError::internal(e.to_string()))?;
    Ok(AuthToken {
        token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
        account,
        volunteer,
    })
}
