use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use handsup_core::domain::{AccountId, Role, VolunteerId};
use tracing::debug;

use super::jwt::TokenError;
use crate::infra::api_response::ApiResponse;
use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};

/// The caller behind a validated bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub account_id: AccountId,
    pub volunteer_id: VolunteerId,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Volunteers may only touch their own records; admins may touch any.
    pub fn ensure_can_access(
        &self,
        volunteer_id: VolunteerId,
    ) -> AppResult<()> {
        if self.is_admin() || self.volunteer_id == volunteer_id {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "not allowed to access another volunteer's records",
            ))
        }
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let claims = state.jwt().validate(token).map_err(|err| match err {
        TokenError::Expired => AppError::unauthorized("token expired"),
        other => {
            debug!(error = %other, "rejected bearer token");
            AppError::unauthorized("invalid token")
        }
    })?;

    // The account row is the source of truth for the role.
    let account = state
        .store()
        .accounts
        .get(claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("account no longer exists"))?;

    request.extensions_mut().insert(AuthUser {
        account_id: account.id,
        volunteer_id: account.volunteer_id,
        role: account.role,
    });
    Ok(next.run(request).await)
}

/// Must sit inside [`auth_middleware`] in the layer stack.
pub async fn require_admin(request: Request, next: Next) -> Response {
    let user = match request.extensions().get::<AuthUser>() {
        Some(user) => user,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(
                    "Authentication required".to_string(),
                )),
            )
                .into_response();
        }
    };

    if !user.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::error("Admin access required".to_string())),
        )
            .into_response();
    }

    next.run(request).await
}

fn extract_bearer_token(request: &Request) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("missing bearer token"))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized("missing bearer token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            account_id: AccountId(1),
            volunteer_id: VolunteerId(10),
            role,
        }
    }

    #[test]
    fn volunteers_only_reach_their_own_records() {
        let volunteer = user(Role::Volunteer);
        assert!(volunteer.ensure_can_access(VolunteerId(10)).is_ok());
        let err = volunteer.ensure_can_access(VolunteerId(11)).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn admins_reach_everything() {
        assert!(user(Role::Admin).ensure_can_access(VolunteerId(99)).is_ok());
    }
}
