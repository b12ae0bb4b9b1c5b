use auth::TokenPurpose;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshRequest {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub access_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    state
        .account_service
        .refresh(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|access_token| ApiSuccess::new(StatusCode::OK, RefreshResponseData { access_token }))
}

/// Omitting `token_type` accepts a token of any purpose.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateRequest {
    token: String,
    #[serde(default)]
    token_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateResponseData {
    pub user_id: String,
    pub role: String,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateRequest>,
) -> Result<ApiSuccess<ValidateResponseData>, ApiError> {
    let purpose = body
        .token_type
        .as_deref()
        .filter(|token_type| !token_type.is_empty())
        .map(str::parse::<TokenPurpose>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .account_service
        .validate(&body.token, purpose)
        .await
        .map_err(ApiError::from)
        .map(|identity| {
            ApiSuccess::new(
                StatusCode::OK,
                ValidateResponseData {
                    user_id: identity.user_id.to_string(),
                    role: identity.role,
                },
            )
        })
}
