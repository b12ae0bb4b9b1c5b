use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivateRequest {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResendActivationRequest {
    email: String,
}

pub async fn activate(
    State(state): State<AppState>,
    Json(body): Json<ActivateRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .account_service
        .activate(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

pub async fn resend_activation(
    State(state): State<AppState>,
    Json(body): Json<ResendActivationRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .account_service
        .resend_activation(&body.email)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
