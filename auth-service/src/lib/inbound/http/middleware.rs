use auth::TokenPurpose;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::account::errors::AccountError;
use crate::domain::account::models::UserId;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: String,
}

/// Middleware that accepts only ACCESS tokens whose subject still exists
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req).map_err(IntoResponse::into_response)?;

    let identity = state
        .account_service
        .validate(token, Some(TokenPurpose::Access))
        .await
        .map_err(|e| rejection(e).into_response())?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: identity.user_id,
        role: identity.role,
    });

    Ok(next.run(req).await)
}

/// Any validation failure other than an internal one reads as a bad credential.
fn rejection(err: AccountError) -> ApiError {
    match err {
        AccountError::Internal(msg) => ApiError::InternalServerError(msg),
        other => ApiError::Unauthorized(format!("Invalid or expired token: {}", other)),
    }
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
    })
}
