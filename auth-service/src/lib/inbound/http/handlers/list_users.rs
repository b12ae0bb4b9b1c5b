use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::UserSummary;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    state
        .account_service
        .list_confirmed_users(&requester.user_id)
        .await
        .map_err(ApiError::from)
        .map(|users| ApiSuccess::new(StatusCode::OK, users.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub role: String,
}

impl From<UserSummary> for UserData {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            role: user.role,
        }
    }
}
