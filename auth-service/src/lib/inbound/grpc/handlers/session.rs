use std::sync::Arc;

use auth::TokenPurpose;
use tonic::Status;

use super::failure;
use super::STATUS_OK;
use crate::account::errors::AccountError;
use crate::domain::account::ports::AccountServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::RefreshTokenRequest;
use crate::proto::RefreshTokenResponse;
use crate::proto::ValidateRequest;
use crate::proto::ValidateResponse;

pub async fn login(
    service: Arc<dyn AccountServicePort>,
    request: LoginRequest,
) -> Result<LoginResponse, Status> {
    match service.login(&request.email, &request.password).await {
        Ok(tokens) => Ok(LoginResponse {
            status: STATUS_OK,
            error: String::new(),
            token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user_id: tokens.user_id.to_string(),
        }),
        Err(e) => {
            let (status, error) = failure("login", e);
            Ok(LoginResponse {
                status,
                error,
                ..Default::default()
            })
        }
    }
}

pub async fn refresh(
    service: Arc<dyn AccountServicePort>,
    request: RefreshTokenRequest,
) -> Result<RefreshTokenResponse, Status> {
    match service.refresh(&request.refresh_token).await {
        Ok(token) => Ok(RefreshTokenResponse {
            status: STATUS_OK,
            error: String::new(),
            token,
        }),
        Err(e) => {
            let (status, error) = failure("refresh", e);
            Ok(RefreshTokenResponse {
                status,
                error,
                ..Default::default()
            })
        }
    }
}

/// An empty `token_type` accepts a token of any purpose.
pub async fn validate(
    service: Arc<dyn AccountServicePort>,
    request: ValidateRequest,
) -> Result<ValidateResponse, Status> {
    let purpose = if request.token_type.is_empty() {
        None
    } else {
        match request.token_type.parse::<TokenPurpose>() {
            Ok(purpose) => Some(purpose),
            Err(e) => {
                let (status, error) = failure("validate", AccountError::from(e));
                return Ok(ValidateResponse {
                    status,
                    error,
                    ..Default::default()
                });
            }
        }
    };

    match service.validate(&request.token, purpose).await {
        Ok(identity) => Ok(ValidateResponse {
            status: STATUS_OK,
            error: String::new(),
            user_id: identity.user_id.to_string(),
            role: identity.role,
        }),
        Err(e) => {
            let (status, error) = failure("validate", e);
            Ok(ValidateResponse {
                status,
                error,
                ..Default::default()
            })
        }
    }
}
