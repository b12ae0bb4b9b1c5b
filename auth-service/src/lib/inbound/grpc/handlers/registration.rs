use std::sync::Arc;

use tonic::Status;

use super::failure;
use super::STATUS_CREATED;
use super::STATUS_OK;
use crate::account::errors::AccountError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::ports::AccountServicePort;
use crate::proto::ActivateRequest;
use crate::proto::ActivateResponse;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;
use crate::proto::ResendActivationTokenRequest;
use crate::proto::ResendActivationTokenResponse;

pub async fn register(
    service: Arc<dyn AccountServicePort>,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    let command = match EmailAddress::new(request.email) {
        Ok(email) => RegisterCommand::new(
            email,
            request.first_name,
            request.last_name,
            request.password,
        ),
        Err(e) => {
            let (status, error) = failure("register", AccountError::from(e));
            return Ok(RegisterResponse {
                status,
                error,
                ..Default::default()
            });
        }
    };

    match service.register(command).await {
        Ok(user_id) => Ok(RegisterResponse {
            status: STATUS_CREATED,
            user_id: user_id.to_string(),
            ..Default::default()
        }),
        Err(e) => {
            let (status, error) = failure("register", e);
            Ok(RegisterResponse {
                status,
                error,
                ..Default::default()
            })
        }
    }
}

pub async fn activate(
    service: Arc<dyn AccountServicePort>,
    request: ActivateRequest,
) -> Result<ActivateResponse, Status> {
    match service.activate(&request.token).await {
        Ok(()) => Ok(ActivateResponse {
            status: STATUS_OK,
            error: String::new(),
        }),
        Err(e) => {
            let (status, error) = failure("activate", e);
            Ok(ActivateResponse { status, error })
        }
    }
}

pub async fn resend_activation_token(
    service: Arc<dyn AccountServicePort>,
    request: ResendActivationTokenRequest,
) -> Result<ResendActivationTokenResponse, Status> {
    match service.resend_activation(&request.email).await {
        Ok(()) => Ok(ResendActivationTokenResponse {
            status: STATUS_OK,
            error: String::new(),
        }),
        Err(e) => {
            let (status, error) = failure("resend_activation_token", e);
            Ok(ResendActivationTokenResponse { status, error })
        }
    }
}
