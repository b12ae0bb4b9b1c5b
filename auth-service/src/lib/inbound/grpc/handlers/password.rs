use std::sync::Arc;

use tonic::Status;

use super::failure;
use super::STATUS_OK;
use crate::domain::account::models::ResetPasswordCommand;
use crate::domain::account::ports::AccountServicePort;
use crate::proto::ForgotPasswordRequest;
use crate::proto::ForgotPasswordResponse;
use crate::proto::ResetPasswordRequest;
use crate::proto::ResetPasswordResponse;

pub async fn forgot_password(
    service: Arc<dyn AccountServicePort>,
    request: ForgotPasswordRequest,
) -> Result<ForgotPasswordResponse, Status> {
    match service.forgot_password(&request.email).await {
        Ok(()) => Ok(ForgotPasswordResponse {
            status: STATUS_OK,
            error: String::new(),
        }),
        Err(e) => {
            let (status, error) = failure("forgot_password", e);
            Ok(ForgotPasswordResponse { status, error })
        }
    }
}

pub async fn reset_password(
    service: Arc<dyn AccountServicePort>,
    request: ResetPasswordRequest,
) -> Result<ResetPasswordResponse, Status> {
    let command = ResetPasswordCommand {
        token: request.token,
        password: request.password,
        confirm_password: request.confirm_password,
    };

    match service.reset_password(command).await {
        Ok(()) => Ok(ResetPasswordResponse {
            status: STATUS_OK,
            error: String::new(),
        }),
        Err(e) => {
            let (status, error) = failure("reset_password", e);
            Ok(ResetPasswordResponse { status, error })
        }
    }
}
