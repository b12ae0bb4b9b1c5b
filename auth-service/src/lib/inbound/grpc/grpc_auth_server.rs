use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::password;
use super::handlers::registration;
use super::handlers::session;
use super::handlers::users;
use crate::domain::account::ports::AccountServicePort;
use crate::proto::auth_service_server::AuthService as AuthServiceProto;
use crate::proto::ActivateRequest;
use crate::proto::ActivateResponse;
use crate::proto::ForgotPasswordRequest;
use crate::proto::ForgotPasswordResponse;
use crate::proto::GetUsersRequest;
use crate::proto::GetUsersResponse;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::RefreshTokenRequest;
use crate::proto::RefreshTokenResponse;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;
use crate::proto::ResendActivationTokenRequest;
use crate::proto::ResendActivationTokenResponse;
use crate::proto::ResetPasswordRequest;
use crate::proto::ResetPasswordResponse;
use crate::proto::ValidateRequest;
use crate::proto::ValidateResponse;

/// gRpc front of the account service.
///
/// Domain failures travel in the response `status`/`error` fields; a tonic
/// `Status` error only means the call never reached the service.
pub struct AuthGrpcService {
    service: Arc<dyn AccountServicePort>,
}

impl AuthGrpcService {
    pub fn new(service: Arc<dyn AccountServicePort>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl AuthServiceProto for AuthGrpcService {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let response = registration::register(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let response = session::login(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn activate(
        &self,
        request: Request<ActivateRequest>,
    ) -> Result<Response<ActivateResponse>, Status> {
        let response = registration::activate(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn resend_activation_token(
        &self,
        request: Request<ResendActivationTokenRequest>,
    ) -> Result<Response<ResendActivationTokenResponse>, Status> {
        let response =
            registration::resend_activation_token(self.service.clone(), request.into_inner())
                .await?;
        Ok(Response::new(response))
    }

    async fn forgot_password(
        &self,
        request: Request<ForgotPasswordRequest>,
    ) -> Result<Response<ForgotPasswordResponse>, Status> {
        let response = password::forgot_password(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn reset_password(
        &self,
        request: Request<ResetPasswordRequest>,
    ) -> Result<Response<ResetPasswordResponse>, Status> {
        let response = password::reset_password(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn refresh(
        &self,
        request: Request<RefreshTokenRequest>,
    ) -> Result<Response<RefreshTokenResponse>, Status> {
        let response = session::refresh(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn validate(
        &self,
        request: Request<ValidateRequest>,
    ) -> Result<Response<ValidateResponse>, Status> {
        let response = session::validate(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn get_users(
        &self,
        request: Request<GetUsersRequest>,
    ) -> Result<Response<GetUsersResponse>, Status> {
        let response = users::get_users(self.service.clone(), request.into_inner()).await?;
        Ok(Response::new(response))
    }
}
