mod common;

use auth_service::domain::account::models::MailTemplate;
use auth_service::proto::auth_service_server::AuthService;
use auth_service::proto::ActivateRequest;
use auth_service::proto::ForgotPasswordRequest;
use auth_service::proto::GetUsersRequest;
use auth_service::proto::LoginRequest;
use auth_service::proto::RefreshTokenRequest;
use auth_service::proto::RegisterRequest;
use auth_service::proto::ResendActivationTokenRequest;
use auth_service::proto::ResetPasswordRequest;
use auth_service::proto::ValidateRequest;
use common::TestContext;
use tonic::Request;

const EMAIL: &str = "nicola@example.com";
const PASSWORD: &str = "pass_word!";

fn register_request(email: &str) -> Request<RegisterRequest> {
    Request::new(RegisterRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Nicola".to_string(),
        last_name: "Di Bernardo".to_string(),
    })
}

#[tokio::test]
async fn test_grpc_lifecycle() {
    let ctx = TestContext::new();
    let grpc = ctx.grpc();

    let registered = grpc.register(register_request(EMAIL)).await.unwrap().into_inner();
    assert_eq!(registered.status, 201);
    assert!(registered.error.is_empty());
    assert!(!registered.user_id.is_empty());

    let token = ctx.mailer.last_token(EMAIL, MailTemplate::Register).unwrap();
    let activated = grpc
        .activate(Request::new(ActivateRequest { token }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(activated.status, 200);

    let login = grpc
        .login(Request::new(LoginRequest {
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(login.status, 200);
    assert_eq!(login.user_id, registered.user_id);

    let refreshed = grpc
        .refresh(Request::new(RefreshTokenRequest {
            refresh_token: login.refresh_token.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(refreshed.status, 200);
    assert_ne!(refreshed.token, login.token);

    let validated = grpc
        .validate(Request::new(ValidateRequest {
            token: refreshed.token,
            token_type: "ACCESS_TOKEN".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(validated.status, 200);
    assert_eq!(validated.user_id, registered.user_id);

    let users = grpc
        .get_users(Request::new(GetUsersRequest {
            user_id: registered.user_id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(users.status, 200);
    assert_eq!(users.users.len(), 1);
    assert_eq!(users.users[0].name, "Nicola Di Bernardo");
}

#[tokio::test]
async fn test_grpc_register_statuses() {
    let ctx = TestContext::new();
    let grpc = ctx.grpc();

    grpc.register(register_request(EMAIL)).await.unwrap();
    let duplicate = grpc.register(register_request(EMAIL)).await.unwrap().into_inner();
    assert_eq!(duplicate.status, 409);
    assert_eq!(duplicate.error, "Email already exists");

    let invalid = grpc
        .register(register_request("not-an-email"))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(invalid.status, 400);
}

#[tokio::test]
async fn test_grpc_login_statuses() {
    let ctx = TestContext::new();
    let grpc = ctx.grpc();
    grpc.register(register_request(EMAIL)).await.unwrap();

    let unconfirmed = grpc
        .login(Request::new(LoginRequest {
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(unconfirmed.status, 403);
    assert!(unconfirmed.token.is_empty());

    let unknown = grpc
        .login(Request::new(LoginRequest {
            email: "ghost@example.com".to_string(),
            password: PASSWORD.to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(unknown.status, 404);
    assert_eq!(unknown.error, "Incorrect email or password");
}

#[tokio::test]
async fn test_grpc_validate_token_types() {
    let ctx = TestContext::new();
    let grpc = ctx.grpc();
    grpc.register(register_request(EMAIL)).await.unwrap();
    let activation = ctx.mailer.last_token(EMAIL, MailTemplate::Register).unwrap();

    let as_access = grpc
        .validate(Request::new(ValidateRequest {
            token: activation.clone(),
            token_type: "ACCESS_TOKEN".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(as_access.status, 400);

    let any = grpc
        .validate(Request::new(ValidateRequest {
            token: activation.clone(),
            token_type: String::new(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(any.status, 200);

    let as_generic = grpc
        .validate(Request::new(ValidateRequest {
            token: activation.clone(),
            token_type: "GENERIC".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(as_generic.status, 200);
    assert!(!as_generic.user_id.is_empty());

    let unknown_type = grpc
        .validate(Request::new(ValidateRequest {
            token: activation,
            token_type: "SESSION".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(unknown_type.status, 400);
}

#[tokio::test]
async fn test_grpc_password_reset() {
    let ctx = TestContext::new();
    let grpc = ctx.grpc();
    grpc.register(register_request(EMAIL)).await.unwrap();

    let forgot_unconfirmed = grpc
        .forgot_password(Request::new(ForgotPasswordRequest {
            email: EMAIL.to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(forgot_unconfirmed.status, 403);

    let resent = grpc
        .resend_activation_token(Request::new(ResendActivationTokenRequest {
            email: EMAIL.to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(resent.status, 200);
    let token = ctx.mailer.last_token(EMAIL, MailTemplate::Register).unwrap();
    grpc.activate(Request::new(ActivateRequest { token }))
        .await
        .unwrap();

    let forgot = grpc
        .forgot_password(Request::new(ForgotPasswordRequest {
            email: EMAIL.to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(forgot.status, 200);
    let token = ctx.mailer.last_token(EMAIL, MailTemplate::Forgot).unwrap();

    let mismatch = grpc
        .reset_password(Request::new(ResetPasswordRequest {
            token: token.clone(),
            password: "new_pass".to_string(),
            confirm_password: "other".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(mismatch.status, 403);
    assert_eq!(
        mismatch.error,
        "Confirmation password does not match password"
    );

    let reset = grpc
        .reset_password(Request::new(ResetPasswordRequest {
            token,
            password: "new_pass".to_string(),
            confirm_password: "new_pass".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(reset.status, 200);
}

#[tokio::test]
async fn test_grpc_get_users_statuses() {
    let ctx = TestContext::new();
    let grpc = ctx.grpc();
    let registered = grpc.register(register_request(EMAIL)).await.unwrap().into_inner();

    let unconfirmed = grpc
        .get_users(Request::new(GetUsersRequest {
            user_id: registered.user_id,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(unconfirmed.status, 403);

    let malformed = grpc
        .get_users(Request::new(GetUsersRequest {
            user_id: "not-a-uuid".to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(malformed.status, 400);

    let unknown = grpc
        .get_users(Request::new(GetUsersRequest {
            user_id: uuid::Uuid::new_v4().to_string(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(unknown.status, 404);
    assert_eq!(unknown.error, "No such user");
}
