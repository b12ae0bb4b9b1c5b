use async_trait::async_trait;
use auth::TokenPurpose;

use crate::account::errors::AccountError;
use crate::account::errors::MailError;
use crate::account::errors::RepositoryError;
use crate::domain::account::models::Identity;
use crate::domain::account::models::LoginTokens;
use crate::domain::account::models::MailTemplate;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::ResetPasswordCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;
use crate::domain::account::models::UserSummary;

/// Port for account lifecycle operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Create an unconfirmed account and mail it an activation link.
    ///
    /// # Returns
    /// ID of the created user
    ///
    /// # Errors
    /// * `Conflict` - Email is already registered
    /// * `Internal` - Hashing, persistence, token signing or mail dispatch failed.
    ///   A failure after persistence leaves the account created but
    ///   unconfirmed; retry with `resend_activation`, not `register`.
    async fn register(&self, command: RegisterCommand) -> Result<UserId, AccountError>;

    /// Check credentials and hand out an access/refresh token pair.
    ///
    /// # Errors
    /// * `NotFound` - Unknown email or wrong password (same message for both)
    /// * `Forbidden` - Account not yet confirmed
    async fn login(&self, email: &str, password: &str) -> Result<LoginTokens, AccountError>;

    /// Confirm the account named by an activation token.
    ///
    /// # Errors
    /// * `BadRequest` - Token malformed, expired or not an activation token
    /// * `NotFound` - Token subject no longer exists
    async fn activate(&self, token: &str) -> Result<(), AccountError>;

    /// Mail a fresh activation link, whatever the current confirmation state.
    ///
    /// # Errors
    /// * `NotFound` - Email was never registered
    /// * `Internal` - Token signing or mail dispatch failed
    async fn resend_activation(&self, email: &str) -> Result<(), AccountError>;

    /// Mail a password reset link to a confirmed account.
    ///
    /// # Errors
    /// * `NotFound` - Email was never registered
    /// * `Forbidden` - Account not yet confirmed
    /// * `Internal` - Token signing or mail dispatch failed
    async fn forgot_password(&self, email: &str) -> Result<(), AccountError>;

    /// Replace the password of the account named by a reset token.
    ///
    /// # Errors
    /// * `BadRequest` - Token malformed, expired or not a reset token
    /// * `NotFound` - Token subject no longer exists
    /// * `Forbidden` - Password and confirmation differ
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AccountError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// * `BadRequest` - Token malformed, expired or not a refresh token
    /// * `NotFound` - Token subject no longer exists
    async fn refresh(&self, refresh_token: &str) -> Result<String, AccountError>;

    /// Check a token for `purpose` (any purpose when `None`) and that its subject exists.
    ///
    /// # Errors
    /// * `BadRequest` - Token malformed, expired or of the wrong purpose
    /// * `NotFound` - Token subject no longer exists
    async fn validate(
        &self,
        token: &str,
        purpose: Option<TokenPurpose>,
    ) -> Result<Identity, AccountError>;

    /// List every confirmed user on behalf of `requester`.
    ///
    /// # Errors
    /// * `NotFound` - Requester does not exist
    /// * `Forbidden` - Requester is not confirmed
    async fn list_confirmed_users(
        &self,
        requester: &UserId,
    ) -> Result<Vec<UserSummary>, AccountError>;
}

/// Persistence operations for the user aggregate.
///
/// Implementations must make `create` atomic with respect to the email
/// uniqueness check, and updates single-row atomic.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Persist a new user, stamping its timestamps.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Database` - Storage failure
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Storage failure
    async fn update_confirmed(&self, id: &UserId, confirmed: bool) -> Result<(), RepositoryError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Database` - Storage failure
    async fn update_password(&self, id: &UserId, password_hash: &str)
        -> Result<(), RepositoryError>;

    /// Every user with `confirmed = true`.
    async fn list_confirmed(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Outbound mail delivery.
#[async_trait]
pub trait MailDispatcher: Send + Sync + 'static {
    /// Send `template` to `to_email`, embedding `token` in its link.
    async fn send(
        &self,
        to_name: &str,
        to_email: &str,
        subject: &str,
        template: MailTemplate,
        token: &str,
    ) -> Result<(), MailError>;
}
