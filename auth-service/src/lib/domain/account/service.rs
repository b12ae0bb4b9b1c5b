use std::sync::Arc;

use async_trait::async_trait;
use auth::GenericIntent;
use auth::PasswordHasher;
use auth::TokenAuthority;
use auth::TokenPurpose;

use crate::account::errors::AccountError;
use crate::account::ports::AccountServicePort;
use crate::account::ports::MailDispatcher;
use crate::account::ports::UserRepository;
use crate::domain::account::models::Identity;
use crate::domain::account::models::LoginTokens;
use crate::domain::account::models::MailTemplate;
use crate::domain::account::models::NewUser;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::ResetPasswordCommand;
use crate::domain::account::models::User;
use crate::domain::account::models::UserId;
use crate::domain::account::models::UserSummary;

/// Returned for both an unknown email and a wrong password.
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password";

/// Account lifecycle service.
///
/// Moves accounts from unconfirmed to confirmed, runs the password reset
/// flow, and mints or checks tokens on the way. Holds no mutable state of
/// its own; the repository is the only shared mutable resource.
pub struct AccountService<UR, MD>
where
    UR: UserRepository,
    MD: MailDispatcher,
{
    repository: Arc<UR>,
    mailer: Arc<MD>,
    authority: Arc<TokenAuthority>,
    password_hasher: PasswordHasher,
}

impl<UR, MD> AccountService<UR, MD>
where
    UR: UserRepository,
    MD: MailDispatcher,
{
    pub fn new(repository: Arc<UR>, mailer: Arc<MD>, authority: Arc<TokenAuthority>) -> Self {
        Self {
            repository,
            mailer,
            authority,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Issue a generic token for `intent` and mail it to `user`.
    async fn send_link(
        &self,
        user: &User,
        intent: GenericIntent,
        template: MailTemplate,
    ) -> Result<(), AccountError> {
        let token = self
            .authority
            .issue_generic(user.id.0, user.email.as_str(), &user.role, intent)
            .map_err(|e| AccountError::internal("Generate token failed", e))?;

        self.mailer
            .send(
                &user.first_name,
                user.email.as_str(),
                template.subject(),
                template,
                &token,
            )
            .await
            .map_err(|e| match template {
                MailTemplate::Register => {
                    AccountError::internal("Sending email activation failed", e)
                }
                MailTemplate::Forgot => AccountError::internal(
                    "Sending email for retrieving password failed",
                    e,
                ),
            })
    }
}

#[async_trait]
impl<UR, MD> AccountServicePort for AccountService<UR, MD>
where
    UR: UserRepository,
    MD: MailDispatcher,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserId, AccountError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AccountError::Conflict("Email already exists".to_string()));
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| AccountError::internal("Password hashing failed", e))?;

        let user = self
            .repository
            .create(NewUser {
                id: UserId::new(),
                first_name: command.first_name,
                last_name: command.last_name,
                email: command.email,
                password_hash,
                role: String::new(),
                confirmed: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Account registered");

        self.send_link(&user, GenericIntent::Activation, MailTemplate::Register)
            .await?;

        Ok(user.id)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginTokens, AccountError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            // Unknown email costs the same Argon2 work as a wrong password.
            self.password_hasher.verify_absent(password);
            return Err(AccountError::NotFound(INVALID_CREDENTIALS.to_string()));
        };

        if !self.password_hasher.verify(password, &user.password_hash) {
            return Err(AccountError::NotFound(INVALID_CREDENTIALS.to_string()));
        }

        if !user.confirmed {
            return Err(AccountError::Forbidden("User not yet confirmed".to_string()));
        }

        let access_token =
            self.authority
                .issue_access(user.id.0, user.email.as_str(), &user.role)?;
        let refresh_token =
            self.authority
                .issue_refresh(user.id.0, user.email.as_str(), &user.role)?;

        tracing::debug!(user_id = %user.id, "Login succeeded");

        Ok(LoginTokens {
            access_token,
            refresh_token,
            user_id: user.id,
        })
    }

    async fn activate(&self, token: &str) -> Result<(), AccountError> {
        let claims = self
            .authority
            .validate(token, Some(TokenPurpose::ACTIVATION))?;

        let user = self
            .repository
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| AccountError::NotFound("Token does not belong to a user".to_string()))?;

        self.repository.update_confirmed(&user.id, true).await?;

        tracing::info!(user_id = %user.id, "Account activated");

        Ok(())
    }

    async fn resend_activation(&self, email: &str) -> Result<(), AccountError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AccountError::NotFound("Email was never registered".to_string()))?;

        self.send_link(&user, GenericIntent::Activation, MailTemplate::Register)
            .await
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AccountError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AccountError::NotFound("Email was never registered".to_string()))?;

        if !user.confirmed {
            return Err(AccountError::Forbidden(
                "Email was never activated".to_string(),
            ));
        }

        self.send_link(&user, GenericIntent::PasswordReset, MailTemplate::Forgot)
            .await
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AccountError> {
        let claims = self
            .authority
            .validate(&command.token, Some(TokenPurpose::PASSWORD_RESET))?;

        let user = self
            .repository
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| AccountError::NotFound("Email was never registered".to_string()))?;

        if command.password != command.confirm_password {
            return Err(AccountError::Forbidden(
                "Confirmation password does not match password".to_string(),
            ));
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| AccountError::internal("Password hashing failed", e))?;

        self.repository
            .update_password(&user.id, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset");

        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AccountError> {
        let claims = self
            .authority
            .validate(refresh_token, Some(TokenPurpose::Refresh))?;

        let user = self
            .repository
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| AccountError::NotFound("User not found".to_string()))?;

        Ok(self
            .authority
            .issue_access(user.id.0, user.email.as_str(), &user.role)?)
    }

    async fn validate(
        &self,
        token: &str,
        purpose: Option<TokenPurpose>,
    ) -> Result<Identity, AccountError> {
        let claims = self.authority.validate(token, purpose)?;
        let user_id = UserId(claims.sub);

        if self.repository.find_by_id(&user_id).await?.is_none() {
            return Err(AccountError::NotFound("User not found".to_string()));
        }

        Ok(Identity {
            user_id,
            role: claims.role,
        })
    }

    async fn list_confirmed_users(
        &self,
        requester: &UserId,
    ) -> Result<Vec<UserSummary>, AccountError> {
        let requester = self
            .repository
            .find_by_id(requester)
            .await?
            .ok_or_else(|| AccountError::NotFound("No such user".to_string()))?;

        if !requester.confirmed {
            return Err(AccountError::Forbidden(
                "Only confirmed users can query users".to_string(),
            ));
        }

        let users = self.repository.list_confirmed().await?;

        Ok(users.iter().map(UserSummary::from).collect())
    }
}
