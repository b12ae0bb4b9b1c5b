use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for persistence operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Error for outbound mail delivery
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    #[error("Mail provider rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// Top-level error for account lifecycle operations.
///
/// Each variant is one caller-facing category; the payload is the message
/// returned to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    /// Duplicate email
    #[error("{0}")]
    Conflict(String),

    /// No matching user or email
    #[error("{0}")]
    NotFound(String),

    /// Account state does not allow the operation
    #[error("{0}")]
    Forbidden(String),

    /// Malformed input, or a token that is malformed, expired or of the wrong purpose
    #[error("{0}")]
    BadRequest(String),

    /// Hashing, persistence, token signing or mail transport failure
    #[error("{0}")]
    Internal(String),
}

impl AccountError {
    pub fn internal(context: &str, source: impl std::fmt::Display) -> Self {
        AccountError::Internal(format!("{}: {}", context, source))
    }
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::EncodingFailed(_) => AccountError::internal("Generate token failed", err),
            TokenError::MalformedToken(_)
            | TokenError::SignatureInvalid
            | TokenError::TokenExpired
            | TokenError::PurposeMismatch { .. }
            | TokenError::UnknownPurpose(_) => AccountError::BadRequest(err.to_string()),
        }
    }
}

impl From<RepositoryError> for AccountError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::EmailAlreadyExists(_) => {
                AccountError::Conflict("Email already exists".to_string())
            }
            RepositoryError::NotFound(_) => AccountError::NotFound(err.to_string()),
            RepositoryError::Database(_) => AccountError::Internal(err.to_string()),
        }
    }
}

impl From<PasswordError> for AccountError {
    fn from(err: PasswordError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

impl From<UserIdError> for AccountError {
    fn from(err: UserIdError) -> Self {
        AccountError::BadRequest(format!("Invalid user ID: {}", err))
    }
}

impl From<EmailError> for AccountError {
    fn from(err: EmailError) -> Self {
        AccountError::BadRequest(format!("Invalid email: {}", err))
    }
}
