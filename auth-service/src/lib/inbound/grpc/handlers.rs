use crate::account::errors::AccountError;
use crate::domain::account::models::UserSummary;

pub mod password;
pub mod registration;
pub mod session;
pub mod users;

pub const STATUS_OK: i64 = 200;
pub const STATUS_CREATED: i64 = 201;

/// HTTP-style status code carried in every response payload.
pub fn status_code(err: &AccountError) -> i64 {
    match err {
        AccountError::BadRequest(_) => 400,
        AccountError::Forbidden(_) => 403,
        AccountError::NotFound(_) => 404,
        AccountError::Conflict(_) => 409,
        AccountError::Internal(_) => 500,
    }
}

/// Log a failed call and turn it into the `(status, error)` pair of a response.
pub fn failure(operation: &'static str, err: AccountError) -> (i64, String) {
    let status = status_code(&err);
    if status >= 500 {
        tracing::error!(operation, status, error = %err, "gRpc request failed");
    } else {
        tracing::warn!(operation, status, error = %err, "gRpc request rejected");
    }
    (status, err.to_string())
}

impl From<UserSummary> for crate::proto::User {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            role: user.role,
        }
    }
}
