use thiserror::Error;

use super::claims::TokenPurpose;

/// Error type for token operations.
///
/// Expiry is kept apart from signature and decoding failures so callers can
/// suggest a different remedy (request a new link vs. log in again).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token purpose mismatch: expected {expected}, found {found}")]
    PurposeMismatch { expected: TokenPurpose, found: String },

    #[error("Unknown token purpose: {0}")]
    UnknownPurpose(String),
}
