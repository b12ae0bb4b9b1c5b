use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::jwt::GenericIntent;
use crate::jwt::TokenClaims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::TokenKind;
use crate::jwt::TokenPurpose;

/// Signing secret and lifetime for one token kind.
#[derive(Clone)]
pub struct PurposeSettings {
    secret: Vec<u8>,
    ttl: Duration,
}

impl PurposeSettings {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for PurposeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurposeSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Longest lifetime any token kind may be configured with.
pub const MAX_TTL: Duration = Duration::days(3650);

/// Error for an unusable authority configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenAuthorityConfigError {
    #[error("Secret for {0} tokens is empty")]
    EmptySecret(&'static str),

    #[error("Lifetime for {0} tokens must be positive")]
    NonPositiveTtl(&'static str),

    #[error("Lifetime for {0} tokens exceeds the maximum of 3650 days")]
    TtlTooLarge(&'static str),
}

/// Per-purpose secrets and lifetimes, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct TokenAuthorityConfig {
    issuer: String,
    access: PurposeSettings,
    refresh: PurposeSettings,
    generic: PurposeSettings,
}

impl TokenAuthorityConfig {
    /// Build a configuration, rejecting empty secrets and non-positive lifetimes.
    ///
    /// # Errors
    /// * `EmptySecret` - a purpose has no secret
    /// * `NonPositiveTtl` - a purpose has a zero or negative lifetime
    /// * `TtlTooLarge` - a purpose's lifetime is longer than [`MAX_TTL`]
    pub fn new(
        issuer: impl Into<String>,
        access: PurposeSettings,
        refresh: PurposeSettings,
        generic: PurposeSettings,
    ) -> Result<Self, TokenAuthorityConfigError> {
        for (kind, settings) in [
            (TokenKind::Access, &access),
            (TokenKind::Refresh, &refresh),
            (TokenKind::Generic, &generic),
        ] {
            if settings.secret.is_empty() {
                return Err(TokenAuthorityConfigError::EmptySecret(kind.as_str()));
            }
            if settings.ttl <= Duration::zero() {
                return Err(TokenAuthorityConfigError::NonPositiveTtl(kind.as_str()));
            }
            if settings.ttl > MAX_TTL {
                return Err(TokenAuthorityConfigError::TtlTooLarge(kind.as_str()));
            }
        }

        Ok(Self {
            issuer: issuer.into(),
            access,
            refresh,
            generic,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn settings(&self, kind: TokenKind) -> &PurposeSettings {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
            TokenKind::Generic => &self.generic,
        }
    }
}

/// Issues and validates access, refresh and generic (emailed link) tokens.
///
/// Every kind is signed with its own secret, and validation for a given
/// purpose rejects tokens carrying any other purpose tag, so a refresh token
/// is never accepted where an access token is expected and an activation
/// link never authorizes a password reset.
pub struct TokenAuthority {
    config: TokenAuthorityConfig,
    codec: TokenCodec,
}

impl TokenAuthority {
    /// Authority backed by the system clock.
    pub fn new(config: TokenAuthorityConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TokenAuthorityConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            codec: TokenCodec::new(clock),
        }
    }

    pub fn config(&self) -> &TokenAuthorityConfig {
        &self.config
    }

    /// Short-lived proof of identity.
    pub fn issue_access(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, TokenError> {
        self.issue(TokenPurpose::Access, user_id, email, role)
    }

    /// Long-lived token exchanged for new access tokens.
    pub fn issue_refresh(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, TokenError> {
        self.issue(TokenPurpose::Refresh, user_id, email, role)
    }

    /// Token for an emailed activation or password-reset link.
    pub fn issue_generic(
        &self,
        user_id: Uuid,
        email: &str,
        role: &str,
        intent: GenericIntent,
    ) -> Result<String, TokenError> {
        self.issue(TokenPurpose::Generic(intent), user_id, email, role)
    }

    fn issue(
        &self,
        purpose: TokenPurpose,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, TokenError> {
        let settings = self.config.settings(purpose.kind());
        let claims =
            TokenClaims::new(user_id, email, role, purpose).with_issuer(self.config.issuer());

        self.codec.issue(claims, &settings.secret, settings.ttl)
    }

    /// Validate `token` for `expected`.
    ///
    /// With `Some(purpose)` the token must verify under that purpose's secret,
    /// be unexpired, and carry that purpose tag. With `None` any configured
    /// secret may verify it and the tag is not checked.
    ///
    /// # Errors
    /// * `MalformedToken` - the token cannot be decoded
    /// * `SignatureInvalid` - no applicable secret verifies the signature
    /// * `TokenExpired` - the token verified but is past its expiry
    /// * `PurposeMismatch` - the token verified but was issued for another purpose
    pub fn validate(
        &self,
        token: &str,
        expected: Option<TokenPurpose>,
    ) -> Result<TokenClaims, TokenError> {
        let Some(expected) = expected else {
            return self.validate_any(token);
        };

        let settings = self.config.settings(expected.kind());
        let claims = self.codec.parse(token, &settings.secret)?;

        if !claims.has_purpose(expected) {
            return Err(TokenError::PurposeMismatch {
                expected,
                found: claims.purpose_label(),
            });
        }

        Ok(claims)
    }

    fn validate_any(&self, token: &str) -> Result<TokenClaims, TokenError> {
        for kind in TokenKind::ALL {
            match self.codec.parse(token, &self.config.settings(kind).secret) {
                Err(TokenError::SignatureInvalid) => continue,
                result => return result,
            }
        }

        Err(TokenError::SignatureInvalid)
    }
}
