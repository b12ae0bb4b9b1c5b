//! Credential and token primitives
//!
//! Provides the building blocks the account service composes:
//! - Password hashing (Argon2id)
//! - JWT signing and verification with per-call secrets and an injectable clock
//! - A token authority that keeps access, refresh and emailed-link tokens apart
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Issuing and Validating Tokens
//! ```
//! use auth::{PurposeSettings, TokenAuthority, TokenAuthorityConfig, TokenError, TokenPurpose};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let config = TokenAuthorityConfig::new(
//!     "auth-service",
//!     PurposeSettings::new("access_secret_key_at_least_32_bytes", Duration::minutes(15)),
//!     PurposeSettings::new("refresh_secret_key_at_least_32_bytes", Duration::days(7)),
//!     PurposeSettings::new("generic_secret_key_at_least_32_bytes", Duration::hours(24)),
//! )
//! .unwrap();
//! let authority = TokenAuthority::new(config);
//!
//! let user_id = Uuid::new_v4();
//! let refresh = authority.issue_refresh(user_id, "alice@example.com", "").unwrap();
//!
//! let claims = authority.validate(&refresh, Some(TokenPurpose::Refresh)).unwrap();
//! assert_eq!(claims.sub, user_id);
//!
//! // A refresh token is never accepted as an access token.
//! assert!(matches!(
//!     authority.validate(&refresh, Some(TokenPurpose::Access)),
//!     Err(TokenError::SignatureInvalid | TokenError::PurposeMismatch { .. })
//! ));
//! ```

pub mod authority;
pub mod clock;
pub mod jwt;
pub mod password;

pub use authority::PurposeSettings;
pub use authority::MAX_TTL;
pub use authority::TokenAuthority;
pub use authority::TokenAuthorityConfig;
pub use authority::TokenAuthorityConfigError;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use jwt::GenericIntent;
pub use jwt::TokenClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenKind;
pub use jwt::TokenPurpose;
pub use password::PasswordError;
pub use password::PasswordHasher;
