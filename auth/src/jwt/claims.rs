use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::TokenError;

/// Purpose tag embedded in every token.
///
/// Each kind is signed with its own secret and carries its own lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Access,
    Refresh,
    Generic,
}

impl TokenKind {
    pub const ALL: [TokenKind; 3] = [TokenKind::Access, TokenKind::Refresh, TokenKind::Generic];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "ACCESS",
            TokenKind::Refresh => "REFRESH",
            TokenKind::Generic => "GENERIC",
        }
    }
}

/// What a generic (emailed link) token is allowed to authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenericIntent {
    Activation,
    PasswordReset,
}

/// The purpose a caller expects a presented token to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    Access,
    Refresh,
    Generic(GenericIntent),
    /// Any `GENERIC` token, whatever its intent.
    AnyGeneric,
}

impl TokenPurpose {
    pub const ACTIVATION: TokenPurpose = TokenPurpose::Generic(GenericIntent::Activation);
    pub const PASSWORD_RESET: TokenPurpose = TokenPurpose::Generic(GenericIntent::PasswordReset);

    pub fn kind(&self) -> TokenKind {
        match self {
            TokenPurpose::Access => TokenKind::Access,
            TokenPurpose::Refresh => TokenKind::Refresh,
            TokenPurpose::Generic(_) | TokenPurpose::AnyGeneric => TokenKind::Generic,
        }
    }

    pub fn intent(&self) -> Option<GenericIntent> {
        match self {
            TokenPurpose::Generic(intent) => Some(*intent),
            _ => None,
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPurpose::Access => f.write_str("ACCESS"),
            TokenPurpose::Refresh => f.write_str("REFRESH"),
            TokenPurpose::Generic(GenericIntent::Activation) => f.write_str("ACTIVATION"),
            TokenPurpose::Generic(GenericIntent::PasswordReset) => f.write_str("PASSWORD_RESET"),
            TokenPurpose::AnyGeneric => f.write_str("GENERIC"),
        }
    }
}

/// Accepts the tag names plus the `*_TOKEN` spellings used by older clients.
impl FromStr for TokenPurpose {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACCESS" | "ACCESS_TOKEN" => Ok(TokenPurpose::Access),
            "REFRESH" | "REFRESH_TOKEN" => Ok(TokenPurpose::Refresh),
            "ACTIVATION" => Ok(TokenPurpose::ACTIVATION),
            "PASSWORD_RESET" | "RESET" => Ok(TokenPurpose::PASSWORD_RESET),
            "GENERIC" | "GENERIC_TOKEN" => Ok(TokenPurpose::AnyGeneric),
            other => Err(TokenError::UnknownPurpose(other.to_string())),
        }
    }
}

/// Payload carried by every issued token.
///
/// `iat` and `exp` are filled in by the codec at issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject user id
    pub sub: Uuid,

    pub email: String,

    #[serde(default)]
    pub role: String,

    pub purpose: TokenKind,

    /// Set only on `GENERIC` tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<GenericIntent>,

    #[serde(default)]
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Unique token id, keeps tokens minted within the same second distinct
    pub jti: Uuid,
}

impl TokenClaims {
    /// Claims for `subject` with the tag of `purpose`.
    pub fn new(
        subject: Uuid,
        email: impl Into<String>,
        role: impl Into<String>,
        purpose: TokenPurpose,
    ) -> Self {
        Self {
            sub: subject,
            email: email.into(),
            role: role.into(),
            purpose: purpose.kind(),
            intent: purpose.intent(),
            iss: String::new(),
            iat: 0,
            exp: 0,
            jti: Uuid::new_v4(),
        }
    }

    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = iss.into();
        self
    }

    /// Whether the embedded tag (and intent, for generic tokens) equals `expected`.
    pub fn has_purpose(&self, expected: TokenPurpose) -> bool {
        match expected {
            TokenPurpose::AnyGeneric => self.purpose == TokenKind::Generic,
            _ => self.purpose == expected.kind() && self.intent == expected.intent(),
        }
    }

    /// Human readable tag, e.g. `GENERIC/ACTIVATION`.
    pub fn purpose_label(&self) -> String {
        match self.intent {
            Some(GenericIntent::Activation) => format!("{}/ACTIVATION", self.purpose.as_str()),
            Some(GenericIntent::PasswordReset) => {
                format!("{}/PASSWORD_RESET", self.purpose.as_str())
            }
            None => self.purpose.as_str().to_string(),
        }
    }

    /// Expired once `current_timestamp` reaches `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims_carry_purpose() {
        let id = Uuid::new_v4();

        let access = TokenClaims::new(id, "a@x.com", "admin", TokenPurpose::Access);
        assert_eq!(access.sub, id);
        assert_eq!(access.purpose, TokenKind::Access);
        assert_eq!(access.intent, None);

        let reset = TokenClaims::new(id, "a@x.com", "", TokenPurpose::PASSWORD_RESET);
        assert_eq!(reset.purpose, TokenKind::Generic);
        assert_eq!(reset.intent, Some(GenericIntent::PasswordReset));
        assert_eq!(reset.purpose_label(), "GENERIC/PASSWORD_RESET");
    }

    #[test]
    fn test_has_purpose() {
        let claims = TokenClaims::new(Uuid::new_v4(), "a@x.com", "", TokenPurpose::ACTIVATION);

        assert!(claims.has_purpose(TokenPurpose::ACTIVATION));
        assert!(!claims.has_purpose(TokenPurpose::PASSWORD_RESET));
        assert!(!claims.has_purpose(TokenPurpose::Access));
        assert!(claims.has_purpose(TokenPurpose::AnyGeneric));

        let access = TokenClaims::new(Uuid::new_v4(), "a@x.com", "", TokenPurpose::Access);
        assert!(!access.has_purpose(TokenPurpose::AnyGeneric));
    }

    #[test]
    fn test_jti_is_unique() {
        let id = Uuid::new_v4();
        let a = TokenClaims::new(id, "a@x.com", "", TokenPurpose::Access);
        let b = TokenClaims::new(id, "a@x.com", "", TokenPurpose::Access);

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_is_expired() {
        let mut claims = TokenClaims::new(Uuid::new_v4(), "a@x.com", "", TokenPurpose::Access);
        claims.exp = 1000;

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_purpose_from_str() {
        assert_eq!("ACCESS".parse::<TokenPurpose>().unwrap(), TokenPurpose::Access);
        assert_eq!("access_token".parse::<TokenPurpose>().unwrap(), TokenPurpose::Access);
        assert_eq!("REFRESH_TOKEN".parse::<TokenPurpose>().unwrap(), TokenPurpose::Refresh);
        assert_eq!("activation".parse::<TokenPurpose>().unwrap(), TokenPurpose::ACTIVATION);
        assert_eq!(
            "PASSWORD_RESET".parse::<TokenPurpose>().unwrap(),
            TokenPurpose::PASSWORD_RESET
        );
        assert_eq!("GENERIC".parse::<TokenPurpose>().unwrap(), TokenPurpose::AnyGeneric);
        assert!(matches!(
            "SESSION".parse::<TokenPurpose>(),
            Err(TokenError::UnknownPurpose(_))
        ));
    }

    #[test]
    fn test_wire_format() {
        let claims = TokenClaims::new(Uuid::nil(), "a@x.com", "admin", TokenPurpose::ACTIVATION);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["purpose"], "GENERIC");
        assert_eq!(json["intent"], "ACTIVATION");
        assert_eq!(json["sub"], "00000000-0000-0000-0000-000000000000");

        let access = TokenClaims::new(Uuid::nil(), "a@x.com", "", TokenPurpose::Access);
        let json = serde_json::to_value(&access).unwrap();
        assert_eq!(json["purpose"], "ACCESS");
        assert!(json.get("intent").is_none());
    }
}
