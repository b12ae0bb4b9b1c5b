use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::TokenError;
use crate::clock::Clock;

/// Signs and verifies [`TokenClaims`] as compact JWTs.
///
/// Uses HS256 (HMAC with SHA-256). The secret and lifetime are passed per
/// call so one codec can serve every token purpose. Expiry is checked against
/// the injected [`Clock`] rather than the system time.
pub struct TokenCodec {
    clock: Arc<dyn Clock>,
    algorithm: Algorithm,
}

impl TokenCodec {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            algorithm: Algorithm::HS256,
        }
    }

    /// Stamp `claims` with `iat = now` and `exp = now + ttl`, then sign.
    ///
    /// # Errors
    /// * `EncodingFailed` - serialization or signing failed
    pub fn issue(
        &self,
        mut claims: TokenClaims,
        secret: &[u8],
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = self.clock.now();
        claims.iat = now.timestamp();
        claims.exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::EncodingFailed(format!("Lifetime {} overflows", ttl)))?
            .timestamp();

        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify the signature of `token` with `secret` and check it is unexpired.
    ///
    /// # Errors
    /// * `MalformedToken` - not a decodable JWT, or required claims missing
    /// * `SignatureInvalid` - signature or algorithm does not verify
    /// * `TokenExpired` - the clock has reached `exp`
    pub fn parse(&self, token: &str, secret: &[u8]) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is judged against the injected clock below.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let token_data =
            decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
                .map_err(|e| match e.kind() {
                    ErrorKind::InvalidSignature
                    | ErrorKind::InvalidAlgorithm
                    | ErrorKind::InvalidAlgorithmName
                    | ErrorKind::InvalidKeyFormat => TokenError::SignatureInvalid,
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    _ => TokenError::MalformedToken(e.to_string()),
                })?;

        let claims = token_data.claims;
        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::TokenExpired);
        }

        Ok(claims)
    }
}
