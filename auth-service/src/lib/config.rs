use std::env;

use auth::PurposeSettings;
use auth::TokenAuthorityConfig;
use auth::TokenAuthorityConfigError;
use auth::TokenKind;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub tokens: TokensConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub grpc_port: u16,
    /// Upper bound on a single request, after which it is abandoned.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokensConfig {
    pub issuer: String,
    pub access: TokenKindConfig,
    pub refresh: TokenKindConfig,
    pub generic: TokenKindConfig,
}

#[derive(Deserialize, Clone)]
pub struct TokenKindConfig {
    pub secret: String,
    pub ttl_seconds: i64,
}

impl std::fmt::Debug for TokenKindConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKindConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenKindConfig {
    fn settings(&self, kind: &'static str) -> Result<PurposeSettings, TokenAuthorityConfigError> {
        let ttl = Duration::try_seconds(self.ttl_seconds)
            .ok_or(TokenAuthorityConfigError::TtlTooLarge(kind))?;

        Ok(PurposeSettings::new(self.secret.as_bytes(), ttl))
    }
}

/// Which mail adapter to wire in.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Log messages instead of sending them
    Log,
    SendGrid,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub provider: MailProvider,
    #[serde(default)]
    pub sendgrid_api_key: String,
    #[serde(default = "default_sendgrid_endpoint")]
    pub sendgrid_endpoint: String,
    pub from_email: String,
    pub from_name: String,
    /// Link base for activation mails; the token is appended as `?token=`.
    pub activation_url: String,
    /// Link base for password reset mails.
    pub reset_url: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_sendgrid_endpoint() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, TOKENS__ACCESS__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: TOKENS__ACCESS__SECRET=... overrides tokens.access.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Build the token authority settings, rejecting empty secrets and
    /// lifetimes that are non-positive or too long.
    pub fn token_authority_config(
        &self,
    ) -> Result<TokenAuthorityConfig, TokenAuthorityConfigError> {
        TokenAuthorityConfig::new(
            self.tokens.issuer.clone(),
            self.tokens.access.settings(TokenKind::Access.as_str())?,
            self.tokens.refresh.settings(TokenKind::Refresh.as_str())?,
            self.tokens.generic.settings(TokenKind::Generic.as_str())?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(access_secret: &str) -> TokensConfig {
        TokensConfig {
            issuer: "auth-service".to_string(),
            access: TokenKindConfig {
                secret: access_secret.to_string(),
                ttl_seconds: 900,
            },
            refresh: TokenKindConfig {
                secret: "refresh".to_string(),
                ttl_seconds: 604_800,
            },
            generic: TokenKindConfig {
                secret: "generic".to_string(),
                ttl_seconds: 86_400,
            },
        }
    }

    fn config(tokens: TokensConfig) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/auth".to_string(),
                max_connections: 5,
            },
            server: ServerConfig {
                http_port: 3000,
                grpc_port: 50051,
                request_timeout_seconds: 30,
            },
            tokens,
            mail: MailConfig {
                provider: MailProvider::Log,
                sendgrid_api_key: String::new(),
                sendgrid_endpoint: default_sendgrid_endpoint(),
                from_email: "noreply@example.com".to_string(),
                from_name: "Auth".to_string(),
                activation_url: "http://localhost:3000/activate".to_string(),
                reset_url: "http://localhost:3000/reset".to_string(),
            },
        }
    }

    #[test]
    fn test_token_authority_config() {
        let authority = config(tokens("access")).token_authority_config().unwrap();

        assert_eq!(authority.issuer(), "auth-service");
        assert_eq!(
            authority.settings(TokenKind::Access).ttl(),
            Duration::seconds(900)
        );
        assert_eq!(
            authority.settings(TokenKind::Generic).ttl(),
            Duration::hours(24)
        );
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(config(tokens("")).token_authority_config().is_err());
    }

    #[test]
    fn test_oversized_ttl_is_rejected() {
        let mut huge = tokens("access");
        huge.refresh.ttl_seconds = i64::MAX;
        assert_eq!(
            config(huge).token_authority_config().unwrap_err(),
            TokenAuthorityConfigError::TtlTooLarge("REFRESH")
        );

        let mut long = tokens("access");
        long.generic.ttl_seconds = 10_000_000_000_000;
        assert_eq!(
            config(long).token_authority_config().unwrap_err(),
            TokenAuthorityConfigError::TtlTooLarge("GENERIC")
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", tokens("super-secret-value"));
        assert!(!rendered.contains("super-secret-value"));
    }
}
