/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, backend URL, identity mode, JWT 検証設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// How the caller identity is derived from the bearer credential.
///
/// Exactly one mode is active per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMode {
    /// Decode the payload segment without checking the signature.
    Unverified,
    /// Verify the token signature/claims, then read identity claims from it.
    Verified,
}

impl IdentityMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unverified" => Some(Self::Unverified),
            "verified" => Some(Self::Verified),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for the delegated-trust (signature verifying) mode.
#[derive(Clone)]
pub struct VerifiedAuthConfig {
    pub issuer: String,
    pub audience: String,
    pub algorithm: Algorithm,
    pub public_key_pem: String,
    pub leeway_seconds: u64,
}

impl fmt::Debug for VerifiedAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // key material stays out of logs
        f.debug_struct("VerifiedAuthConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("algorithm", &self.algorithm)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,

    pub chat_service_base_url: String,
    pub chat_service_timeout: Duration,

    pub identity_mode: IdentityMode,
    // Some only when identity_mode == Verified
    pub verified_auth: Option<VerifiedAuthConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (env in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(&lookup("APP_ENV").unwrap_or_else(|| "development".into()));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout = Duration::from_secs(
            lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        );

        let chat_service_base_url = lookup("CHAT_SERVICE_BASE_URL")
            .unwrap_or_else(|| "http://localhost:8110/api/chat".to_string());
        url::Url::parse(&chat_service_base_url)
            .map_err(|_| ConfigError::Invalid("CHAT_SERVICE_BASE_URL"))?;

        let chat_service_timeout = Duration::from_millis(
            lookup("CHAT_SERVICE_TIMEOUT_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5_000),
        );

        let identity_mode = match lookup("IDENTITY_MODE") {
            Some(raw) => IdentityMode::parse(&raw).ok_or(ConfigError::Invalid("IDENTITY_MODE"))?,
            None => IdentityMode::Unverified,
        };

        let verified_auth = match identity_mode {
            IdentityMode::Unverified => None,
            IdentityMode::Verified => Some(Self::verified_auth(&lookup)?),
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout,
            chat_service_base_url,
            chat_service_timeout,
            identity_mode,
            verified_auth,
        })
    }

    fn verified_auth<F>(lookup: &F) -> Result<VerifiedAuthConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let issuer = lookup("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        let audience = lookup("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let algorithm = match lookup("ACCESS_JWT_ALGORITHM").as_deref().map(str::trim) {
            None | Some("RS256") => Algorithm::RS256,
            Some("ES256") => Algorithm::ES256,
            Some("EdDSA") => Algorithm::EdDSA,
            Some(_) => return Err(ConfigError::Invalid("ACCESS_JWT_ALGORITHM")),
        };

        let public_key_pem = lookup("ACCESS_JWT_PUBLIC_KEY_PEM")
            .ok_or(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let leeway_seconds = lookup("ACCESS_TOKEN_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        Ok(VerifiedAuthConfig {
            issuer,
            audience,
            algorithm,
            public_key_pem,
            leeway_seconds,
        })
    }
}
