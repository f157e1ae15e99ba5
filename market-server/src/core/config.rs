use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::core::ServerError;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HOST | 0.0.0.0 | Bind address |
/// | HTTP_PORT | 3000 | HTTP port |
/// | DATABASE_URL | sqlite:market.db | SQLite database |
/// | WORK_DIR | . | Holds `uploads/` |
/// | JWT_SECRET | dev fallback | Access token secret |
/// | JWT_REFRESH_SECRET | dev fallback | Refresh token secret |
/// | JWT_ACCESS_MINUTES | 60 | Access token lifetime |
/// | JWT_REFRESH_DAYS | 7 | Refresh token lifetime |
/// | OTP_TTL_SECONDS | 3600 | OTP lifetime |
/// | OTP_RESEND_SECONDS | 60 | Cooldown between `send-otp` calls per phone |
/// | TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID | unset | Order notifications |
/// | BOOTSTRAP_ADMIN_PHONE / BOOTSTRAP_ADMIN_PASSWORD | unset | Initial SUPER_ADMIN |
/// | ENVIRONMENT | development | development or production |
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub database_url: String,
    /// Working directory, uploads live under `{work_dir}/uploads`
    pub work_dir: PathBuf,
    pub jwt: JwtConfig,
    pub otp_ttl_seconds: i64,
    pub otp_resend_seconds: i64,
    /// Order notifications are only logged when unset
    pub telegram: Option<TelegramConfig>,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    /// development | production
    pub environment: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// SUPER_ADMIN account created at startup when no account uses the phone
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub phone_number: String,
    pub password: String,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing JWT secrets are fatal in production. In development a fixed
    /// dev secret is used and a warning is logged.
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let production = environment == "production";

        let jwt = JwtConfig {
            access_secret: require_secret("JWT_SECRET", production)?,
            refresh_secret: require_secret("JWT_REFRESH_SECRET", production)?,
            access_minutes: env_parse("JWT_ACCESS_MINUTES", 60),
            refresh_days: env_parse("JWT_REFRESH_DAYS", 7),
            ..JwtConfig::default()
        };

        let telegram = match (env_opt("TELEGRAM_BOT_TOKEN"), env_opt("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };

        let bootstrap_admin = match (
            env_opt("BOOTSTRAP_ADMIN_PHONE"),
            env_opt("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(phone_number), Some(password)) => Some(BootstrapAdmin {
                phone_number,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:market.db".into()),
            work_dir: PathBuf::from(std::env::var("WORK_DIR").unwrap_or_else(|_| ".".into())),
            jwt,
            otp_ttl_seconds: env_parse("OTP_TTL_SECONDS", 3600),
            otp_resend_seconds: env_parse("OTP_RESEND_SECONDS", 60),
            telegram,
            bootstrap_admin,
            environment,
        })
    }

    /// Configuration for tests: in-memory friendly, fixed secrets
    pub fn for_tests(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: "127.0.0.1".into(),
            http_port: 0,
            database_url: "sqlite::memory:".into(),
            work_dir: work_dir.into(),
            jwt: JwtConfig::default(),
            otp_ttl_seconds: 3600,
            otp_resend_seconds: 0,
            telegram: None,
            bootstrap_admin: None,
            environment: "test".into(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.work_dir.join("uploads")
    }
}

fn require_secret(name: &str, production: bool) -> Result<String, ServerError> {
    match env_opt(name) {
        Some(secret) if secret.len() >= 32 => Ok(secret),
        Some(_) => Err(ServerError::Config(format!(
            "{name} must be at least 32 characters long"
        ))),
        None if production => Err(ServerError::Config(format!(
            "{name} must be set in production"
        ))),
        None => {
            tracing::warn!("{name} not set, using a development secret");
            Ok(format!("dev-{name}-not-for-production-use-only"))
        }
    }
}
