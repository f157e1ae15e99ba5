//! JWT token service
//!
//! Access tokens authenticate API calls. Refresh tokens are signed with a
//! separate secret, carry `typ = "refresh"`, and are only honoured while
//! their hash matches the one stored on the user row.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::models::{TokenPair, User, UserRole, UserStatus};
use thiserror::Error;

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Access token secret (at least 32 bytes)
    pub access_secret: String,
    /// Refresh token secret (at least 32 bytes)
    pub refresh_secret: String,
    pub access_minutes: i64,
    pub refresh_days: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    /// Development defaults. `Config::from_env` replaces the secrets.
    fn default() -> Self {
        Self {
            access_secret: "dev-access-secret-not-for-production-use".into(),
            refresh_secret: "dev-refresh-secret-not-for-production-use".into(),
            access_minutes: 60,
            refresh_days: 7,
            issuer: "market-server".into(),
            audience: "market-clients".into(),
        }
    }
}

/// Claims carried by both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: UserRole,
    pub status: UserStatus,
    /// `access` or `refresh`
    pub typ: String,
    /// Unique token id, keeps two refresh tokens issued in the same second apart
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    access: KeyPair,
    refresh: KeyPair,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let access = KeyPair::from_secret(&config.access_secret);
        let refresh = KeyPair::from_secret(&config.refresh_secret);
        Self {
            config,
            access,
            refresh,
        }
    }

    fn claims(&self, user_id: i64, role: UserRole, status: UserStatus, typ: &str) -> Claims {
        let now = Utc::now();
        let lifetime = if typ == REFRESH_TOKEN {
            Duration::days(self.config.refresh_days)
        } else {
            Duration::minutes(self.config.access_minutes)
        };
        Claims {
            sub: user_id.to_string(),
            role,
            status,
            typ: typ.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        }
    }

    pub fn generate_access_token(
        &self,
        user_id: i64,
        role: UserRole,
        status: UserStatus,
    ) -> Result<String, JwtError> {
        let claims = self.claims(user_id, role, status, ACCESS_TOKEN);
        encode(&Header::default(), &claims, &self.access.encoding)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn generate_refresh_token(
        &self,
        user_id: i64,
        role: UserRole,
        status: UserStatus,
    ) -> Result<String, JwtError> {
        let claims = self.claims(user_id, role, status, REFRESH_TOKEN);
        encode(&Header::default(), &claims, &self.refresh.encoding)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Issue a fresh access/refresh pair for the user
    pub fn token_pair(&self, user: &User) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user.id, user.role, user.status)?,
            refresh_token: self.generate_refresh_token(user.id, user.role, user.status)?,
        })
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(token, &self.access.decoding, ACCESS_TOKEN)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate(token, &self.refresh.decoding, REFRESH_TOKEN)
    }

    fn validate(&self, token: &str, key: &DecodingKey, typ: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
            _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
        })?;

        if token_data.claims.typ != typ {
            return Err(JwtError::InvalidToken(format!(
                "expected {typ} token, got {}",
                token_data.claims.typ
            )));
        }
        Ok(token_data.claims)
    }

    /// Extract the token from an `Authorization` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// sha256 hex digest stored in place of a refresh token
    pub fn fingerprint(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }
}

/// Authenticated caller, built from access token claims
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub role: UserRole,
    pub status: UserStatus,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|e| format!("invalid subject '{}': {e}", claims.sub))?;
        Ok(Self {
            id,
            role: claims.role,
            status: claims.status,
        })
    }
}

impl CurrentUser {
    pub fn is_customer(&self) -> bool {
        self.role.is_customer()
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn can_manage(&self) -> bool {
        self.role.can_manage()
    }

    /// Owner filter for listings: customers only see their own rows
    pub fn owner_scope(&self) -> Option<i64> {
        self.is_customer().then_some(self.id)
    }
}
