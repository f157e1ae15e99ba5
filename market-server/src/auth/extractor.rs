//! Bearer token authentication shared by [`require_auth`](super::require_auth)
//! and the [`CurrentUser`] extractor
//!
//! Both paths run [`authenticate`], so a handler reached without the
//! middleware still refuses expired, inactive and banned callers.

use axum::{extract::FromRequestParts, http::request::Parts};
use http::{HeaderMap, Uri};
use shared::models::UserStatus;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::{AppError, ErrorCode};

/// Resolve the caller from the `Authorization` header
///
/// | Failure | Error |
/// |---------|-------|
/// | header missing | NotAuthenticated |
/// | not `Bearer <token>` | TokenInvalid |
/// | expired / bad signature | TokenExpired / TokenInvalid |
/// | account `INACTIVE` / `BANNED` | AccountInactive / AccountBanned |
pub fn authenticate(
    jwt: &JwtService,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<CurrentUser, AppError> {
    let header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let Some(header) = header else {
        security_log!("WARN", "auth_missing", uri = uri.path());
        return Err(AppError::unauthorized());
    };
    let token = JwtService::extract_from_header(header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let claims = jwt.validate_access_token(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = e.to_string(), uri = uri.path());
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;
    let user = CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))?;

    match user.status {
        UserStatus::Active => Ok(user),
        UserStatus::Inactive => Err(AppError::new(ErrorCode::AccountInactive)),
        UserStatus::Banned => {
            security_log!("WARN", "banned_access", user_id = user.id, uri = uri.path());
            Err(AppError::new(ErrorCode::AccountBanned))
        }
    }
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }
        let user = authenticate(&state.jwt_service, &parts.headers, &parts.uri)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
