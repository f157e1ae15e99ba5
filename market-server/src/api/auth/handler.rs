//! Authentication Handlers
//!
//! Registration and activation by OTP, password login with per-ip
//! sessions, and refresh token rotation.

use axum::{Json, extract::State};
use shared::models::{
    LoginRequest, OtpRequest, PhoneRequest, RefreshRequest, RegisterRequest,
    ResetPasswordRequest, TokenPair, User, UserProfile, UserRole, UserStatus,
};
use shared::util::now_millis;

use crate::api::validate;
use crate::auth::{CurrentUser, JwtError, JwtService, otp, password};
use crate::core::ServerState;
use crate::db::repository::{otp as otp_repo, session, user};
use crate::security_log;
use crate::utils::net::ClientInfo;
use crate::{ApiResponse, AppError, AppResult, ErrorCode};

/// Store a fresh code for the phone and hand it to the sender
async fn issue_otp(state: &ServerState, phone_number: &str) -> AppResult<()> {
    let code = otp::generate_code();
    let expires_at = now_millis() + state.config.otp_ttl_seconds * 1000;
    otp_repo::upsert(&state.pool, phone_number, &otp::hash_code(&code), expires_at).await?;
    state.otp_sender.send(phone_number, &code).await;
    Ok(())
}

fn account_usable(status: UserStatus) -> AppResult<()> {
    match status {
        UserStatus::Active => Ok(()),
        UserStatus::Inactive => Err(AppError::new(ErrorCode::AccountInactive)),
        UserStatus::Banned => Err(AppError::new(ErrorCode::AccountBanned)),
    }
}

fn token_error(e: JwtError) -> AppError {
    AppError::internal(format!("Failed to generate token: {e}"))
}

/// Create an INACTIVE customer account and send the activation OTP
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<User>> {
    validate(&req)?;

    match (req.role, &req.company) {
        (UserRole::UserYur, None) => {
            return Err(AppError::validation(
                "Company details are required for USER_YUR role.",
            ));
        }
        (UserRole::UserFiz, Some(_)) => {
            return Err(AppError::validation(
                "Company details are not allowed for USER_FIZ role.",
            ));
        }
        (UserRole::UserFiz | UserRole::UserYur, _) => {}
        _ => return Err(AppError::validation("Invalid role!")),
    }

    if user::phone_exists(&state.pool, &req.phone_number).await? {
        return Err(AppError::new(ErrorCode::PhoneAlreadyExists));
    }
    if !user::region_exists(&state.pool, req.region_id).await? {
        return Err(AppError::new(ErrorCode::RegionNotFound));
    }

    let password_hash = password::hash_password(&req.password)?;
    let new_user = user::NewUser {
        first_name: &req.first_name,
        last_name: &req.last_name,
        phone_number: &req.phone_number,
        password_hash: &password_hash,
        role: req.role,
        status: UserStatus::Inactive,
        region_id: Some(req.region_id),
    };
    let created = user::create(&state.pool, &new_user, req.company.as_ref()).await?;

    issue_otp(&state, &created.phone_number).await?;

    tracing::info!(user_id = created.id, role = %created.role, "User registered");
    Ok(Json(created))
}

pub async fn send_otp(
    State(state): State<ServerState>,
    Json(req): Json<PhoneRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate(&req)?;

    if !user::phone_exists(&state.pool, &req.phone_number).await? {
        return Err(AppError::with_message(
            ErrorCode::NotAuthenticated,
            "User not found!",
        ));
    }

    state
        .otp_throttle
        .try_acquire(&req.phone_number, now_millis())
        .map_err(|wait| {
            AppError::validation(format!(
                "Please wait {wait} seconds before requesting a new OTP"
            ))
        })?;

    issue_otp(&state, &req.phone_number).await?;
    Ok(Json(ApiResponse::ok_with_message("OTP sent successfully!")))
}

/// Consume the OTP and set the account ACTIVE
pub async fn activate(
    State(state): State<ServerState>,
    Json(req): Json<OtpRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate(&req)?;

    let account = user::find_by_phone(&state.pool, &req.phone_number)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OtpInvalid))?;

    if !otp_repo::consume(&state.pool, &req.phone_number, &otp::hash_code(&req.otp)).await? {
        security_log!("WARN", "otp_rejected", phone = req.phone_number.clone());
        return Err(AppError::new(ErrorCode::OtpInvalid));
    }

    if account.status != UserStatus::Banned {
        user::set_status(&state.pool, account.id, UserStatus::Active).await?;
    }

    tracing::info!(user_id = account.id, "Account activated");
    Ok(Json(ApiResponse::ok_with_message(
        "Account successfully activated!",
    )))
}

/// Check an OTP without consuming it
pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(req): Json<OtpRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate(&req)?;

    if !otp_repo::matches(&state.pool, &req.phone_number, &otp::hash_code(&req.otp)).await? {
        return Err(AppError::new(ErrorCode::OtpInvalid));
    }
    Ok(Json(ApiResponse::ok_with_message("OTP verified successfully!")))
}

pub async fn reset_password(
    State(state): State<ServerState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate(&req)?;

    let account = user::find_by_phone(&state.pool, &req.phone_number)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UserNotFound,
                "User with this phone number does not exist!",
            )
        })?;

    if !otp_repo::consume(&state.pool, &req.phone_number, &otp::hash_code(&req.otp)).await? {
        security_log!("WARN", "otp_rejected", phone = req.phone_number.clone());
        return Err(AppError::new(ErrorCode::OtpInvalid));
    }

    let password_hash = password::hash_password(&req.new_password)?;
    user::set_password(&state.pool, account.id, &password_hash).await?;

    tracing::info!(user_id = account.id, "Password reset");
    Ok(Json(ApiResponse::ok_with_message(
        "Password successfully updated!",
    )))
}

/// Password login
///
/// Records a session for the client ip and returns a token pair. Only the
/// refresh token's fingerprint is stored.
pub async fn login(
    State(state): State<ServerState>,
    client: ClientInfo,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<TokenPair>> {
    validate(&req)?;

    let credentials = user::find_credentials(&state.pool, &req.phone_number)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UserNotFound,
                "User not found with the provided phone number. Please register first!",
            )
        })?;

    if !password::verify_password(&req.password, &credentials.password_hash) {
        security_log!(
            "WARN",
            "login_failed",
            user_id = credentials.user.id,
            ip = client.ip.clone()
        );
        return Err(AppError::invalid_credentials());
    }

    let account = credentials.user;
    account_usable(account.status)?;

    session::record(
        &state.pool,
        account.id,
        &client.ip,
        client.user_agent.as_deref(),
    )
    .await?;

    let tokens = state.jwt_service.token_pair(&account).map_err(token_error)?;
    user::set_refresh_hash(
        &state.pool,
        account.id,
        Some(&JwtService::fingerprint(&tokens.refresh_token)),
    )
    .await?;

    tracing::info!(user_id = account.id, ip = %client.ip, "User logged in");
    Ok(Json(tokens))
}

/// Rotate both tokens
pub async fn refresh(
    State(state): State<ServerState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    let claims = state
        .jwt_service
        .validate_refresh_token(&req.refresh_token)
        .map_err(|e| match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid or expired refresh token!"),
        })?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Invalid or expired refresh token!"))?;
    let account = user::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::invalid_token("Invalid or expired refresh token!"))?;
    account_usable(account.status)?;

    let presented = JwtService::fingerprint(&req.refresh_token);
    let tokens = state.jwt_service.token_pair(&account).map_err(token_error)?;
    let rotated = user::rotate_refresh_hash(
        &state.pool,
        account.id,
        &presented,
        &JwtService::fingerprint(&tokens.refresh_token),
    )
    .await?;
    if !rotated {
        security_log!("WARN", "refresh_reuse", user_id = account.id);
        return Err(AppError::invalid_token("Invalid refresh token!"));
    }

    Ok(Json(tokens))
}

/// Drop the refresh token and this ip's session
pub async fn logout(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    client: ClientInfo,
) -> AppResult<Json<ApiResponse<()>>> {
    user::set_refresh_hash(&state.pool, current_user.id, None).await?;
    session::delete(&state.pool, current_user.id, &client.ip).await?;

    tracing::info!(user_id = current_user.id, ip = %client.ip, "User logged out");
    Ok(Json(ApiResponse::ok_with_message("Logged out successfully!")))
}

/// Caller profile with company and sessions
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    client: ClientInfo,
) -> AppResult<Json<UserProfile>> {
    if !session::exists(&state.pool, current_user.id, &client.ip).await? {
        return Err(AppError::new(ErrorCode::SessionExpired));
    }

    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::UserNotFound, "User not found"))?;
    let company = user::find_company(&state.pool, account.id).await?;
    let sessions = session::find_by_user(&state.pool, account.id).await?;

    Ok(Json(UserProfile {
        user: account,
        company,
        sessions,
    }))
}
