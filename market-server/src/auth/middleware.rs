//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role gates

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::models::UserRole;

use super::extractor::authenticate;
use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;

pub const SUPER_ADMIN_ONLY: &[UserRole] = &[UserRole::SuperAdmin];
pub const MANAGERS: &[UserRole] = &[UserRole::SuperAdmin, UserRole::Admin];
pub const STAFF: &[UserRole] = &[UserRole::SuperAdmin, UserRole::Admin, UserRole::ViewerAdmin];

const PUBLIC_AUTH_ROUTES: &[&str] = &[
    "/api/auth/register",
    "/api/auth/login",
    "/api/auth/send-otp",
    "/api/auth/activate",
    "/api/auth/verify-otp",
    "/api/auth/reset-password",
    "/api/auth/refresh",
];

/// Other `GET` routes open to anonymous visitors
const PUBLIC_READS: &[&str] = &["/api/site-metadata"];

/// Catalog collections readable without a token
const PUBLIC_CATALOG: &[&str] = &[
    "brands",
    "capacities",
    "sizes",
    "levels",
    "regions",
    "partners",
    "faqs",
    "showcases",
    "tools",
    "professions",
];

/// `GET /api/{collection}` and `GET /api/{collection}/{id}` on the catalog
fn is_public_catalog_read(method: &http::Method, path: &str) -> bool {
    if method != http::Method::GET {
        return false;
    }
    let Some(rest) = path.strip_prefix("/api/") else {
        return false;
    };
    let mut segments = rest.trim_end_matches('/').split('/');
    let collection = segments.next().unwrap_or_default();
    let tail: Vec<&str> = segments.collect();
    PUBLIC_CATALOG.contains(&collection)
        && (tail.is_empty() || (tail.len() == 1 && tail[0].parse::<i64>().is_ok()))
}

fn is_public(method: &http::Method, path: &str) -> bool {
    *method == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_AUTH_ROUTES.contains(&path)
        || is_public_catalog_read(method, path)
        || (*method == http::Method::GET
            && PUBLIC_READS.contains(&path.trim_end_matches('/')))
}

/// Authentication middleware
///
/// Validates `Authorization: Bearer <token>` and injects [`CurrentUser`]
/// into the request extensions. Public routes pass through untouched.
/// Rejections are those of [`authenticate`].
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state.jwt_service, req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Role gate for a group of routes
///
/// ```ignore
/// Router::new()
///     .route("/", post(handler::create))
///     .layer(middleware::from_fn(require_role(MANAGERS)));
/// ```
pub fn require_role(
    roles: &'static [UserRole],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !roles.contains(&user.role) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id,
                    user_role = user.role.as_str(),
                    uri = format!("{:?}", req.uri())
                );
                return Err(AppError::new(crate::ErrorCode::RoleRequired));
            }

            Ok(next.run(req).await)
        })
    }
}
