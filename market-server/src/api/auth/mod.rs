//! Authentication Routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/auth/register | POST | public |
//! | /api/auth/send-otp | POST | public |
//! | /api/auth/activate | POST | public |
//! | /api/auth/verify-otp | POST | public |
//! | /api/auth/reset-password | POST | public |
//! | /api/auth/login | POST | public |
//! | /api/auth/refresh | POST | public |
//! | /api/auth/logout | POST | token |
//! | /api/auth/me | GET | token |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/send-otp", post(handler::send_otp))
        .route("/activate", post(handler::activate))
        .route("/verify-otp", post(handler::verify_otp))
        .route("/reset-password", post(handler::reset_password))
        .route("/login", post(handler::login))
        .route("/refresh", post(handler::refresh))
        // Token required, enforced by require_auth
        .route("/logout", post(handler::logout))
        .route("/me", get(handler::me))
}
