//! Admin Account Routes (SUPER_ADMIN only)

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::auth::{SUPER_ADMIN_ONLY, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admins", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_role(SUPER_ADMIN_ONLY)))
}
