//! User Registry Routes
//!
//! Staff read everything. Any caller may patch their own name and
//! region, managers may patch anyone and change status.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch},
};

use crate::auth::{MANAGERS, STAFF, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_role(STAFF)));

    // Ownership is checked in the handler
    let self_routes = Router::new().route("/{id}", patch(handler::update));

    let manage_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_role(MANAGERS)));

    read_routes.merge(self_routes).merge(manage_routes)
}
