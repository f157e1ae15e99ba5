//! Master Registry Routes
//!
//! Staff read, managers write.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{MANAGERS, STAFF, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/masters", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/search", get(handler::search))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_role(STAFF)));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).patch(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_role(MANAGERS)));

    read_routes.merge(manage_routes)
}
