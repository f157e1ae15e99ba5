//! Contact Routes
//!
//! Any signed-in caller may leave a contact request and read its own.
//! Staff read all of them; managers edit and delete.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::{MANAGERS, require_role};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/contacts", routes())
}

fn routes() -> Router<ServerState> {
    let caller_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route(
            "/{id}",
            put(handler::update)
                .patch(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_role(MANAGERS)));

    caller_routes.merge(manage_routes)
}
