//! Catalog Routes
//!
//! Ten collections share one set of generic handlers, parameterised by
//! their [`CatalogResource`] description. Professions swap in their own
//! create, update and detail handlers so the join lists are written and
//! returned.
//!
//! | Path | Read | Write |
//! |------|------|-------|
//! | /api/{collection} | public | managers |
//! | /api/{collection}/{id} | public | managers |

mod handler;
mod profession;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{MANAGERS, require_role};
use crate::core::ServerState;
use crate::db::repository::catalog::{
    Brands, Capacities, CatalogResource, Faqs, Levels, Partners, Regions, Showcases, Sizes, Tools,
};
use crate::db::repository::profession::Professions;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/brands", resource_routes::<Brands>())
        .nest("/api/capacities", resource_routes::<Capacities>())
        .nest("/api/sizes", resource_routes::<Sizes>())
        .nest("/api/levels", resource_routes::<Levels>())
        .nest("/api/regions", resource_routes::<Regions>())
        .nest("/api/partners", resource_routes::<Partners>())
        .nest("/api/faqs", resource_routes::<Faqs>())
        .nest("/api/showcases", resource_routes::<Showcases>())
        .nest("/api/tools", resource_routes::<Tools>())
        .nest("/api/professions", profession_routes())
}

fn resource_routes<R: CatalogResource>() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list::<R>))
        .route("/{id}", get(handler::get_by_id::<R>));

    let manage_routes = Router::new()
        .route("/", post(handler::create::<R>))
        .route(
            "/{id}",
            put(handler::update::<R>)
                .patch(handler::update::<R>)
                .delete(handler::delete::<R>),
        )
        .layer(middleware::from_fn(require_role(MANAGERS)));

    read_routes.merge(manage_routes)
}

fn profession_routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list::<Professions>))
        .route("/{id}", get(profession::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(profession::create))
        .route(
            "/{id}",
            put(profession::update)
                .patch(profession::update)
                .delete(handler::delete::<Professions>),
        )
        .layer(middleware::from_fn(require_role(MANAGERS)));

    read_routes.merge(manage_routes)
}
