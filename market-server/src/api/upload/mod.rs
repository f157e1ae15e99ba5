//! Upload Routes
//!
//! `POST /api/upload` (managers). Stored files are served by the static
//! `/uploads` service set up in `routes`.

mod handler;

use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};

use crate::auth::{MANAGERS, require_role};
use crate::core::ServerState;

pub use handler::{MAX_FILE_SIZE, UploadResponse};

/// Room for the multipart envelope around an oversized file, so the
/// handler can answer with FileTooLarge instead of a bare 413
const BODY_LIMIT: usize = MAX_FILE_SIZE * 2;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload", post(handler::upload))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(middleware::from_fn(require_role(MANAGERS)))
}
