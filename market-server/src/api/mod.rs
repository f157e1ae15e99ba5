//! HTTP API
//!
//! One module per resource. Each exposes `router()`, which nests its
//! routes under `/api/{resource}` and layers role gates per route group.
//!
//! - [`health`] - liveness
//! - [`auth`] - registration, OTP, tokens, profile
//! - [`admins`] / [`users`] - account registry
//! - [`masters`] - service professionals
//! - [`catalog`] - brands, tools, professions and the other collections
//! - [`baskets`] - staged line items
//! - [`orders`] - order lifecycle
//! - [`comments`] - feedback and master ratings
//! - [`contacts`] - contact requests
//! - [`site_metadata`] - about texts, policy and contact details
//! - [`upload`] - image upload

pub mod admins;
pub mod auth;
pub mod baskets;
pub mod catalog;
pub mod comments;
pub mod contacts;
pub mod health;
pub mod masters;
pub mod orders;
pub mod site_metadata;
pub mod upload;
pub mod users;

use std::path::Path;

use sqlx::SqlitePool;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::db::repository::image_in_use;

pub use crate::utils::{ApiResponse, AppError, AppResult};

/// Run the payload's `validator` rules
///
/// The first failing rule (by field name) becomes the message, and all
/// failing fields are listed under `details.fields`.
pub fn validate<T: Validate>(payload: &T) -> AppResult<()> {
    let Err(errors) = payload.validate() else {
        return Ok(());
    };
    let mut failures = Vec::new();
    collect_failures(&errors, "", &mut failures);
    failures.sort();

    let message = failures
        .first()
        .map(|(_, message)| message.clone())
        .unwrap_or_else(|| "Validation failed".to_string());
    let fields: Vec<String> = failures.into_iter().map(|(field, _)| field).collect();
    Err(AppError::validation(message).with_detail("fields", fields))
}

fn collect_failures(errors: &ValidationErrors, prefix: &str, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid"));
                    out.push((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_failures(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_failures(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

/// Remove an uploaded image referenced by a deleted row
///
/// Only bare file names under the uploads directory are touched, and only
/// once no other row references the file. Failures are logged and
/// otherwise ignored.
pub async fn remove_upload(pool: &SqlitePool, uploads_dir: &Path, image: Option<&str>) {
    let Some(name) = image
        .map(|i| i.trim_start_matches("/uploads/"))
        .filter(|n| !n.is_empty() && !n.contains(['/', '\\']) && !n.contains(".."))
    else {
        return;
    };
    match image_in_use(pool, name).await {
        Ok(false) => {}
        Ok(true) => {
            tracing::debug!(file = name, "Uploaded image still referenced, kept");
            return;
        }
        Err(e) => {
            tracing::warn!(file = name, error = %e, "Image reference check failed, kept");
            return;
        }
    }
    let path = uploads_dir.join(name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(file = %path.display(), error = %e, "Failed to remove uploaded image");
    }
}
