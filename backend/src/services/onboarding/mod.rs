//! # Onboarding Service Module
//!
//! Aggregates every endpoint of the public onboarding pipeline under
//! `/api/onboarding`: template lookup for the form renderer, shareable link
//! management, form submissions, file uploads and project pre-fill data.
//!
//! ## Sub-modules:
//! - `templates`: fetch an active template by slug, admin updates.
//! - `links`: create/list/resolve/delete shareable links.
//! - `submissions`: create (public), list, fetch, review transition.
//! - `upload`: multipart attachment upload into the blob root.
//! - `prefill`: project/client data mapped to form field names.
//! - `validate`: server-side check of submitted values against the
//!   template's field schema.

pub mod links;
pub mod prefill;
pub mod submissions;
pub mod templates;
pub mod upload;
pub mod validate;

use actix_web::web::{delete, get, patch, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/onboarding";

/// Configures and returns the Actix `Scope` for all onboarding routes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/templates/{slug}", get().to(templates::get_one))
        .route("/templates/{slug}", patch().to(templates::update))
        .route("/links", post().to(links::create))
        .route("/links", get().to(links::list))
        .route("/links/{link_id}", get().to(links::get_one))
        .route("/links/{link_id}", delete().to(links::remove))
        .route("/submissions", post().to(submissions::create))
        .route("/submissions", get().to(submissions::list))
        .route("/submissions/{id}", get().to(submissions::get_one))
        .route("/submissions/{id}", patch().to(submissions::update))
        .route("/upload", post().to(upload::process))
        .route("/prefill/{project_id}", get().to(prefill::process))
}
