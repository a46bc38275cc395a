//! # Client Dashboard Service Module
//!
//! The password-gated portal an external client uses to follow one project.
//! No accounts: a project carries a shared dashboard password, and a
//! successful exchange issues a signed, project-scoped token as an
//! HTTP-only cookie. The cookie name embeds the project slug
//! (`client_token_{slug}`), so sessions for different projects coexist in
//! one browser without touching each other.
//!
//! ## Sub-modules:
//! - `auth`: password exchange, cookie issue.
//! - `dashboard`: token-gated expanded project fetch.
//! - `tasks`: token-gated completion of the project's client tasks.

pub mod auth;
pub mod dashboard;
pub mod tasks;

use actix_web::web::{get, post, scope};
use actix_web::{HttpRequest, Scope};

use crate::error::ApiError;

const API_PATH: &str = "/api/client-dashboard";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/auth", post().to(auth::process))
        .route("/{slug}", get().to(dashboard::process))
        .route("/{slug}/tasks/{id}/complete", post().to(tasks::complete))
}

/// Name of the session cookie for a given project slug.
pub(crate) fn cookie_name(slug: &str) -> String {
    format!("client_token_{slug}")
}

/// Pulls and verifies the project claim out of the request's session
/// cookie. Missing cookie and bad token are distinct failures; the caller
/// still has to check the claim against the addressed project.
pub(crate) fn project_claim(
    req: &HttpRequest,
    jwt_secret: &str,
    slug: &str,
) -> Result<String, ApiError> {
    let cookie = req.cookie(&cookie_name(slug)).ok_or(ApiError::Unauthorized)?;
    crate::auth::token::verify(jwt_secret, cookie.value()).ok_or(ApiError::InvalidToken)
}
