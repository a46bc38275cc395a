//! # Project Service Module
//!
//! Routes under `/api/projects`. The only operation the core owns here is
//! the onboarding import: the admin CRUD surface for projects lives outside
//! this service.

pub mod import;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/projects";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route(
        "/{project_id}/import-onboarding",
        post().to(import::process),
    )
}
