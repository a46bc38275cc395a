//! Token-gated project fetch for the client dashboard.

use actix_web::{web, HttpRequest, HttpResponse};

use common::model::project::Project;

use crate::db::{store, Database};
use crate::error::{ok_envelope, ApiError};
use crate::services::client_dashboard::project_claim;
use crate::state::AppState;

pub async fn process(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claimed_project = project_claim(&req, &state.jwt_secret, &slug)?;
    let project = fetch_dashboard(&state.db, &slug, &claimed_project)?;
    Ok(ok_envelope(project))
}

/// The token's claim must match the project the slug resolves to; a valid
/// token for some other project gets the same `NotFound` as a dangling
/// slug, leaking nothing about which projects exist.
pub(crate) fn fetch_dashboard(
    db: &Database,
    slug: &str,
    claimed_project_id: &str,
) -> Result<Project, ApiError> {
    let conn = db.open()?;
    let project = store::get_project_by_slug(&conn, slug)?.ok_or(ApiError::NotFound("Project"))?;
    if project.id != claimed_project_id {
        return Err(ApiError::NotFound("Project"));
    }
    store::expand_project(&conn, project)
}
