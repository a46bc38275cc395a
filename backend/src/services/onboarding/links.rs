//! Shareable link endpoints.
//!
//! A link carries an opaque identifier used in the public URL, the template
//! it renders, and optionally the project it was generated for. Creation
//! draws a fresh identifier; the response always expands the template and
//! project so the admin UI can show the link in context.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::link::OnboardingLink;
use common::requests::{CreateLinkRequest, LinkListQuery};
use uuid::Uuid;

use crate::db::{store, Database};
use crate::error::{ok_envelope, ApiError};
use crate::ids::generate_id;
use crate::state::AppState;

pub async fn create(
    state: web::Data<AppState>,
    payload: web::Json<CreateLinkRequest>,
) -> Result<HttpResponse, ApiError> {
    let link = create_link(&state.db, &payload)?;
    Ok(ok_envelope(link))
}

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<LinkListQuery>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.db.open()?;
    let links = store::list_links(&conn, &query)?;
    Ok(ok_envelope(links))
}

pub async fn get_one(
    state: web::Data<AppState>,
    link_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let link = resolve_link(&state.db, &link_id)?;
    Ok(ok_envelope(link))
}

pub async fn remove(
    state: web::Data<AppState>,
    link_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.db.open()?;
    if store::delete_link(&conn, &link_id)? == 0 {
        return Err(ApiError::NotFound("Link"));
    }
    Ok(ok_envelope(serde_json::json!({ "success": true })))
}

pub(crate) fn create_link(
    db: &Database,
    req: &CreateLinkRequest,
) -> Result<OnboardingLink, ApiError> {
    let conn = db.open()?;
    if store::get_template(&conn, &req.template_id)?.is_none() {
        return Err(ApiError::NotFound("Template"));
    }
    if let Some(project_id) = &req.project_id {
        if store::get_project(&conn, project_id)?.is_none() {
            return Err(ApiError::NotFound("Project"));
        }
    }
    let link = OnboardingLink {
        id: Uuid::new_v4().to_string(),
        link_id: generate_id(),
        template_id: req.template_id.clone(),
        project_id: req.project_id.clone(),
        submission_id: None,
        created_at: Utc::now(),
        template: None,
        project: None,
        submission: None,
    };
    store::insert_link(&conn, &link)?;
    store::expand_link(&conn, link)
}

/// Fetches a link with template, project and submission expanded; used by
/// the public form render path and the admin detail view.
pub(crate) fn resolve_link(db: &Database, link_id: &str) -> Result<OnboardingLink, ApiError> {
    let conn = db.open()?;
    let link = store::get_link(&conn, link_id)?.ok_or(ApiError::NotFound("Link"))?;
    store::expand_link(&conn, link)
}
