//! Template endpoints.
//!
//! The public form renderer resolves templates by slug and only ever sees
//! active ones; deactivating a template takes its form offline without
//! touching the links that point at it. The PATCH endpoint is the admin
//! edit surface.

use actix_web::{web, HttpResponse};
use common::model::template::OnboardingTemplate;
use common::requests::UpdateTemplateRequest;

use crate::db::{store, Database};
use crate::error::{ok_envelope, ApiError};
use crate::state::AppState;

pub async fn get_one(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let template = get_active_template(&state.db, &slug)?;
    Ok(ok_envelope(template))
}

pub async fn update(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    payload: web::Json<UpdateTemplateRequest>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.db.open()?;
    let template =
        store::update_template(&conn, &slug, &payload)?.ok_or(ApiError::NotFound("Template"))?;
    Ok(ok_envelope(template))
}

pub(crate) fn get_active_template(
    db: &Database,
    slug: &str,
) -> Result<OnboardingTemplate, ApiError> {
    let conn = db.open()?;
    store::get_template_by_slug(&conn, slug, true)?.ok_or(ApiError::NotFound("Template"))
}
