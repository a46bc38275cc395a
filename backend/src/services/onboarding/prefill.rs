//! Pre-fill data for links generated against an existing project.
//!
//! Maps project and client records onto the standard web-design template
//! field names so the public form opens with known answers filled in.

use actix_web::{web, HttpResponse};
use serde_json::json;
use std::collections::BTreeMap;

use common::model::project::Project;

use crate::db::{store, Database};
use crate::error::{ok_envelope, ApiError};
use crate::state::AppState;

pub async fn process(
    state: web::Data<AppState>,
    project_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let (project, prefill) = prefill_for_project(&state.db, &project_id)?;
    Ok(ok_envelope(json!({
        "projectId": project.id,
        "projectName": project.name,
        "prefillData": prefill,
    })))
}

pub(crate) fn prefill_for_project(
    db: &Database,
    project_id: &str,
) -> Result<(Project, BTreeMap<&'static str, String>), ApiError> {
    let conn = db.open()?;
    let mut project =
        store::get_project(&conn, project_id)?.ok_or(ApiError::NotFound("Project"))?;
    project.client = store::get_client(&conn, &project.client_id)?;

    let mut prefill = BTreeMap::new();
    if let Some(client) = &project.client {
        prefill.insert("client_name", client.name.clone());
        prefill.insert("email", client.email.clone());
        if let Some(phone) = &client.phone {
            prefill.insert("phone", phone.clone());
        }
        if let Some(company) = &client.company {
            prefill.insert("company", company.clone());
        }
    }
    prefill.insert("project_name", project.name.clone());
    if let Some(description) = &project.description {
        prefill.insert("description", description.clone());
    }
    if let Some(target) = &project.target_end_date {
        prefill.insert("target_date", target.to_string());
    }
    Ok((project, prefill))
}
