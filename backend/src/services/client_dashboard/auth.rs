//! Password exchange for the client dashboard.
//!
//! The stored password is a bcrypt hash; comparison happens inside
//! bcrypt's constant-time verify. On success the response both sets the
//! session cookie and returns the fully-expanded project so the dashboard
//! renders from a single round trip.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde_json::json;

use common::model::project::Project;
use common::requests::ClientAuthRequest;

use crate::auth::password::verify_password;
use crate::auth::token;
use crate::db::{store, Database};
use crate::error::ApiError;
use crate::services::client_dashboard::cookie_name;
use crate::state::AppState;

pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<ClientAuthRequest>,
) -> Result<HttpResponse, ApiError> {
    let project = authenticate(&state.db, &payload.slug, &payload.password)?;
    let jwt = token::issue(&state.jwt_secret, &project.id)?;

    let cookie = Cookie::build(cookie_name(&payload.slug), jwt)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(token::TOKEN_TTL_DAYS))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "data": { "project": project }, "error": null })))
}

pub(crate) fn authenticate(
    db: &Database,
    slug: &str,
    password: &str,
) -> Result<Project, ApiError> {
    if slug.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Slug and password are required".to_string(),
        ));
    }
    let conn = db.open()?;
    let project = store::get_project_by_slug(&conn, slug)?.ok_or(ApiError::NotFound("Project"))?;
    let Some(stored_hash) = &project.dashboard_password else {
        return Err(ApiError::NoPasswordConfigured);
    };
    if !verify_password(password, stored_hash) {
        return Err(ApiError::InvalidCredential);
    }
    store::expand_project(&conn, project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use chrono::Utc;
    use common::model::client::Client;
    use common::model::project::ProjectStatus;
    use tempfile::TempDir;

    fn db_with_project(password: Option<&str>) -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.sqlite"));
        db.init().unwrap();
        let now = Utc::now();
        let conn = db.open().unwrap();
        store::insert_client(
            &conn,
            &Client {
                id: "c1".to_string(),
                name: "Acme".to_string(),
                email: "a@acme.com".to_string(),
                phone: None,
                company: None,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();
        store::insert_project(
            &conn,
            &Project {
                id: "p2".to_string(),
                slug: "p2-slug".to_string(),
                name: "Acme Site".to_string(),
                client_id: "c1".to_string(),
                status: ProjectStatus::Active,
                description: None,
                start_date: None,
                target_end_date: None,
                dashboard_password: password.map(|p| hash_password(p).unwrap()),
                created_at: now,
                updated_at: now,
                client: None,
                milestones: None,
                client_tasks: None,
            },
        )
        .unwrap();
        (dir, db)
    }

    #[test]
    fn correct_password_returns_expanded_project() {
        let (_dir, db) = db_with_project(Some("maple-7421"));
        let project = authenticate(&db, "p2-slug", "maple-7421").unwrap();
        assert_eq!(project.id, "p2");
        assert!(project.client.is_some());
        assert!(project.milestones.is_some());
        assert!(project.client_tasks.is_some());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let (_dir, db) = db_with_project(Some("maple-7421"));
        assert!(matches!(
            authenticate(&db, "p2-slug", "wrong").unwrap_err(),
            ApiError::InvalidCredential
        ));
    }

    #[test]
    fn project_without_password_is_not_gated_open() {
        let (_dir, db) = db_with_project(None);
        assert!(matches!(
            authenticate(&db, "p2-slug", "anything").unwrap_err(),
            ApiError::NoPasswordConfigured
        ));
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let (_dir, db) = db_with_project(Some("maple-7421"));
        assert!(matches!(
            authenticate(&db, "ghost", "maple-7421").unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn missing_params_are_a_validation_error() {
        let (_dir, db) = db_with_project(Some("maple-7421"));
        assert!(matches!(
            authenticate(&db, "", "").unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
