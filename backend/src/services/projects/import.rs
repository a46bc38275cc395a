//! Importing an onboarding submission into a project.
//!
//! This is the invariant-carrying edge of the pipeline: a submission is
//! imported at most once, ever. Importing a submission that already belongs
//! to any project — the target or another one — fails with
//! `ALREADY_IMPORTED`; there is no re-link without an explicit unlink, and
//! no such operation exists.
//!
//! The precheck reads the submission to produce a precise error message,
//! but correctness does not rest on it: the write itself is a conditional
//! UPDATE keyed on `project_id IS NULL`, so two concurrent imports resolve
//! to exactly one winner.

use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use common::requests::ImportOnboardingRequest;

use crate::db::{store, Database};
use crate::error::{ok_envelope, ApiError};
use crate::state::AppState;

pub async fn process(
    state: web::Data<AppState>,
    project_id: web::Path<String>,
    payload: web::Json<ImportOnboardingRequest>,
) -> Result<HttpResponse, ApiError> {
    let submission_id = import_submission(&state.db, &project_id, &payload.submission_id)?;
    Ok(ok_envelope(json!({
        "message": "Onboarding data imported successfully",
        "submission_id": submission_id,
        "project_id": project_id.as_str(),
    })))
}

pub(crate) fn import_submission(
    db: &Database,
    project_id: &str,
    submission_id: &str,
) -> Result<String, ApiError> {
    if submission_id.trim().is_empty() {
        return Err(ApiError::Validation("submission_id is required".to_string()));
    }
    let conn = db.open()?;
    if store::get_project(&conn, project_id)?.is_none() {
        return Err(ApiError::NotFound("Project"));
    }
    let submission =
        store::get_submission(&conn, submission_id)?.ok_or(ApiError::NotFound("Submission"))?;

    match submission.project_id.as_deref() {
        Some(existing) if existing == project_id => {
            return Err(ApiError::AlreadyImported(
                "This submission has already been imported to this project",
            ));
        }
        Some(_) => {
            return Err(ApiError::AlreadyImported(
                "This submission has already been imported to another project",
            ));
        }
        None => {}
    }

    if store::convert_submission(&conn, submission_id, project_id)? == 0 {
        // A concurrent import won the conditional update.
        return Err(ApiError::AlreadyImported(
            "This submission has already been imported",
        ));
    }
    info!("imported submission {submission_id} into project {project_id}");
    Ok(submission_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::model::client::Client;
    use common::model::project::{Project, ProjectStatus};
    use common::model::submission::{OnboardingSubmission, SubmissionStatus};
    use common::model::template::OnboardingTemplate;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.sqlite"));
        db.init().unwrap();
        (dir, db)
    }

    fn seed(db: &Database) {
        let now = Utc::now();
        let conn = db.open().unwrap();
        store::insert_template(
            &conn,
            &OnboardingTemplate {
                id: "t1".to_string(),
                slug: "web-design".to_string(),
                name: "Web Design".to_string(),
                description: None,
                fields: Vec::new(),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();
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
        for (id, slug) in [("p1", "p1-slug"), ("p2", "p2-slug")] {
            store::insert_project(
                &conn,
                &Project {
                    id: id.to_string(),
                    slug: slug.to_string(),
                    name: "Site".to_string(),
                    client_id: "c1".to_string(),
                    status: ProjectStatus::Active,
                    description: None,
                    start_date: None,
                    target_end_date: None,
                    dashboard_password: None,
                    created_at: now,
                    updated_at: now,
                    client: None,
                    milestones: None,
                    client_tasks: None,
                },
            )
            .unwrap();
        }
        store::insert_submission(
            &conn,
            &OnboardingSubmission {
                id: "s1".to_string(),
                template_id: "t1".to_string(),
                project_id: None,
                data: serde_json::Map::new(),
                files: Vec::new(),
                status: SubmissionStatus::Pending,
                submitted_at: now,
                template: None,
                project: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn import_converts_then_refuses_everything() {
        let (_dir, db) = test_db();
        seed(&db);

        import_submission(&db, "p1", "s1").unwrap();
        let conn = db.open().unwrap();
        let s = store::get_submission(&conn, "s1").unwrap().unwrap();
        assert_eq!(s.status, SubmissionStatus::Converted);
        assert_eq!(s.project_id.as_deref(), Some("p1"));

        // Same project and different project both fail after conversion.
        assert!(matches!(
            import_submission(&db, "p1", "s1").unwrap_err(),
            ApiError::AlreadyImported(_)
        ));
        assert!(matches!(
            import_submission(&db, "p2", "s1").unwrap_err(),
            ApiError::AlreadyImported(_)
        ));
    }

    #[test]
    fn import_into_missing_entities_reports_not_found() {
        let (_dir, db) = test_db();
        seed(&db);
        assert!(matches!(
            import_submission(&db, "ghost", "s1").unwrap_err(),
            ApiError::NotFound("Project")
        ));
        assert!(matches!(
            import_submission(&db, "p1", "ghost").unwrap_err(),
            ApiError::NotFound("Submission")
        ));
    }

    #[test]
    fn blank_submission_id_is_a_validation_error() {
        let (_dir, db) = test_db();
        seed(&db);
        assert!(matches!(
            import_submission(&db, "p1", "  ").unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
