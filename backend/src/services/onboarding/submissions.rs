//! Submission endpoints.
//!
//! ## Workflow
//!
//! 1. A visitor opens a link and the form posts here. The payload is
//!    validated against the template's field schema before anything is
//!    written.
//! 2. When the submission originates from a link, the link's pre-associated
//!    project (if any) is copied onto the submission, and the submission is
//!    written back onto the link. Both happen in one transaction, and the
//!    write-back is conditional on the link still being open: a fulfilled
//!    link never accepts a second submission, even under concurrent posts.
//! 3. The submission starts `pending` either way. Pre-linking does not skip
//!    operator review.
//! 4. An operator acknowledges it via PATCH (`pending -> reviewed`).
//!    Conversion only ever happens through the project import endpoint.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::submission::{OnboardingSubmission, SubmissionStatus};
use common::requests::{CreateSubmissionRequest, SubmissionListQuery, UpdateSubmissionRequest};
use uuid::Uuid;

use crate::db::{store, Database};
use crate::error::{ok_envelope, ApiError};
use crate::services::onboarding::validate::validate_submission;
use crate::state::AppState;

pub async fn create(
    state: web::Data<AppState>,
    payload: web::Json<CreateSubmissionRequest>,
) -> Result<HttpResponse, ApiError> {
    let submission = create_submission(&state.db, &payload)?;
    Ok(ok_envelope(submission))
}

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<SubmissionListQuery>,
) -> Result<HttpResponse, ApiError> {
    if let Some(status) = &query.status {
        if SubmissionStatus::parse(status).is_none() {
            return Err(ApiError::Validation(format!("unknown status: {status}")));
        }
    }
    let conn = state.db.open()?;
    let submissions = store::list_submissions(&conn, query.status.as_deref())?;
    Ok(ok_envelope(submissions))
}

pub async fn get_one(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let conn = state.db.open()?;
    let submission =
        store::get_submission(&conn, &id)?.ok_or(ApiError::NotFound("Submission"))?;
    Ok(ok_envelope(store::expand_submission(&conn, submission)?))
}

pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<UpdateSubmissionRequest>,
) -> Result<HttpResponse, ApiError> {
    let submission = review_submission(&state.db, &id, &payload)?;
    Ok(ok_envelope(submission))
}

pub(crate) fn create_submission(
    db: &Database,
    req: &CreateSubmissionRequest,
) -> Result<OnboardingSubmission, ApiError> {
    let mut conn = db.open()?;
    let template =
        store::get_template(&conn, &req.template_id)?.ok_or(ApiError::NotFound("Template"))?;
    validate_submission(&template.fields, &req.data, &req.files)?;

    let mut project_id = None;
    if let Some(link_id) = &req.link_id {
        let link = store::get_link(&conn, link_id)?.ok_or(ApiError::NotFound("Link"))?;
        if link.submission_id.is_some() {
            return Err(ApiError::LinkFulfilled);
        }
        project_id = link.project_id;
    }

    let submission = OnboardingSubmission {
        id: Uuid::new_v4().to_string(),
        template_id: req.template_id.clone(),
        project_id,
        data: req.data.clone(),
        files: req.files.clone(),
        status: SubmissionStatus::Pending,
        submitted_at: Utc::now(),
        template: None,
        project: None,
    };

    let tx = conn.transaction()?;
    store::insert_submission(&tx, &submission)?;
    if let Some(link_id) = &req.link_id {
        // The conditional claim loses against a concurrent submit; rolling
        // back here keeps the losing submission out of the store entirely.
        if store::claim_link(&tx, link_id, &submission.id)? == 0 {
            return Err(ApiError::LinkFulfilled);
        }
    }
    tx.commit()?;
    Ok(submission)
}

pub(crate) fn review_submission(
    db: &Database,
    id: &str,
    req: &UpdateSubmissionRequest,
) -> Result<OnboardingSubmission, ApiError> {
    if req.status != "reviewed" {
        return Err(ApiError::Validation(
            "only the reviewed status can be set directly".to_string(),
        ));
    }
    let conn = db.open()?;
    let submission = store::get_submission(&conn, id)?.ok_or(ApiError::NotFound("Submission"))?;
    match submission.status {
        SubmissionStatus::Pending => {}
        SubmissionStatus::Reviewed => {
            return Err(ApiError::Validation(
                "submission has already been reviewed".to_string(),
            ))
        }
        SubmissionStatus::Converted => {
            return Err(ApiError::Validation(
                "a converted submission cannot change status".to_string(),
            ))
        }
    }
    if store::mark_submission_reviewed(&conn, id)? == 0 {
        return Err(ApiError::Validation(
            "submission has already been reviewed".to_string(),
        ));
    }
    store::get_submission(&conn, id)?.ok_or(ApiError::NotFound("Submission"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::onboarding::links::create_link;
    use common::model::client::Client;
    use common::model::project::{Project, ProjectStatus};
    use common::model::template::{FieldType, OnboardingTemplate, OnboardingTemplateField};
    use common::requests::CreateLinkRequest;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.sqlite"));
        db.init().unwrap();
        (dir, db)
    }

    fn seed_template(db: &Database) {
        let now = Utc::now();
        let conn = db.open().unwrap();
        let text_field = |name: &str, field_type| OnboardingTemplateField {
            name: name.to_string(),
            label: name.to_string(),
            field_type,
            required: true,
            placeholder: None,
            options: None,
            accept: None,
            multiple: None,
        };
        store::insert_template(
            &conn,
            &OnboardingTemplate {
                id: "t1".to_string(),
                slug: "web-design".to_string(),
                name: "Web Design".to_string(),
                description: None,
                fields: vec![
                    text_field("name", FieldType::Text),
                    text_field("email", FieldType::Email),
                ],
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();
    }

    fn seed_project(db: &Database, id: &str, slug: &str) {
        let now = Utc::now();
        let conn = db.open().unwrap();
        store::insert_client(
            &conn,
            &Client {
                id: format!("client-{id}"),
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
                id: id.to_string(),
                slug: slug.to_string(),
                name: "Acme Site".to_string(),
                client_id: format!("client-{id}"),
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

    fn valid_data() -> serde_json::Map<String, serde_json::Value> {
        [
            ("name".to_string(), json!("Acme")),
            ("email".to_string(), json!("a@acme.com")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn submit_via_link_writes_back_onto_the_link() {
        let (_dir, db) = test_db();
        seed_template(&db);
        let link = create_link(
            &db,
            &CreateLinkRequest {
                template_id: "t1".to_string(),
                project_id: None,
            },
        )
        .unwrap();

        let submission = create_submission(
            &db,
            &CreateSubmissionRequest {
                template_id: "t1".to_string(),
                link_id: Some(link.link_id.clone()),
                data: valid_data(),
                files: Vec::new(),
            },
        )
        .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.project_id, None);

        let conn = db.open().unwrap();
        let stored_link = store::get_link(&conn, &link.link_id).unwrap().unwrap();
        assert_eq!(stored_link.submission_id.as_deref(), Some(submission.id.as_str()));
    }

    #[test]
    fn fulfilled_link_rejects_a_second_submission() {
        let (_dir, db) = test_db();
        seed_template(&db);
        let link = create_link(
            &db,
            &CreateLinkRequest {
                template_id: "t1".to_string(),
                project_id: None,
            },
        )
        .unwrap();
        let req = CreateSubmissionRequest {
            template_id: "t1".to_string(),
            link_id: Some(link.link_id.clone()),
            data: valid_data(),
            files: Vec::new(),
        };
        create_submission(&db, &req).unwrap();
        let err = create_submission(&db, &req).unwrap_err();
        assert!(matches!(err, ApiError::LinkFulfilled));

        // The rejected submission must not linger in the store.
        let conn = db.open().unwrap();
        let all = store::list_submissions(&conn, None).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn pre_linked_submission_stays_pending() {
        let (_dir, db) = test_db();
        seed_template(&db);
        seed_project(&db, "p3", "p3-slug");
        let link = create_link(
            &db,
            &CreateLinkRequest {
                template_id: "t1".to_string(),
                project_id: Some("p3".to_string()),
            },
        )
        .unwrap();

        let submission = create_submission(
            &db,
            &CreateSubmissionRequest {
                template_id: "t1".to_string(),
                link_id: Some(link.link_id),
                data: valid_data(),
                files: Vec::new(),
            },
        )
        .unwrap();

        assert_eq!(submission.project_id.as_deref(), Some("p3"));
        assert_eq!(submission.status, SubmissionStatus::Pending);
    }

    #[test]
    fn invalid_payload_is_rejected_before_any_write() {
        let (_dir, db) = test_db();
        seed_template(&db);
        let err = create_submission(
            &db,
            &CreateSubmissionRequest {
                template_id: "t1".to_string(),
                link_id: None,
                data: [("name".to_string(), json!("Acme"))].into_iter().collect(),
                files: Vec::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let conn = db.open().unwrap();
        assert!(store::list_submissions(&conn, None).unwrap().is_empty());
    }

    #[test]
    fn review_transition_rules() {
        let (_dir, db) = test_db();
        seed_template(&db);
        let submission = create_submission(
            &db,
            &CreateSubmissionRequest {
                template_id: "t1".to_string(),
                link_id: None,
                data: valid_data(),
                files: Vec::new(),
            },
        )
        .unwrap();

        let reviewed = review_submission(
            &db,
            &submission.id,
            &UpdateSubmissionRequest {
                status: "reviewed".to_string(),
            },
        )
        .unwrap();
        assert_eq!(reviewed.status, SubmissionStatus::Reviewed);

        // Second review fails, as does any other direct status value.
        assert!(review_submission(
            &db,
            &submission.id,
            &UpdateSubmissionRequest {
                status: "reviewed".to_string()
            }
        )
        .is_err());
        assert!(review_submission(
            &db,
            &submission.id,
            &UpdateSubmissionRequest {
                status: "converted".to_string()
            }
        )
        .is_err());
    }
}
