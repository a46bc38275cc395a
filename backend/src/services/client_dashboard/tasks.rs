//! Client task completion through the dashboard.
//!
//! The only write an external party can perform: moving one of their own
//! project's tasks from `pending` to `completed`. Scope is checked against
//! the token claim before the transition; tasks that are already completed
//! or blocked are rejected rather than silently re-stamped.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;

use common::model::client_task::{ClientTask, ClientTaskStatus};

use crate::db::{store, Database};
use crate::error::{ok_envelope, ApiError};
use crate::services::client_dashboard::project_claim;
use crate::state::AppState;

pub async fn complete(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let (slug, task_id) = path.into_inner();
    let claimed_project = project_claim(&req, &state.jwt_secret, &slug)?;
    let task = complete_task(&state.db, &claimed_project, &task_id)?;
    Ok(ok_envelope(task))
}

pub(crate) fn complete_task(
    db: &Database,
    claimed_project_id: &str,
    task_id: &str,
) -> Result<ClientTask, ApiError> {
    let conn = db.open()?;
    let task = store::get_client_task(&conn, task_id)?.ok_or(ApiError::NotFound("Task"))?;
    if task.project_id != claimed_project_id {
        return Err(ApiError::Forbidden);
    }
    match task.status {
        ClientTaskStatus::Pending => {}
        ClientTaskStatus::Completed => {
            return Err(ApiError::Validation(
                "task has already been completed".to_string(),
            ))
        }
        ClientTaskStatus::Blocked => {
            return Err(ApiError::Validation(
                "a blocked task cannot be completed".to_string(),
            ))
        }
    }
    if store::complete_client_task(&conn, task_id, Utc::now())? == 0 {
        return Err(ApiError::Validation(
            "task has already been completed".to_string(),
        ));
    }
    store::get_client_task(&conn, task_id)?.ok_or(ApiError::NotFound("Task"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::model::client::Client;
    use common::model::client_task::ClientTaskPriority;
    use common::model::project::{Project, ProjectStatus};
    use tempfile::TempDir;

    fn seed() -> (TempDir, Database) {
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
        for (id, slug) in [("p2", "p2-slug"), ("p3", "p3-slug")] {
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
        for (id, project_id, status) in [
            ("ct-p2", "p2", ClientTaskStatus::Pending),
            ("ct-p3", "p3", ClientTaskStatus::Pending),
            ("ct-blocked", "p2", ClientTaskStatus::Blocked),
        ] {
            store::insert_client_task(
                &conn,
                &ClientTask {
                    id: id.to_string(),
                    project_id: project_id.to_string(),
                    title: "Send logo files".to_string(),
                    description: None,
                    priority: ClientTaskPriority::Medium,
                    status,
                    due_date: None,
                    links: Vec::new(),
                    files: Vec::new(),
                    completed_at: None,
                    created_at: now,
                    updated_at: now,
                },
            )
            .unwrap();
        }
        (dir, db)
    }

    #[test]
    fn completes_own_pending_task() {
        let (_dir, db) = seed();
        let task = complete_task(&db, "p2", "ct-p2").unwrap();
        assert_eq!(task.status, ClientTaskStatus::Completed);
        assert!(task.completed_at.is_some());
    }

    #[test]
    fn foreign_task_is_forbidden() {
        let (_dir, db) = seed();
        assert!(matches!(
            complete_task(&db, "p2", "ct-p3").unwrap_err(),
            ApiError::Forbidden
        ));
        // The task must be untouched.
        let conn = db.open().unwrap();
        let task = store::get_client_task(&conn, "ct-p3").unwrap().unwrap();
        assert_eq!(task.status, ClientTaskStatus::Pending);
    }

    #[test]
    fn re_completion_and_blocked_are_rejected() {
        let (_dir, db) = seed();
        complete_task(&db, "p2", "ct-p2").unwrap();
        assert!(matches!(
            complete_task(&db, "p2", "ct-p2").unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            complete_task(&db, "p2", "ct-blocked").unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn missing_task_is_not_found() {
        let (_dir, db) = seed();
        assert!(matches!(
            complete_task(&db, "p2", "ghost").unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
