//! All SQL lives here. Handlers call these functions with a connection from
//! the `Database` handle; none of them open connections themselves, which
//! keeps multi-statement operations on one connection and makes the whole
//! layer testable against a throwaway file.
//!
//! The two invariant-carrying writes are `claim_link` and
//! `convert_submission`: both are single conditional UPDATEs whose WHERE
//! clause re-checks the "still unset" precondition, so a concurrent racer
//! sees zero affected rows instead of clobbering the first writer.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;

use common::model::client::Client;
use common::model::client_task::{ClientTask, ClientTaskPriority, ClientTaskStatus};
use common::model::link::OnboardingLink;
use common::model::milestone::{Milestone, MilestoneStatus};
use common::model::project::{Project, ProjectStatus};
use common::model::submission::{OnboardingSubmission, SubmissionStatus};
use common::model::template::OnboardingTemplate;
use common::requests::{LinkListQuery, UpdateTemplateRequest};

use crate::error::ApiError;

fn json_col<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn enum_col<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unrecognized enum value: {raw}").into(),
        )
    })
}

// ---------------------------------------------------------------------------
// Templates

const TEMPLATE_COLS: &str = "id, slug, name, description, fields, is_active, created_at, updated_at";

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<OnboardingTemplate> {
    Ok(OnboardingTemplate {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        fields: json_col(row, 4)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub fn insert_template(conn: &Connection, t: &OnboardingTemplate) -> Result<(), ApiError> {
    conn.execute(
        "INSERT INTO onboarding_templates (id, slug, name, description, fields, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            t.id,
            t.slug,
            t.name,
            t.description,
            serde_json::to_string(&t.fields).map_err(storage_json)?,
            t.is_active,
            t.created_at,
            t.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_template(conn: &Connection, id: &str) -> Result<Option<OnboardingTemplate>, ApiError> {
    let sql = format!("SELECT {TEMPLATE_COLS} FROM onboarding_templates WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], template_from_row)
        .optional()?)
}

pub fn get_template_by_slug(
    conn: &Connection,
    slug: &str,
    active_only: bool,
) -> Result<Option<OnboardingTemplate>, ApiError> {
    let sql = if active_only {
        format!("SELECT {TEMPLATE_COLS} FROM onboarding_templates WHERE slug = ?1 AND is_active = 1")
    } else {
        format!("SELECT {TEMPLATE_COLS} FROM onboarding_templates WHERE slug = ?1")
    };
    Ok(conn
        .query_row(&sql, params![slug], template_from_row)
        .optional()?)
}

/// Applies a partial update to a template addressed by slug. Returns the
/// updated row, or `None` when the slug is unknown.
pub fn update_template(
    conn: &Connection,
    slug: &str,
    update: &UpdateTemplateRequest,
) -> Result<Option<OnboardingTemplate>, ApiError> {
    let Some(mut template) = get_template_by_slug(conn, slug, false)? else {
        return Ok(None);
    };
    if let Some(name) = &update.name {
        template.name = name.clone();
    }
    if let Some(description) = &update.description {
        template.description = Some(description.clone());
    }
    if let Some(fields) = &update.fields {
        template.fields = fields.clone();
    }
    if let Some(is_active) = update.is_active {
        template.is_active = is_active;
    }
    template.updated_at = Utc::now();
    conn.execute(
        "UPDATE onboarding_templates
         SET name = ?1, description = ?2, fields = ?3, is_active = ?4, updated_at = ?5
         WHERE slug = ?6",
        params![
            template.name,
            template.description,
            serde_json::to_string(&template.fields).map_err(storage_json)?,
            template.is_active,
            template.updated_at,
            slug,
        ],
    )?;
    Ok(Some(template))
}

// ---------------------------------------------------------------------------
// Clients and projects

pub fn insert_client(conn: &Connection, c: &Client) -> Result<(), ApiError> {
    conn.execute(
        "INSERT INTO clients (id, name, email, phone, company, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![c.id, c.name, c.email, c.phone, c.company, c.created_at, c.updated_at],
    )?;
    Ok(())
}

pub fn get_client(conn: &Connection, id: &str) -> Result<Option<Client>, ApiError> {
    Ok(conn
        .query_row(
            "SELECT id, name, email, phone, company, created_at, updated_at
             FROM clients WHERE id = ?1",
            params![id],
            |row| {
                Ok(Client {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    phone: row.get(3)?,
                    company: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            },
        )
        .optional()?)
}

const PROJECT_COLS: &str = "id, slug, name, client_id, status, description, start_date, \
                            target_end_date, dashboard_password, created_at, updated_at";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        client_id: row.get(3)?,
        status: enum_col(row, 4, ProjectStatus::parse)?,
        description: row.get(5)?,
        start_date: row.get(6)?,
        target_end_date: row.get(7)?,
        dashboard_password: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        client: None,
        milestones: None,
        client_tasks: None,
    })
}

pub fn insert_project(conn: &Connection, p: &Project) -> Result<(), ApiError> {
    conn.execute(
        "INSERT INTO projects (id, slug, name, client_id, status, description, start_date,
                               target_end_date, dashboard_password, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            p.id,
            p.slug,
            p.name,
            p.client_id,
            p.status.as_str(),
            p.description,
            p.start_date,
            p.target_end_date,
            p.dashboard_password,
            p.created_at,
            p.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_project(conn: &Connection, id: &str) -> Result<Option<Project>, ApiError> {
    let sql = format!("SELECT {PROJECT_COLS} FROM projects WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], project_from_row)
        .optional()?)
}

pub fn get_project_by_slug(conn: &Connection, slug: &str) -> Result<Option<Project>, ApiError> {
    let sql = format!("SELECT {PROJECT_COLS} FROM projects WHERE slug = ?1");
    Ok(conn
        .query_row(&sql, params![slug], project_from_row)
        .optional()?)
}

/// Fills in the client, milestones (by sort order) and client tasks of a
/// project for the dashboard and prefill paths.
pub fn expand_project(conn: &Connection, mut project: Project) -> Result<Project, ApiError> {
    project.client = get_client(conn, &project.client_id)?;

    let mut stmt = conn.prepare(
        "SELECT id, project_id, name, description, due_date, status, sort_order, created_at, updated_at
         FROM milestones WHERE project_id = ?1 ORDER BY sort_order ASC",
    )?;
    let milestones = stmt
        .query_map(params![project.id], |row| {
            Ok(Milestone {
                id: row.get(0)?,
                project_id: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
                due_date: row.get(4)?,
                status: enum_col(row, 5, MilestoneStatus::parse)?,
                sort_order: row.get(6)?,
                created_at: row.get(7)?,
                updated_at: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    project.milestones = Some(milestones);

    let mut stmt = conn.prepare(&format!(
        "SELECT {CLIENT_TASK_COLS} FROM client_tasks WHERE project_id = ?1 ORDER BY created_at ASC"
    ))?;
    let tasks = stmt
        .query_map(params![project.id], client_task_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    project.client_tasks = Some(tasks);

    Ok(project)
}

// ---------------------------------------------------------------------------
// Client tasks

const CLIENT_TASK_COLS: &str = "id, project_id, title, description, priority, status, due_date, \
                                links, files, completed_at, created_at, updated_at";

fn client_task_from_row(row: &Row<'_>) -> rusqlite::Result<ClientTask> {
    Ok(ClientTask {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        priority: enum_col(row, 4, ClientTaskPriority::parse)?,
        status: enum_col(row, 5, ClientTaskStatus::parse)?,
        due_date: row.get(6)?,
        links: json_col(row, 7)?,
        files: json_col(row, 8)?,
        completed_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

pub fn insert_client_task(conn: &Connection, t: &ClientTask) -> Result<(), ApiError> {
    conn.execute(
        "INSERT INTO client_tasks (id, project_id, title, description, priority, status, due_date,
                                   links, files, completed_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            t.id,
            t.project_id,
            t.title,
            t.description,
            t.priority.as_str(),
            t.status.as_str(),
            t.due_date,
            serde_json::to_string(&t.links).map_err(storage_json)?,
            serde_json::to_string(&t.files).map_err(storage_json)?,
            t.completed_at,
            t.created_at,
            t.updated_at,
        ],
    )?;
    Ok(())
}

pub fn insert_milestone(conn: &Connection, m: &Milestone) -> Result<(), ApiError> {
    conn.execute(
        "INSERT INTO milestones (id, project_id, name, description, due_date, status, sort_order,
                                 created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            m.id,
            m.project_id,
            m.name,
            m.description,
            m.due_date,
            m.status.as_str(),
            m.sort_order,
            m.created_at,
            m.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_client_task(conn: &Connection, id: &str) -> Result<Option<ClientTask>, ApiError> {
    let sql = format!("SELECT {CLIENT_TASK_COLS} FROM client_tasks WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], client_task_from_row)
        .optional()?)
}

/// `pending -> completed`, stamping the completion time. The status guard in
/// the WHERE clause makes completion single-shot. Returns the number of rows
/// changed (0 when the task was not pending).
pub fn complete_client_task(
    conn: &Connection,
    id: &str,
    now: DateTime<Utc>,
) -> Result<usize, ApiError> {
    Ok(conn.execute(
        "UPDATE client_tasks SET status = 'completed', completed_at = ?1, updated_at = ?1
         WHERE id = ?2 AND status = 'pending'",
        params![now, id],
    )?)
}

// ---------------------------------------------------------------------------
// Links

const LINK_COLS: &str = "id, link_id, template_id, project_id, submission_id, created_at";

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<OnboardingLink> {
    Ok(OnboardingLink {
        id: row.get(0)?,
        link_id: row.get(1)?,
        template_id: row.get(2)?,
        project_id: row.get(3)?,
        submission_id: row.get(4)?,
        created_at: row.get(5)?,
        template: None,
        project: None,
        submission: None,
    })
}

pub fn insert_link(conn: &Connection, l: &OnboardingLink) -> Result<(), ApiError> {
    conn.execute(
        "INSERT INTO onboarding_links (id, link_id, template_id, project_id, submission_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![l.id, l.link_id, l.template_id, l.project_id, l.submission_id, l.created_at],
    )?;
    Ok(())
}

pub fn get_link(conn: &Connection, link_id: &str) -> Result<Option<OnboardingLink>, ApiError> {
    let sql = format!("SELECT {LINK_COLS} FROM onboarding_links WHERE link_id = ?1");
    Ok(conn.query_row(&sql, params![link_id], link_from_row).optional()?)
}

/// Expands template, project (with its client) and submission references.
pub fn expand_link(conn: &Connection, mut link: OnboardingLink) -> Result<OnboardingLink, ApiError> {
    link.template = get_template(conn, &link.template_id)?;
    if let Some(project_id) = &link.project_id {
        if let Some(mut project) = get_project(conn, project_id)? {
            project.client = get_client(conn, &project.client_id)?;
            link.project = Some(project);
        }
    }
    if let Some(submission_id) = &link.submission_id {
        link.submission = get_submission(conn, submission_id)?;
    }
    Ok(link)
}

pub fn list_links(
    conn: &Connection,
    filter: &LinkListQuery,
) -> Result<Vec<OnboardingLink>, ApiError> {
    let mut sql = format!("SELECT {LINK_COLS} FROM onboarding_links");
    let mut clauses: Vec<String> = Vec::new();
    let mut args: Vec<String> = Vec::new();
    if let Some(project_id) = &filter.project_id {
        args.push(project_id.clone());
        clauses.push(format!("project_id = ?{}", args.len()));
    }
    match filter.has_submission.as_deref() {
        Some("true") => clauses.push("submission_id IS NOT NULL".to_string()),
        Some("false") => clauses.push("submission_id IS NULL".to_string()),
        _ => {}
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let links = stmt
        .query_map(rusqlite::params_from_iter(args.iter()), link_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    links.into_iter().map(|l| expand_link(conn, l)).collect()
}

pub fn delete_link(conn: &Connection, link_id: &str) -> Result<usize, ApiError> {
    Ok(conn.execute(
        "DELETE FROM onboarding_links WHERE link_id = ?1",
        params![link_id],
    )?)
}

/// Writes the submission back onto its originating link, but only if the
/// link is still open. Returns the number of rows changed; 0 means the link
/// was already fulfilled (possibly by a concurrent submit).
pub fn claim_link(
    conn: &Connection,
    link_id: &str,
    submission_id: &str,
) -> Result<usize, ApiError> {
    Ok(conn.execute(
        "UPDATE onboarding_links SET submission_id = ?1
         WHERE link_id = ?2 AND submission_id IS NULL",
        params![submission_id, link_id],
    )?)
}

// ---------------------------------------------------------------------------
// Submissions

const SUBMISSION_COLS: &str = "id, template_id, project_id, data, files, status, submitted_at";

fn submission_from_row(row: &Row<'_>) -> rusqlite::Result<OnboardingSubmission> {
    Ok(OnboardingSubmission {
        id: row.get(0)?,
        template_id: row.get(1)?,
        project_id: row.get(2)?,
        data: json_col(row, 3)?,
        files: json_col(row, 4)?,
        status: enum_col(row, 5, SubmissionStatus::parse)?,
        submitted_at: row.get(6)?,
        template: None,
        project: None,
    })
}

pub fn insert_submission(conn: &Connection, s: &OnboardingSubmission) -> Result<(), ApiError> {
    conn.execute(
        "INSERT INTO onboarding_submissions (id, template_id, project_id, data, files, status, submitted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            s.id,
            s.template_id,
            s.project_id,
            serde_json::to_string(&s.data).map_err(storage_json)?,
            serde_json::to_string(&s.files).map_err(storage_json)?,
            s.status.as_str(),
            s.submitted_at,
        ],
    )?;
    Ok(())
}

pub fn get_submission(
    conn: &Connection,
    id: &str,
) -> Result<Option<OnboardingSubmission>, ApiError> {
    let sql = format!("SELECT {SUBMISSION_COLS} FROM onboarding_submissions WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![id], submission_from_row)
        .optional()?)
}

pub fn expand_submission(
    conn: &Connection,
    mut submission: OnboardingSubmission,
) -> Result<OnboardingSubmission, ApiError> {
    submission.template = get_template(conn, &submission.template_id)?;
    if let Some(project_id) = &submission.project_id {
        submission.project = get_project(conn, project_id)?;
    }
    Ok(submission)
}

pub fn list_submissions(
    conn: &Connection,
    status: Option<&str>,
) -> Result<Vec<OnboardingSubmission>, ApiError> {
    let mut sql = format!("SELECT {SUBMISSION_COLS} FROM onboarding_submissions");
    let mut args: Vec<String> = Vec::new();
    if let Some(status) = status {
        args.push(status.to_string());
        sql.push_str(" WHERE status = ?1");
    }
    sql.push_str(" ORDER BY submitted_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let submissions = stmt
        .query_map(rusqlite::params_from_iter(args.iter()), submission_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    submissions
        .into_iter()
        .map(|s| expand_submission(conn, s))
        .collect()
}

/// `pending -> reviewed` only; the guard keeps reviewed and converted rows
/// untouched. Returns the number of rows changed.
pub fn mark_submission_reviewed(conn: &Connection, id: &str) -> Result<usize, ApiError> {
    Ok(conn.execute(
        "UPDATE onboarding_submissions SET status = 'reviewed'
         WHERE id = ?1 AND status = 'pending'",
        params![id],
    )?)
}

/// The import write. A single conditional UPDATE keyed on the current
/// linkage state: if two operators import the same submission concurrently,
/// exactly one sees a changed row and the other gets 0.
pub fn convert_submission(
    conn: &Connection,
    submission_id: &str,
    project_id: &str,
) -> Result<usize, ApiError> {
    Ok(conn.execute(
        "UPDATE onboarding_submissions SET project_id = ?1, status = 'converted'
         WHERE id = ?2 AND project_id IS NULL",
        params![project_id, submission_id],
    )?)
}

fn storage_json(e: serde_json::Error) -> ApiError {
    ApiError::Storage(rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}
