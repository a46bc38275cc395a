//! SQLite access.
//!
//! The server never touches an ambient connection: a `Database` handle
//! carrying the file path lives in the shared application state, and each
//! request handler opens its own connection from it. Schema bootstrap runs
//! once at startup.

pub mod store;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P) -> Database {
        Database {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Opens a connection with foreign keys enforced.
    pub fn open(&self) -> Result<Connection, ApiError> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Creates all tables and indexes if they do not exist yet.
    pub fn init(&self) -> Result<(), ApiError> {
        let conn = self.open()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    phone       TEXT,
    company     TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id                  TEXT PRIMARY KEY,
    slug                TEXT NOT NULL UNIQUE,
    name                TEXT NOT NULL,
    client_id           TEXT NOT NULL REFERENCES clients(id),
    status              TEXT NOT NULL,
    description         TEXT,
    start_date          TEXT,
    target_end_date     TEXT,
    dashboard_password  TEXT,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS milestones (
    id          TEXT PRIMARY KEY,
    project_id  TEXT NOT NULL REFERENCES projects(id),
    name        TEXT NOT NULL,
    description TEXT,
    due_date    TEXT,
    status      TEXT NOT NULL,
    sort_order  INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS client_tasks (
    id            TEXT PRIMARY KEY,
    project_id    TEXT NOT NULL REFERENCES projects(id),
    title         TEXT NOT NULL,
    description   TEXT,
    priority      TEXT NOT NULL,
    status        TEXT NOT NULL,
    due_date      TEXT,
    links         TEXT NOT NULL DEFAULT '[]',
    files         TEXT NOT NULL DEFAULT '[]',
    completed_at  TEXT,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS onboarding_templates (
    id          TEXT PRIMARY KEY,
    slug        TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    description TEXT,
    fields      TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS onboarding_submissions (
    id            TEXT PRIMARY KEY,
    template_id   TEXT NOT NULL REFERENCES onboarding_templates(id),
    project_id    TEXT REFERENCES projects(id),
    data          TEXT NOT NULL,
    files         TEXT NOT NULL DEFAULT '[]',
    status        TEXT NOT NULL,
    submitted_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS onboarding_links (
    id            TEXT PRIMARY KEY,
    link_id       TEXT NOT NULL UNIQUE,
    template_id   TEXT NOT NULL REFERENCES onboarding_templates(id),
    project_id    TEXT REFERENCES projects(id),
    submission_id TEXT REFERENCES onboarding_submissions(id),
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_submissions_status ON onboarding_submissions(status);
CREATE INDEX IF NOT EXISTS idx_links_project ON onboarding_links(project_id);
CREATE INDEX IF NOT EXISTS idx_client_tasks_project ON client_tasks(project_id);
"#;
