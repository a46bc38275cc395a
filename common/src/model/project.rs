use crate::model::client::Client;
use crate::model::client_task::ClientTask;
use crate::model::milestone::Milestone;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<ProjectStatus> {
        match s {
            "pending" => Some(ProjectStatus::Pending),
            "active" => Some(ProjectStatus::Active),
            "on_hold" => Some(ProjectStatus::OnHold),
            "completed" => Some(ProjectStatus::Completed),
            "cancelled" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }
}

/// A client engagement. The `dashboard_password` column holds a bcrypt hash
/// and is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub client_id: String,
    pub status: ProjectStatus,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub target_end_date: Option<NaiveDate>,
    #[serde(skip_serializing, default)]
    pub dashboard_password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Relationships, populated on the expanded fetch paths.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub client: Option<Client>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub milestones: Option<Vec<Milestone>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub client_tasks: Option<Vec<ClientTask>>,
}
