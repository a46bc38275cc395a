use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientTaskStatus {
    Pending,
    Completed,
    Blocked,
}

impl ClientTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientTaskStatus::Pending => "pending",
            ClientTaskStatus::Completed => "completed",
            ClientTaskStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<ClientTaskStatus> {
        match s {
            "pending" => Some(ClientTaskStatus::Pending),
            "completed" => Some(ClientTaskStatus::Completed),
            "blocked" => Some(ClientTaskStatus::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientTaskPriority {
    High,
    Medium,
    Low,
}

impl ClientTaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientTaskPriority::High => "high",
            ClientTaskPriority::Medium => "medium",
            ClientTaskPriority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<ClientTaskPriority> {
        match s {
            "high" => Some(ClientTaskPriority::High),
            "medium" => Some(ClientTaskPriority::Medium),
            "low" => Some(ClientTaskPriority::Low),
            _ => None,
        }
    }
}

/// An external reference attached to a client task ("review this mockup").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientTaskLink {
    pub label: String,
    pub url: String,
}

/// A to-do item assigned to the external party holding a valid project
/// access credential. Only the `pending -> completed` transition is
/// reachable through the client dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientTask {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: ClientTaskPriority,
    pub status: ClientTaskStatus,
    pub due_date: Option<NaiveDate>,
    pub links: Vec<ClientTaskLink>,
    pub files: Vec<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
