use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Upcoming,
    InProgress,
    Complete,
    Blocked,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Upcoming => "upcoming",
            MilestoneStatus::InProgress => "in_progress",
            MilestoneStatus::Complete => "complete",
            MilestoneStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Option<MilestoneStatus> {
        match s {
            "upcoming" => Some(MilestoneStatus::Upcoming),
            "in_progress" => Some(MilestoneStatus::InProgress),
            "complete" => Some(MilestoneStatus::Complete),
            "blocked" => Some(MilestoneStatus::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: MilestoneStatus,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
