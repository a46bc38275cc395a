use crate::model::project::Project;
use crate::model::template::OnboardingTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Submission lifecycle. `Converted` is terminal: the only way in is the
/// import operation, and there is no way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Reviewed,
    Converted,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Reviewed => "reviewed",
            SubmissionStatus::Converted => "converted",
        }
    }

    pub fn parse(s: &str) -> Option<SubmissionStatus> {
        match s {
            "pending" => Some(SubmissionStatus::Pending),
            "reviewed" => Some(SubmissionStatus::Reviewed),
            "converted" => Some(SubmissionStatus::Converted),
            _ => None,
        }
    }
}

/// A filled-out instance of a template.
///
/// `data` is the open field-name -> value mapping captured from the form;
/// values are strings, or arrays of strings for multi-valued fields.
/// `files` holds storage paths of uploaded attachments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSubmission {
    pub id: String,
    pub template_id: String,
    pub project_id: Option<String>,
    pub data: Map<String, Value>,
    pub files: Vec<String>,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub template: Option<OnboardingTemplate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project: Option<Project>,
}
