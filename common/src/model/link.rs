use crate::model::project::Project;
use crate::model::submission::OnboardingSubmission;
use crate::model::template::OnboardingTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One distributable invitation to fill a template.
///
/// `link_id` is the opaque identifier used in the public URL. `submission_id`
/// is written back exactly once, when the form behind the link is submitted;
/// a fulfilled link never accepts a second submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingLink {
    pub id: String,
    pub link_id: String,
    pub template_id: String,
    pub project_id: Option<String>,
    pub submission_id: Option<String>,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub template: Option<OnboardingTemplate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project: Option<Project>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub submission: Option<OnboardingSubmission>,
}
