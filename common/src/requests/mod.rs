use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::template::OnboardingTemplateField;

/// Payload for creating an onboarding link. The opaque public identifier
/// is generated server-side.
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub template_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Query-string filters for the link list endpoint.
#[derive(Debug, Deserialize)]
pub struct LinkListQuery {
    #[serde(default)]
    pub project_id: Option<String>,
    /// "true" keeps only fulfilled links, "false" only open ones.
    #[serde(default)]
    pub has_submission: Option<String>,
}

/// Public form submission payload.
#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub template_id: String,
    /// Opaque identifier of the originating link, when the form was reached
    /// through one.
    #[serde(default)]
    pub link_id: Option<String>,
    pub data: Map<String, Value>,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Query-string filters for the submission list endpoint.
#[derive(Debug, Deserialize)]
pub struct SubmissionListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// Operator status change for a submission (`pending -> reviewed` only;
/// conversion happens through the import endpoint).
#[derive(Debug, Deserialize)]
pub struct UpdateSubmissionRequest {
    pub status: String,
}

/// Admin update of an onboarding template; absent fields are left as-is.
#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<OnboardingTemplateField>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Body for `POST /api/projects/{project_id}/import-onboarding`.
#[derive(Debug, Deserialize)]
pub struct ImportOnboardingRequest {
    pub submission_id: String,
}

/// Body for the client dashboard password exchange.
#[derive(Debug, Deserialize)]
pub struct ClientAuthRequest {
    pub slug: String,
    pub password: String,
}
