use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The input widget a form field renders as, and the shape its submitted
/// value must take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Tel,
    Textarea,
    Select,
    Date,
    UrlList,
    File,
}

/// One typed input in an onboarding form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingTemplateField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub accept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub multiple: Option<bool>,
}

/// A named schema of form fields, addressed publicly by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingTemplate {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<OnboardingTemplateField>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
