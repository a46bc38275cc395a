//! Server-side validation of submitted values against the template schema.
//!
//! The form UI enforces most of this client-side, but the submission
//! endpoint is public, so nothing that reaches the store is trusted to have
//! come from the form. Values are strings, or arrays of strings for
//! multi-valued fields; file fields are satisfied through the uploaded-path
//! list rather than the data map.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use common::model::template::{FieldType, OnboardingTemplateField};

use crate::error::ApiError;

pub fn validate_submission(
    fields: &[OnboardingTemplateField],
    data: &Map<String, Value>,
    files: &[String],
) -> Result<(), ApiError> {
    for key in data.keys() {
        if !fields.iter().any(|f| &f.name == key) {
            return Err(ApiError::Validation(format!("unknown field: {key}")));
        }
    }

    for field in fields {
        let value = data.get(&field.name);
        if field.required && !is_present(field, value, files) {
            return Err(ApiError::Validation(format!(
                "{} is required",
                field.label
            )));
        }
        if let Some(value) = value {
            check_shape(field, value)?;
        }
    }
    Ok(())
}

fn is_present(field: &OnboardingTemplateField, value: Option<&Value>, files: &[String]) -> bool {
    if field.field_type == FieldType::File {
        // Upload paths embed the field name: onboarding/{id}/{field}/{file}.
        let marker = format!("/{}/", field.name);
        return files.iter().any(|path| path.contains(&marker));
    }
    match value {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        _ => false,
    }
}

fn check_shape(field: &OnboardingTemplateField, value: &Value) -> Result<(), ApiError> {
    match field.field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Tel => {
            expect_string(field, value)?;
        }
        FieldType::Email => {
            let s = expect_string(field, value)?;
            if !s.is_empty() && !(s.contains('@') && s.contains('.')) {
                return Err(ApiError::Validation(format!(
                    "{} must be a valid email address",
                    field.label
                )));
            }
        }
        FieldType::Select => {
            let s = expect_string(field, value)?;
            if let Some(options) = &field.options {
                if !s.is_empty() && !options.iter().any(|o| o == s) {
                    return Err(ApiError::Validation(format!(
                        "{} must be one of the listed options",
                        field.label
                    )));
                }
            }
        }
        FieldType::Date => {
            let s = expect_string(field, value)?;
            if !s.is_empty() && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                return Err(ApiError::Validation(format!(
                    "{} must be a date in YYYY-MM-DD form",
                    field.label
                )));
            }
        }
        FieldType::UrlList => match value {
            Value::Array(items) if items.iter().all(Value::is_string) => {}
            Value::String(_) => {}
            _ => {
                return Err(ApiError::Validation(format!(
                    "{} must be a list of URLs",
                    field.label
                )))
            }
        },
        // File field values travel in the files list, not the data map.
        FieldType::File => {}
    }
    Ok(())
}

fn expect_string<'a>(
    field: &OnboardingTemplateField,
    value: &'a Value,
) -> Result<&'a str, ApiError> {
    value.as_str().ok_or_else(|| {
        ApiError::Validation(format!("{} must be a string value", field.label))
    })
}
