//! Attachment upload for the public onboarding form.
//!
//! Multipart request with three parts, metadata first: `fieldName` and
//! `onboardingId` as text parts, then `file`. The blob lands under
//! `{upload_root}/onboarding/{onboardingId}/{fieldName}/{generated}.{ext}`
//! and the handler returns that relative path for the form to include in
//! its submission payload.
//!
//! Uploads in a batch are independent: if a later file in the same form
//! fails, earlier blobs stay on disk without a submission referencing them.
//! That orphaning is accepted for this workload; the paths are logged so an
//! operator can sweep them.

use std::fs;
use std::io::Write;
use std::path::Path;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::info;
use serde_json::json;
use tempfile::NamedTempFile;

use crate::error::{ok_envelope, ApiError};
use crate::ids::generate_id;
use crate::state::AppState;

pub async fn process(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut field_name: Option<String> = None;
    let mut onboarding_id: Option<String> = None;
    let mut stored: Option<(NamedTempFile, String)> = None;

    while let Some(item) = payload.next().await {
        let mut part = item.map_err(|e| ApiError::Validation(format!("bad multipart body: {e}")))?;
        let part_name = part
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match part_name.as_deref() {
            Some("fieldName") => field_name = Some(read_text(&mut part).await?),
            Some("onboardingId") => onboarding_id = Some(read_text(&mut part).await?),
            Some("file") => {
                let original = part
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                let ext = Path::new(&original)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("bin")
                    .to_string();

                // Spool to a temp file; the final path needs the metadata
                // parts, which must precede the file part.
                let mut spool = NamedTempFile::new()?;
                while let Some(chunk) = part.next().await {
                    let chunk =
                        chunk.map_err(|e| ApiError::Validation(format!("upload aborted: {e}")))?;
                    spool.write_all(&chunk)?;
                }
                stored = Some((spool, ext));
            }
            _ => {}
        }
    }

    let (spool, ext) = stored.ok_or_else(|| ApiError::Validation("No file provided".to_string()))?;
    let field_name =
        field_name.ok_or_else(|| ApiError::Validation("fieldName is required".to_string()))?;
    let onboarding_id =
        onboarding_id.ok_or_else(|| ApiError::Validation("onboardingId is required".to_string()))?;
    check_path_component(&field_name)?;
    check_path_component(&onboarding_id)?;

    let relative = format!(
        "onboarding/{}/{}/{}.{}",
        onboarding_id,
        field_name,
        generate_id(),
        ext
    );
    let target = state.upload_dir.join(&relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    // persist() fails across filesystems; fall back to a copy.
    if let Err(e) = spool.persist(&target) {
        fs::copy(e.file.path(), &target)?;
    }

    info!("stored onboarding upload at {relative}");
    Ok(ok_envelope(json!({ "path": relative })))
}

async fn read_text(part: &mut actix_multipart::Field) -> Result<String, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = part.next().await {
        let chunk = chunk.map_err(|e| ApiError::Validation(format!("bad multipart body: {e}")))?;
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes)
        .map_err(|_| ApiError::Validation("text part is not valid UTF-8".to_string()))
}

fn check_path_component(value: &str) -> Result<(), ApiError> {
    if value.is_empty()
        || value.contains('/')
        || value.contains('\\')
        || value.contains("..")
    {
        return Err(ApiError::Validation(format!(
            "invalid path component: {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_components_reject_traversal() {
        assert!(check_path_component("brand_assets").is_ok());
        assert!(check_path_component("..").is_err());
        assert!(check_path_component("a/b").is_err());
        assert!(check_path_component("").is_err());
    }
}
