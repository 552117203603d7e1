//! Multipart reading shared by the upload endpoints.

use std::collections::HashMap;

use axum::extract::{multipart::Field, Multipart};
use leadrecon_engine::{decode_upload, EngineError, RawRow};
use tokio::task::{JoinError, JoinHandle};

use super::ApiError;

/// Multipart part names carrying ad-platform reports.
pub(super) const AD_FILE_PARTS: [&str; 2] = ["files[]", "files"];

#[derive(Debug)]
pub(super) struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Part names an endpoint accepts besides the ad-platform reports.
#[derive(Debug, Clone, Copy)]
pub(super) struct UploadParts {
    /// A part that may appear at most once and carries a file.
    pub single_file: &'static str,
    /// Parts carrying plain text values.
    pub text: &'static [&'static str],
}

#[derive(Debug, Default)]
pub(super) struct Upload {
    pub ad_files: Vec<UploadedFile>,
    pub single_file: Option<UploadedFile>,
    pub text: HashMap<String, String>,
}

pub(super) async fn read_upload(
    mut multipart: Multipart,
    parts: UploadParts,
    req_id: &str,
) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("invalid multipart body: {e}"),
        )
    })? {
        let part = field.name().unwrap_or_default().to_owned();

        if parts.text.contains(&part.as_str()) {
            let value = field.text().await.map_err(|e| read_error(req_id, &part, &e))?;
            upload.text.insert(part, value.trim().to_owned());
        } else if AD_FILE_PARTS.contains(&part.as_str()) {
            upload.ad_files.push(read_file(field, &part, req_id).await?);
        } else if part == parts.single_file {
            let file = read_file(field, &part, req_id).await?;
            if upload.single_file.replace(file).is_some() {
                return Err(ApiError::new(
                    req_id,
                    "validation_error",
                    format!("only one '{part}' part is allowed"),
                ));
            }
        } else {
            tracing::warn!(part = %part, "ignoring unexpected multipart part");
        }
    }

    Ok(upload)
}

async fn read_file(field: Field<'_>, part: &str, req_id: &str) -> Result<UploadedFile, ApiError> {
    let name = field
        .file_name()
        .map_or_else(|| part.to_owned(), ToOwned::to_owned);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| read_error(req_id, part, &e))?;

    if bytes.is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("uploaded file '{name}' is empty"),
        ));
    }

    Ok(UploadedFile {
        name,
        bytes: bytes.to_vec(),
    })
}

fn read_error(req_id: &str, part: &str, error: &impl std::fmt::Display) -> ApiError {
    ApiError::new(
        req_id,
        "validation_error",
        format!("failed to read part '{part}': {error}"),
    )
}

/// Decodes one uploaded file on the blocking pool.
pub(super) fn decode_in_background(
    file: UploadedFile,
) -> JoinHandle<Result<Vec<RawRow>, EngineError>> {
    tokio::task::spawn_blocking(move || decode_upload(&file.name, &file.bytes))
}

pub(super) fn join_error(request_id: String, error: &JoinError) -> ApiError {
    tracing::error!(error = %error, "blocking task failed");
    ApiError::new(
        request_id,
        "processing_failed",
        "failed to process the uploaded files",
    )
}
