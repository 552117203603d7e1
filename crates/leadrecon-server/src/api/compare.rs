//! Comparison endpoints: multipart spreadsheet upload and pre-decoded JSON rows.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use futures::future::try_join_all;
use leadrecon_engine::{
    check_ad_file_count, compare, CompareInput, ComparisonReport, CompiledRules, EngineError,
    RawRow,
};

use crate::middleware::RequestId;

use super::upload::{decode_in_background, join_error, read_upload, UploadParts};
use super::{map_engine_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Multipart part name carrying the lead export.
const LEADS_PART: &str = "comparacao";

const COMPARE_PARTS: UploadParts = UploadParts {
    single_file: LEADS_PART,
    text: &[],
};

pub(super) async fn compare_upload(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ComparisonReport>>, ApiError> {
    let upload = read_upload(multipart, COMPARE_PARTS, &req_id.0).await?;

    check_ad_file_count(upload.ad_files.len(), state.ad_file_count)
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    let leads_file = upload.single_file.ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            format!(
                "expected {} ad-platform reports and 1 lead export in part '{LEADS_PART}'",
                state.ad_file_count
            ),
        )
    })?;

    let ad_tasks = upload.ad_files.into_iter().map(decode_in_background);
    let (ad_files, leads) = tokio::join!(try_join_all(ad_tasks), decode_in_background(leads_file));
    let ad_files: Vec<Vec<RawRow>> = ad_files
        .map_err(|e| join_error(req_id.0.clone(), &e))?
        .into_iter()
        .collect::<Result<_, EngineError>>()
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    let leads = leads
        .map_err(|e| join_error(req_id.0.clone(), &e))?
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    let report = run_compare(
        CompareInput { ad_files, leads },
        Arc::clone(&state.rules),
        &req_id.0,
    )
    .await?;
    tracing::info!(
        request_id = %req_id.0,
        rows = report.rows.len(),
        leads = report.totals.lead_count,
        "compare upload served"
    );

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn compare_rows(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(input): Json<CompareInput>,
) -> Result<Json<ApiResponse<ComparisonReport>>, ApiError> {
    check_ad_file_count(input.ad_files.len(), state.ad_file_count)
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    let report = run_compare(input, Arc::clone(&state.rules), &req_id.0).await?;
    tracing::info!(
        request_id = %req_id.0,
        rows = report.rows.len(),
        leads = report.totals.lead_count,
        "compare rows served"
    );

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Runs extraction and reconciliation on the blocking pool.
async fn run_compare(
    input: CompareInput,
    rules: Arc<CompiledRules>,
    req_id: &str,
) -> Result<ComparisonReport, ApiError> {
    tokio::task::spawn_blocking(move || compare(input, &rules))
        .await
        .map_err(|e| join_error(req_id.to_owned(), &e))
}
