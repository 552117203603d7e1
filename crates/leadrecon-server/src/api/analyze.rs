//! Column-sum endpoint: totals two columns across the uploaded reports and
//! optionally compares a newer sheet against that total.

use axum::{
    extract::{Multipart, State},
    Extension, Json,
};
use futures::future::try_join_all;
use leadrecon_engine::{analyze_columns, ColumnSumReport, EngineError, NamedRows};

use crate::middleware::RequestId;

use super::upload::{decode_in_background, join_error, read_upload, UploadParts};
use super::{map_engine_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Text parts naming the columns to sum, in order.
const COLUMN_PARTS: [&str; 2] = ["coluna1", "coluna2"];
/// Optional file part compared against the summed total.
const NEW_SHEET_PART: &str = "nova_planilha";

const ANALYZE_PARTS: UploadParts = UploadParts {
    single_file: NEW_SHEET_PART,
    text: &COLUMN_PARTS,
};

pub(super) async fn analyze_upload(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ColumnSumReport>>, ApiError> {
    let mut upload = read_upload(multipart, ANALYZE_PARTS, &req_id.0).await?;

    if upload.ad_files.len() != state.ad_file_count {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!(
                "expected {} spreadsheets, got {}",
                state.ad_file_count,
                upload.ad_files.len()
            ),
        ));
    }
    let columns: Vec<String> = COLUMN_PARTS
        .iter()
        .filter_map(|part| upload.text.remove(*part))
        .filter(|c| !c.is_empty())
        .collect();

    let names: Vec<String> = upload.ad_files.iter().map(|f| f.name.clone()).collect();
    let tasks = upload.ad_files.into_iter().map(decode_in_background);
    let new_sheet = upload.single_file.map(decode_in_background);

    let decoded: Vec<_> = try_join_all(tasks)
        .await
        .map_err(|e| join_error(req_id.0.clone(), &e))?
        .into_iter()
        .collect::<Result<_, EngineError>>()
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;
    let files: Vec<NamedRows> = names
        .into_iter()
        .zip(decoded)
        .map(|(file, rows)| NamedRows { file, rows })
        .collect();
    let against = match new_sheet {
        Some(task) => Some(
            task.await
                .map_err(|e| join_error(req_id.0.clone(), &e))?
                .map_err(|e| map_engine_error(req_id.0.clone(), &e))?,
        ),
        None => None,
    };

    let report = tokio::task::spawn_blocking(move || {
        analyze_columns(&files, &columns, against.as_deref())
    })
    .await
    .map_err(|e| join_error(req_id.0.clone(), &e))?
    .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    tracing::info!(
        request_id = %req_id.0,
        files = report.per_file.len(),
        total = report.total,
        "analyze upload served"
    );

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}
