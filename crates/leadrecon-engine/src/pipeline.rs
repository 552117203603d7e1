//! End-to-end comparison: extraction → reconciliation → aggregation → report.

use leadrecon_core::{CampaignRecord, LeadRecord, SourceFile};
use serde::Deserialize;

use crate::aggregate::build_rows;
use crate::cascade::CompiledRules;
use crate::error::EngineError;
use crate::extract::{concat_batches, extract_campaigns, extract_leads, RawRow};
use crate::reconcile::reconcile;
use crate::report::{assemble_report, ComparisonReport};

/// Decoded upload: one row list per ad-platform file (upload order) and the
/// lead export rows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompareInput {
    pub ad_files: Vec<Vec<RawRow>>,
    pub leads: Vec<RawRow>,
}

/// Rejects an upload that does not carry exactly `expected` ad-platform files.
///
/// # Errors
///
/// Returns [`EngineError::InputShape`] when the counts differ.
pub fn check_ad_file_count(actual: usize, expected: usize) -> Result<(), EngineError> {
    if actual == expected {
        return Ok(());
    }
    Err(EngineError::InputShape(format!(
        "expected {expected} ad-platform reports and 1 lead export, got {actual} reports"
    )))
}

/// Runs the full comparison over decoded rows.
#[must_use]
pub fn compare(input: CompareInput, rules: &CompiledRules) -> ComparisonReport {
    let batches: Vec<Vec<CampaignRecord>> = input
        .ad_files
        .iter()
        .enumerate()
        .map(|(idx, rows)| extract_campaigns(rows, SourceFile::from_upload_index(idx)))
        .collect();
    let leads = extract_leads(&input.leads);

    compare_records(batches, &leads, rules)
}

/// Runs the comparison over already-extracted records, one campaign batch
/// per ad-platform file in upload order.
#[must_use]
pub fn compare_records(
    batches: Vec<Vec<CampaignRecord>>,
    leads: &[LeadRecord],
    rules: &CompiledRules,
) -> ComparisonReport {
    let ad_file_count = batches.len();
    let campaigns = concat_batches(batches);

    let matches = reconcile(&campaigns, leads, rules);
    let rows = build_rows(&matches, leads);
    let report = assemble_report(rows, &campaigns, ad_file_count, leads, rules);

    tracing::info!(
        ad_files = ad_file_count,
        campaigns = report.rows.len(),
        leads = leads.len(),
        matched = report.totals.lead_count,
        archived = report.archived_leads.len(),
        "comparison complete"
    );
    report
}
