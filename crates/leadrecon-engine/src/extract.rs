//! Conversion of decoded spreadsheet rows into typed campaign and lead records.
//!
//! Extraction is lenient: a missing or renamed column is treated as an empty
//! cell, numeric cells that do not parse become `0.0`, and rows lacking their
//! mandatory text fields are dropped without error.

use leadrecon_core::{CampaignRecord, LeadRecord, SourceFile};
use serde_json::Value;

use crate::header::{
    resolve_header, CLIENT_NAME_FRAGMENTS, RESPONSIBLE_USER_FRAGMENTS, SOURCE_FRAGMENTS,
};

/// One decoded spreadsheet row: header → cell, in column order.
pub type RawRow = serde_json::Map<String, Value>;

/// Column headers of the ad-platform campaign report.
pub mod campaign_headers {
    pub const NAME: &str = "Nome da campanha";
    pub const REPORT_START: &str = "Início dos relatórios";
    pub const REPORT_START_ALIAS: &str = "Inicio dos relatorios";
    pub const RESULTS: &str = "Resultados";
    pub const COST_PER_RESULT: &str = "Custo por resultados";
    pub const AMOUNT_SPENT: &str = "Valor usado (BRL)";
}

/// Column headers of the CRM lead export.
pub mod lead_headers {
    pub const TITLE: &str = "Título";
    pub const ARRIVAL_DATE: &str = "Data de chegada";
    pub const CURRENT_ACTIVITY: &str = "Atividade atual";
    pub const STATUS: &str = "Status";
}

/// Renders a cell as trimmed text. Absent, null and non-scalar cells are empty.
#[must_use]
pub fn cell_text(row: &RawRow, header: &str) -> String {
    row.get(header).map(coerce_text).unwrap_or_default()
}

/// Reads a cell as a non-negative number, `0.0` when absent or unparsable.
#[must_use]
pub fn cell_number(row: &RawRow, header: &str) -> f64 {
    row.get(header).map_or(0.0, coerce_number)
}

/// Scalar cell → trimmed text. Integral floats render without a fraction
/// (`45292.0` → `"45292"`).
#[must_use]
pub fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 => format!("{f:.0}"),
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Scalar cell → number, never failing.
///
/// Strings accept a plain decimal (`"12.5"`) or a single comma decimal
/// separator with no dot (`"12,5"`). Anything else, including negative and
/// non-finite values, is `0.0`.
#[must_use]
pub fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s.trim()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|f| f.is_finite() && *f >= 0.0).unwrap_or(0.0)
}

fn parse_decimal(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(f) = s.parse::<f64>() {
        return Some(f);
    }
    if !s.contains('.') && s.matches(',').count() == 1 {
        return s.replacen(',', ".", 1).parse::<f64>().ok();
    }
    None
}

/// Extracts campaign records from one ad-platform report, tagging each with
/// `source_file`. Rows without a name or a report start date are dropped.
#[must_use]
pub fn extract_campaigns(rows: &[RawRow], source_file: SourceFile) -> Vec<CampaignRecord> {
    let records: Vec<CampaignRecord> = rows
        .iter()
        .filter_map(|row| {
            let name = cell_text(row, campaign_headers::NAME);
            let report_start = Some(cell_text(row, campaign_headers::REPORT_START))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| cell_text(row, campaign_headers::REPORT_START_ALIAS));

            if name.is_empty() || report_start.is_empty() {
                return None;
            }

            Some(CampaignRecord {
                name,
                report_start,
                result_count: cell_number(row, campaign_headers::RESULTS),
                cost_per_result: cell_number(row, campaign_headers::COST_PER_RESULT),
                amount_spent: cell_number(row, campaign_headers::AMOUNT_SPENT),
                source_file,
            })
        })
        .collect();

    tracing::debug!(
        source_file = %source_file,
        rows = rows.len(),
        kept = records.len(),
        "extracted campaign records"
    );
    records
}

/// Extracts lead records from the CRM export. Rows without a title are dropped.
///
/// `Status` is read with an exact, case-sensitive header; responsible user,
/// client name and source are located per row by fuzzy header matching.
#[must_use]
pub fn extract_leads(rows: &[RawRow]) -> Vec<LeadRecord> {
    let records: Vec<LeadRecord> = rows.iter().filter_map(extract_lead).collect();

    tracing::debug!(rows = rows.len(), kept = records.len(), "extracted lead records");
    records
}

fn extract_lead(row: &RawRow) -> Option<LeadRecord> {
    let title = cell_text(row, lead_headers::TITLE);
    if title.is_empty() {
        return None;
    }

    let fuzzy = |fragments: &[&str]| -> Option<String> {
        resolve_header(row.keys().map(String::as_str), fragments)
            .map(|header| cell_text(row, header))
            .filter(|s| !s.is_empty())
    };

    Some(LeadRecord {
        title,
        arrival_date: cell_text(row, lead_headers::ARRIVAL_DATE),
        current_activity: cell_text(row, lead_headers::CURRENT_ACTIVITY),
        status: cell_text(row, lead_headers::STATUS),
        responsible_user: fuzzy(RESPONSIBLE_USER_FRAGMENTS),
        client_name: fuzzy(CLIENT_NAME_FRAGMENTS),
        source: fuzzy(SOURCE_FRAGMENTS),
    })
}

/// Concatenates per-file campaign batches in upload order.
#[must_use]
pub fn concat_batches(batches: Vec<Vec<CampaignRecord>>) -> Vec<CampaignRecord> {
    batches.into_iter().fold(Vec::new(), |mut acc, batch| {
        acc.extend(batch);
        acc
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
