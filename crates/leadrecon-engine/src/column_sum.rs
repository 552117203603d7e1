//! Column-sum analysis: totals two (or more) numeric columns across a set of
//! spreadsheets and optionally measures a newer sheet against that total.

use serde::Serialize;

use crate::error::EngineError;
use crate::extract::{cell_number, RawRow};

/// Rows of one decoded upload, tagged with the file name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRows {
    pub file: String,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSum {
    pub file: String,
    pub sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SumComparison {
    pub previous_total: f64,
    pub new_total: f64,
    pub difference: f64,
    /// `difference` as a percentage of `previous_total`; `None` when the
    /// previous total is zero.
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSumReport {
    pub columns: Vec<String>,
    pub per_file: Vec<FileSum>,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<SumComparison>,
}

/// Requires at least one column and no blank column names.
///
/// # Errors
///
/// Returns [`EngineError::InputShape`] naming the problem.
pub fn validate_columns(columns: &[String]) -> Result<(), EngineError> {
    if columns.is_empty() {
        return Err(EngineError::InputShape(
            "at least one column to sum is required".to_owned(),
        ));
    }
    if columns.iter().any(|c| c.trim().is_empty()) {
        return Err(EngineError::InputShape(
            "column names must be non-empty".to_owned(),
        ));
    }
    Ok(())
}

/// Sum of `columns` over every row. Missing columns and unparsable cells
/// count as zero.
#[must_use]
pub fn sum_columns(rows: &[RawRow], columns: &[String]) -> f64 {
    rows.iter()
        .flat_map(|row| columns.iter().map(move |c| cell_number(row, c.trim())))
        .sum()
}

#[must_use]
pub fn compare_totals(previous_total: f64, new_total: f64) -> SumComparison {
    let difference = new_total - previous_total;
    let percentage = (previous_total != 0.0).then(|| difference / previous_total * 100.0);
    SumComparison {
        previous_total,
        new_total,
        difference,
        percentage,
    }
}

/// Sums `columns` per file and overall; with `against`, compares that
/// sheet's sum to the overall total.
///
/// # Errors
///
/// Returns [`EngineError::InputShape`] when `columns` is invalid.
pub fn analyze_columns(
    files: &[NamedRows],
    columns: &[String],
    against: Option<&[RawRow]>,
) -> Result<ColumnSumReport, EngineError> {
    validate_columns(columns)?;

    let per_file: Vec<FileSum> = files
        .iter()
        .map(|f| FileSum {
            file: f.file.clone(),
            sum: sum_columns(&f.rows, columns),
        })
        .collect();
    let total = per_file.iter().map(|f| f.sum).sum();
    let comparison = against.map(|rows| compare_totals(total, sum_columns(rows, columns)));

    tracing::info!(
        files = per_file.len(),
        columns = columns.len(),
        total,
        compared = comparison.is_some(),
        "column sums computed"
    );

    Ok(ColumnSumReport {
        columns: columns.to_vec(),
        per_file,
        total,
        comparison,
    })
}
