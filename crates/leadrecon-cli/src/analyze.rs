//! `analyze` command: column sums across spreadsheets on disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use leadrecon_engine::{analyze_columns, ColumnSumReport, NamedRows};

use crate::compare::read_rows;

pub(crate) fn run_analyze(
    files: &[PathBuf],
    columns: &[String],
    against: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let named = files
        .iter()
        .map(|path| {
            Ok(NamedRows {
                file: path.display().to_string(),
                rows: read_rows(path)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let against = against.map(read_rows).transpose()?;

    let report = analyze_columns(&named, columns, against.as_deref())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_column_sums(&report));
    }
    Ok(())
}

pub(crate) fn format_column_sums(report: &ColumnSumReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "columns: {}", report.columns.join(", "));
    for file in &report.per_file {
        let _ = writeln!(out, "{:<48}{:>14.2}", file.file, file.sum);
    }
    let _ = writeln!(out, "{:<48}{:>14.2}", "total", report.total);

    if let Some(cmp) = &report.comparison {
        let percentage = cmp
            .percentage
            .map_or_else(|| "n/a".to_owned(), |p| format!("{p:.2}%"));
        let _ = writeln!(
            out,
            "new sheet: {:.2} (difference {:+.2}, {percentage})",
            cmp.new_total, cmp.difference
        );
    }
    out
}
