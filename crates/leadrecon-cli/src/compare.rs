//! `compare` command: runs the reconciliation over spreadsheets on disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use leadrecon_core::AppConfig;
use leadrecon_engine::{compare, decode_upload, CompareInput, ComparisonReport, CompiledRules};

use crate::rules::resolve_rule_table;

const NAME_WIDTH: usize = 40;

pub(crate) fn run_compare(
    config: &AppConfig,
    ad_files: &[PathBuf],
    leads: &Path,
    rules: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    if ad_files.len() != config.ad_file_count {
        tracing::warn!(
            given = ad_files.len(),
            expected = config.ad_file_count,
            "ad-platform report count differs from LEADRECON_AD_FILE_COUNT"
        );
    }

    let table = resolve_rule_table(rules, config)?;
    let rules = CompiledRules::compile(&table);

    let input = CompareInput {
        ad_files: ad_files
            .iter()
            .map(|path| read_rows(path))
            .collect::<anyhow::Result<_>>()?,
        leads: read_rows(leads)?,
    };

    let report = compare(input, &rules);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_summary(&report));
    }
    Ok(())
}

pub(crate) fn read_rows(path: &Path) -> anyhow::Result<Vec<leadrecon_engine::RawRow>> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(decode_upload(&path.display().to_string(), &bytes)?)
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let cut: String = name.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        name.to_owned()
    }
}

/// Plain-text table: one line per campaign, then totals and archived leads.
pub(crate) fn format_summary(report: &ComparisonReport) -> String {
    let mut out = String::new();

    if report.rows.is_empty() {
        out.push_str("no campaigns found in the ad-platform reports\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<42}{:<9}{:>9}{:>7}{:>8}{:>12}  RULE",
        "CAMPAIGN", "FILE", "RESULTS", "LEADS", "VISITS", "SPENT"
    );
    for row in &report.rows {
        let rule = serde_json::to_value(&row.matched_by)
            .ok()
            .and_then(|v| v["kind"].as_str().map(ToOwned::to_owned))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<42}{:<9}{:>9.0}{:>7}{:>8}{:>12.2}  {rule}",
            truncate(&row.campaign_name, NAME_WIDTH),
            row.source_file.to_string(),
            row.result_count,
            row.lead_count,
            row.scheduled_visit_count,
            row.amount_spent,
        );
    }

    let totals = &report.totals;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "total: {} results, {} leads, R$ {:.2} spent, R$ {:.2} per lead",
        totals.result_count, totals.lead_count, totals.amount_spent, totals.cost_per_lead
    );
    let _ = writeln!(out, "archived leads: {}", report.archived_leads.len());
    out
}
