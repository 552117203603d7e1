//! Final report assembly: grouping by origin file plus dashboard diagnostics.

use std::collections::BTreeMap;

use leadrecon_core::{CampaignRecord, LeadRecord, SourceFile};
use serde::Serialize;

use crate::aggregate::{
    archived_leads, compute_totals, ComparisonRow, Totals, NOT_INFORMED, SCHEDULED_VISIT,
};
use crate::cascade::{CompiledRules, CompiledTeam, LandingSource};
use crate::normalize::normalize_source;

/// Activity label for a lead with neither an activity nor a status.
pub const UNKNOWN_ACTIVITY: &str = "Desconhecido";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub rows: Vec<ComparisonRow>,
    pub groups: Vec<RowGroup>,
    pub totals: Totals,
    pub archived_leads: Vec<LeadRecord>,
    pub diagnostics: Diagnostics,
}

/// Rows sharing one origin file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowGroup {
    pub source_file: SourceFile,
    /// Campaign names in row order.
    pub campaigns: Vec<String>,
    pub lead_count: usize,
    pub result_count: f64,
    pub amount_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSpend {
    pub source_file: SourceFile,
    pub amount_spent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSpend {
    pub team: String,
    pub amount_spent: f64,
}

/// A lead that arrived through one of the configured landing pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandingLead {
    /// The configured source label the lead's source matched.
    pub source: String,
    pub title: String,
    pub responsible_user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Spend per uploaded ad-platform file over every record, duplicates included.
    pub spend_per_file: Vec<FileSpend>,
    /// Spend of the rows whose name contains each team's filter, in table order.
    pub spend_per_team: Vec<TeamSpend>,
    pub activity_breakdown: Vec<LabelCount>,
    pub visits_per_month: Vec<LabelCount>,
    pub leads_per_source: Vec<LabelCount>,
    /// Configured landing sources present in the export, in table order.
    pub landing_source_counts: Vec<LabelCount>,
    /// Every lead (matched or not) from a landing source, in export order.
    pub landing_leads: Vec<LandingLead>,
    /// Sorted distinct responsible users of `landing_leads`.
    pub landing_responsible_users: Vec<String>,
}

/// Assembles the report from aggregated rows.
///
/// `campaigns` is every extracted campaign record (before name
/// deduplication) and `ad_file_count` the number of uploaded ad-platform
/// files, so a file with no usable rows still gets a zero spend entry.
/// Team and landing-source settings come from `rules`.
#[must_use]
pub fn assemble_report(
    rows: Vec<ComparisonRow>,
    campaigns: &[CampaignRecord],
    ad_file_count: usize,
    leads: &[LeadRecord],
    rules: &CompiledRules,
) -> ComparisonReport {
    let totals = compute_totals(&rows);
    let groups = group_rows(&rows);
    let landing = landing_leads(leads, rules.landing_sources());
    let diagnostics = Diagnostics {
        spend_per_file: spend_per_file(campaigns, ad_file_count),
        spend_per_team: spend_per_team(&rows, rules.teams()),
        activity_breakdown: activity_breakdown(&rows),
        visits_per_month: visits_per_month(&rows),
        leads_per_source: leads_per_source(leads),
        landing_source_counts: landing_source_counts(&landing, rules.landing_sources()),
        landing_responsible_users: responsible_users(&landing),
        landing_leads: landing,
    };

    ComparisonReport {
        archived_leads: archived_leads(leads),
        rows,
        groups,
        totals,
        diagnostics,
    }
}

/// Groups rows by origin in ordinal order; the comparison origin sorts last.
#[must_use]
pub fn group_rows(rows: &[ComparisonRow]) -> Vec<RowGroup> {
    let mut groups: BTreeMap<SourceFile, RowGroup> = BTreeMap::new();
    for row in rows {
        let group = groups.entry(row.source_file).or_insert_with(|| RowGroup {
            source_file: row.source_file,
            campaigns: Vec::new(),
            lead_count: 0,
            result_count: 0.0,
            amount_spent: 0.0,
        });
        group.campaigns.push(row.campaign_name.clone());
        group.lead_count += row.lead_count;
        group.result_count += row.result_count;
        group.amount_spent += row.amount_spent;
    }
    groups.into_values().collect()
}

#[must_use]
pub fn spend_per_file(campaigns: &[CampaignRecord], ad_file_count: usize) -> Vec<FileSpend> {
    (0..ad_file_count)
        .map(|idx| {
            let source_file = SourceFile::from_upload_index(idx);
            let amount_spent = campaigns
                .iter()
                .filter(|c| c.source_file == source_file)
                .map(|c| c.amount_spent)
                .sum();
            FileSpend {
                source_file,
                amount_spent,
            }
        })
        .collect()
}

/// A row counts for a team when its normalized name contains the team filter.
#[must_use]
pub fn spend_per_team(rows: &[ComparisonRow], teams: &[CompiledTeam]) -> Vec<TeamSpend> {
    teams
        .iter()
        .map(|team| TeamSpend {
            team: team.name.clone(),
            amount_spent: rows
                .iter()
                .filter(|r| r.normalized_name.contains(team.filter.as_str()))
                .map(|r| r.amount_spent)
                .sum(),
        })
        .collect()
}

/// Leads whose source equals a configured landing source once both go
/// through [`normalize_source`].
#[must_use]
pub fn landing_leads(leads: &[LeadRecord], sources: &[LandingSource]) -> Vec<LandingLead> {
    leads
        .iter()
        .filter_map(|lead| {
            let key = normalize_source(lead.source.as_deref()?);
            let source = sources.iter().find(|s| s.key == key)?;
            Some(LandingLead {
                source: source.label.clone(),
                title: lead.title.clone(),
                responsible_user: lead
                    .responsible_user
                    .clone()
                    .unwrap_or_else(|| NOT_INFORMED.to_owned()),
            })
        })
        .collect()
}

fn landing_source_counts(landing: &[LandingLead], sources: &[LandingSource]) -> Vec<LabelCount> {
    sources
        .iter()
        .map(|s| LabelCount {
            label: s.label.clone(),
            count: landing.iter().filter(|l| l.source == s.label).count(),
        })
        .filter(|c| c.count > 0)
        .collect()
}

fn responsible_users(landing: &[LandingLead]) -> Vec<String> {
    let mut users: Vec<String> = landing.iter().map(|l| l.responsible_user.clone()).collect();
    users.sort();
    users.dedup();
    users
}

/// Activity label of a lead: current activity, else status, else unknown.
#[must_use]
pub fn activity_label(lead: &LeadRecord) -> &str {
    [lead.current_activity.as_str(), lead.status.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_ACTIVITY)
}

/// `"2024-03-15"` → `"03/2024"`; dates without a `-` separator are kept as-is.
#[must_use]
pub fn month_label(arrival_date: &str) -> String {
    let mut parts = arrival_date.split('-');
    match (parts.next(), parts.next()) {
        (Some(year), Some(month)) => format!("{month}/{year}"),
        _ => arrival_date.to_owned(),
    }
}

fn matched_leads(rows: &[ComparisonRow]) -> impl Iterator<Item = &LeadRecord> {
    rows.iter().flat_map(|r| r.matched_leads.iter())
}

fn activity_breakdown(rows: &[ComparisonRow]) -> Vec<LabelCount> {
    count_labels(matched_leads(rows).map(|l| activity_label(l).to_owned()))
}

fn visits_per_month(rows: &[ComparisonRow]) -> Vec<LabelCount> {
    count_labels(
        matched_leads(rows)
            .filter(|l| activity_label(l) == SCHEDULED_VISIT && !l.arrival_date.is_empty())
            .map(|l| month_label(&l.arrival_date)),
    )
}

fn leads_per_source(leads: &[LeadRecord]) -> Vec<LabelCount> {
    count_labels(
        leads
            .iter()
            .map(|l| l.source.clone().unwrap_or_else(|| NOT_INFORMED.to_owned())),
    )
}

fn count_labels(labels: impl Iterator<Item = String>) -> Vec<LabelCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect()
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
