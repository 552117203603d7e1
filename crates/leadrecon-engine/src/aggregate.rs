//! Per-campaign metrics and report-wide totals.

use leadrecon_core::{LeadRecord, SourceFile};
use serde::Serialize;

use crate::cascade::MatchRule;
use crate::normalize::normalize;
use crate::reconcile::CampaignMatch;

/// Activity label marking a lead with a scheduled site visit.
pub const SCHEDULED_VISIT: &str = "Visita Agendada";

/// Status label of an archived lead (compared in normalized form).
pub const ARCHIVED_STATUS: &str = "Arquivado";

/// Placeholder for a missing responsible user or lead source.
pub const NOT_INFORMED: &str = "Não informado";

/// One distinct campaign with the leads assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub campaign_name: String,
    pub normalized_name: String,
    pub report_start: String,
    pub result_count: f64,
    pub cost_per_result: f64,
    pub amount_spent: f64,
    pub source_file: SourceFile,
    pub matched_leads: Vec<LeadRecord>,
    pub lead_count: usize,
    pub scheduled_visit_count: usize,
    pub primary_responsible_user: String,
    pub matched_by: MatchRule,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub result_count: f64,
    pub lead_count: usize,
    pub amount_spent: f64,
    /// `amount_spent / lead_count`, `0.0` when there are no leads.
    pub cost_per_lead: f64,
}

impl ComparisonRow {
    #[must_use]
    pub fn from_match(matched: &CampaignMatch<'_>, leads: &[LeadRecord]) -> Self {
        let campaign = matched.campaign;
        let matched_leads: Vec<LeadRecord> = matched
            .lead_indices
            .iter()
            .filter_map(|&idx| leads.get(idx).cloned())
            .collect();

        let scheduled_visit_count = matched_leads
            .iter()
            .filter(|l| l.current_activity == SCHEDULED_VISIT)
            .count();
        let primary_responsible_user = matched_leads
            .first()
            .and_then(|l| l.responsible_user.clone())
            .unwrap_or_else(|| NOT_INFORMED.to_owned());

        Self {
            campaign_name: campaign.name.clone(),
            normalized_name: matched.normalized_name.clone(),
            report_start: campaign.report_start.clone(),
            result_count: campaign.result_count,
            cost_per_result: campaign.cost_per_result,
            amount_spent: campaign.amount_spent,
            source_file: campaign.source_file,
            lead_count: matched_leads.len(),
            matched_leads,
            scheduled_visit_count,
            primary_responsible_user,
            matched_by: matched.rule.clone(),
        }
    }
}

/// Builds one row per reconciled campaign, preserving order.
#[must_use]
pub fn build_rows(matches: &[CampaignMatch<'_>], leads: &[LeadRecord]) -> Vec<ComparisonRow> {
    matches
        .iter()
        .map(|m| ComparisonRow::from_match(m, leads))
        .collect()
}

/// Sums results, leads and spend over `rows`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_totals(rows: &[ComparisonRow]) -> Totals {
    let mut totals = rows.iter().fold(Totals::default(), |mut acc, row| {
        acc.result_count += row.result_count;
        acc.lead_count += row.lead_count;
        acc.amount_spent += row.amount_spent;
        acc
    });

    if totals.lead_count > 0 {
        totals.cost_per_lead = totals.amount_spent / totals.lead_count as f64;
    }
    totals
}

/// Every lead whose status is archived, in export order, whether or not it
/// matched a campaign.
#[must_use]
pub fn archived_leads(leads: &[LeadRecord]) -> Vec<LeadRecord> {
    let archived = normalize(ARCHIVED_STATUS);
    leads
        .iter()
        .filter(|l| normalize(&l.status) == archived)
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
