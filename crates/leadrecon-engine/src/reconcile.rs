//! Assignment of CRM leads to ad-platform campaigns.

use std::collections::HashSet;

use leadrecon_core::{CampaignRecord, LeadRecord};

use crate::cascade::{CompiledRules, MatchRule};
use crate::normalize::normalize;

/// Leads assigned to one distinct campaign name.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignMatch<'a> {
    /// First campaign record carrying this name; its metadata represents the
    /// campaign in the report.
    pub campaign: &'a CampaignRecord,
    pub normalized_name: String,
    pub rule: MatchRule,
    /// Indices into the lead slice, ascending (lead-export order).
    pub lead_indices: Vec<usize>,
}

/// Per-campaign matches in first-appearance order of campaign names.
pub type Reconciliation<'a> = Vec<CampaignMatch<'a>>;

/// Matches `leads` against every distinct campaign name, in order of first
/// appearance.
///
/// Pure and deterministic: the same inputs always produce the same matches.
/// A lead may be assigned to more than one campaign when several names match
/// it; a campaign with no leads is a valid result.
#[must_use]
pub fn reconcile<'a>(
    campaigns: &'a [CampaignRecord],
    leads: &[LeadRecord],
    rules: &CompiledRules,
) -> Reconciliation<'a> {
    let normalized_titles: Vec<String> = leads.iter().map(|l| normalize(&l.title)).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut matches = Vec::new();

    for campaign in campaigns {
        if !seen.insert(campaign.name.as_str()) {
            continue;
        }

        let normalized_name = normalize(&campaign.name);
        let strategy = rules.select(&normalized_name);
        let lead_indices: Vec<usize> = normalized_titles
            .iter()
            .enumerate()
            .filter(|(_, title)| strategy.matcher.matches(title))
            .map(|(idx, _)| idx)
            .collect();

        tracing::trace!(
            campaign = %campaign.name,
            rule = ?strategy.rule,
            leads = lead_indices.len(),
            "reconciled campaign"
        );

        matches.push(CampaignMatch {
            campaign,
            normalized_name,
            rule: strategy.rule,
            lead_indices,
        });
    }

    matches
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
