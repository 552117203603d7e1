//! Ordered matching cascade deciding which leads belong to a campaign.
//!
//! A [`RuleTable`] compiles into a flat list of [`CompiledRule`]s, each a
//! campaign-name predicate paired with a lead-title matcher. Evaluation is
//! top-to-bottom and the first predicate that accepts the campaign name picks
//! the matcher:
//!
//! 1. blocklist (exact name) → no leads
//! 2. suffix-variant pairs (base campaign, then suffixed variant)
//! 3. per-project rules (bracket code or title substring)
//! 4. generic fallback, outside the table
//!
//! Every string stored here is already normalized.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::normalize::{normalize, normalize_source};
use crate::rules::RuleTable;

/// A normalized title or name starting with `[` + 3 or more digits + `]`.
static BRACKET_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[0-9]{3,}\]").expect("valid regex"));

/// `true` if the normalized text starts with a bracket code such as `[4219]`.
#[must_use]
pub fn is_bracket_coded(normalized: &str) -> bool {
    BRACKET_CODE_RE.is_match(normalized)
}

/// Which step of the cascade assigned a campaign its leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchRule {
    Blocklisted,
    SuffixBase { marker: String },
    SuffixVariant { marker: String, suffix: String },
    Project { name: String },
    /// Fallback for plain names: substring match, bracket-coded titles excluded.
    GenericExcludingCoded,
    /// Fallback for bracket-coded names: plain substring match.
    GenericSubstring,
    /// Name normalizes to nothing; it would otherwise match every title.
    EmptyName,
}

/// Test applied to a normalized campaign name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignPredicate {
    Equals(String),
    ContainsAny(Vec<String>),
    ContainsWithout { marker: String, excluded: String },
    ContainsBoth { first: String, second: String },
}

impl CampaignPredicate {
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            CampaignPredicate::Equals(target) => name == target,
            CampaignPredicate::ContainsAny(fragments) => {
                fragments.iter().any(|f| name.contains(f.as_str()))
            }
            CampaignPredicate::ContainsWithout { marker, excluded } => {
                name.contains(marker.as_str()) && !name.contains(excluded.as_str())
            }
            CampaignPredicate::ContainsBoth { first, second } => {
                name.contains(first.as_str()) && name.contains(second.as_str())
            }
        }
    }
}

/// Test applied to a normalized lead title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadMatcher {
    Nothing,
    /// Title starts with the given bracket prefix, e.g. `"[4219]"`.
    StartsWith(String),
    Contains(String),
    ContainsWithout { marker: String, excluded: String },
    ContainsBoth { first: String, second: String },
    /// Title is not bracket-coded and contains the text.
    UncodedContains(String),
}

impl LeadMatcher {
    #[must_use]
    pub fn matches(&self, title: &str) -> bool {
        match self {
            LeadMatcher::Nothing => false,
            LeadMatcher::StartsWith(prefix) => title.starts_with(prefix.as_str()),
            LeadMatcher::Contains(text) => title.contains(text.as_str()),
            LeadMatcher::ContainsWithout { marker, excluded } => {
                title.contains(marker.as_str()) && !title.contains(excluded.as_str())
            }
            LeadMatcher::ContainsBoth { first, second } => {
                title.contains(first.as_str()) && title.contains(second.as_str())
            }
            LeadMatcher::UncodedContains(text) => {
                !is_bracket_coded(title) && title.contains(text.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub rule: MatchRule,
    pub predicate: CampaignPredicate,
    pub matcher: LeadMatcher,
}

/// The matcher chosen for one campaign name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy<'a> {
    pub rule: MatchRule,
    pub matcher: Cow<'a, LeadMatcher>,
}

/// A [`RuleTable`] flattened into evaluation order with every string normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRules {
    rules: Vec<CompiledRule>,
    teams: Vec<CompiledTeam>,
    landing_sources: Vec<LandingSource>,
}

/// A team filter in normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTeam {
    pub name: String,
    pub filter: String,
}

/// A landing-page source label and its [`normalize_source`] key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingSource {
    pub label: String,
    pub key: String,
}

impl Default for CompiledRules {
    fn default() -> Self {
        Self::compile(&RuleTable::default())
    }
}

impl CompiledRules {
    #[must_use]
    pub fn compile(table: &RuleTable) -> Self {
        let mut rules = Vec::new();

        for name in &table.blocklist {
            rules.push(CompiledRule {
                rule: MatchRule::Blocklisted,
                predicate: CampaignPredicate::Equals(normalize(name)),
                matcher: LeadMatcher::Nothing,
            });
        }

        for variant in &table.variants {
            let marker = normalize(&variant.marker);
            let suffix = normalize(&variant.suffix);
            rules.push(CompiledRule {
                rule: MatchRule::SuffixBase {
                    marker: marker.clone(),
                },
                predicate: CampaignPredicate::ContainsWithout {
                    marker: marker.clone(),
                    excluded: suffix.clone(),
                },
                matcher: LeadMatcher::ContainsWithout {
                    marker: marker.clone(),
                    excluded: suffix.clone(),
                },
            });
            rules.push(CompiledRule {
                rule: MatchRule::SuffixVariant {
                    marker: marker.clone(),
                    suffix: suffix.clone(),
                },
                predicate: CampaignPredicate::ContainsBoth {
                    first: marker.clone(),
                    second: suffix.clone(),
                },
                matcher: LeadMatcher::ContainsBoth {
                    first: marker,
                    second: suffix,
                },
            });
        }

        for project in &table.projects {
            let matcher = match (&project.bracket_code, &project.title_contains) {
                (Some(code), _) => LeadMatcher::StartsWith(format!("[{}]", code.trim())),
                (None, Some(text)) => LeadMatcher::Contains(normalize(text)),
                (None, None) => LeadMatcher::Nothing,
            };
            rules.push(CompiledRule {
                rule: MatchRule::Project {
                    name: project.name.clone(),
                },
                predicate: CampaignPredicate::ContainsAny(
                    project.fragments.iter().map(String::as_str).map(normalize).collect(),
                ),
                matcher,
            });
        }

        let teams = table
            .teams
            .iter()
            .map(|t| CompiledTeam {
                name: t.name.clone(),
                filter: normalize(&t.filter),
            })
            .collect();
        let landing_sources = table
            .landing_sources
            .iter()
            .map(|label| LandingSource {
                label: label.clone(),
                key: normalize_source(label),
            })
            .collect();

        Self {
            rules,
            teams,
            landing_sources,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    #[must_use]
    pub fn teams(&self) -> &[CompiledTeam] {
        &self.teams
    }

    #[must_use]
    pub fn landing_sources(&self) -> &[LandingSource] {
        &self.landing_sources
    }

    /// Picks the matcher for a normalized campaign name: the first table rule
    /// accepting it, else the generic fallback.
    #[must_use]
    pub fn select(&self, name: &str) -> Strategy<'_> {
        if let Some(hit) = self.rules.iter().find(|r| r.predicate.accepts(name)) {
            return Strategy {
                rule: hit.rule.clone(),
                matcher: Cow::Borrowed(&hit.matcher),
            };
        }

        if name.is_empty() {
            Strategy {
                rule: MatchRule::EmptyName,
                matcher: Cow::Owned(LeadMatcher::Nothing),
            }
        } else if is_bracket_coded(name) {
            Strategy {
                rule: MatchRule::GenericSubstring,
                matcher: Cow::Owned(LeadMatcher::Contains(name.to_owned())),
            }
        } else {
            Strategy {
                rule: MatchRule::GenericExcludingCoded,
                matcher: Cow::Owned(LeadMatcher::UncodedContains(name.to_owned())),
            }
        }
    }
}

#[cfg(test)]
#[path = "cascade_test.rs"]
mod tests;
