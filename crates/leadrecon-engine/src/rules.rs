//! The per-project matching rule table, as data.
//!
//! The built-in table ([`RuleTable::default`]) encodes the campaigns known to
//! the marketing team. A YAML file with the same shape can replace it:
//!
//! ```yaml
//! blocklist:
//!   - villa gavea
//! variants:
//!   - marker: jardim
//!     suffix: forms 02
//! projects:
//!   - name: Reserva dos Pássaros
//!     fragments: [reserva dos passaros cod 4219]
//!     bracket_code: 4219
//!   - name: Casa no Pacaembu
//!     fragments: [casa no pacaembu cod 1054]
//!     title_contains: lead de whatsapp
//! teams:
//!   - name: Time Ely
//!     filter: ely
//! landing_sources:
//!   - Landing Page (RE/MAX Comunitá)
//! ```
//!
//! Entry order is significant: the first project whose fragment appears in a
//! campaign name claims it. The built-in table has no suffix variants; a
//! variant pair only applies once a table lists it.
//!
//! `teams` and `landing_sources` do not affect matching. They feed the
//! per-team spend and landing-page diagnostics of the report.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;
use crate::normalize::{normalize, normalize_source};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Generic campaign names that must never absorb leads.
    #[serde(default)]
    pub blocklist: Vec<String>,
    #[serde(default)]
    pub variants: Vec<SuffixVariant>,
    #[serde(default)]
    pub projects: Vec<ProjectRule>,
    #[serde(default)]
    pub teams: Vec<TeamFilter>,
    /// Lead sources counted as landing-page leads, compared after
    /// [`normalize_source`].
    #[serde(default)]
    pub landing_sources: Vec<String>,
}

/// A sales team whose spend is the sum over campaigns naming it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFilter {
    pub name: String,
    /// Text a campaign name contains when it belongs to this team.
    pub filter: String,
}

/// A project whose campaigns split into a base campaign and a suffixed
/// variant (e.g. a second lead form) sharing the same marker phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixVariant {
    pub marker: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRule {
    pub name: String,
    /// Campaign-name fragments; any one of them selects this project.
    pub fragments: Vec<String>,
    /// Numeric code the CRM puts in brackets at the start of lead titles.
    #[serde(
        default,
        deserialize_with = "deserialize_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub bracket_code: Option<String>,
    /// Text that every lead title of this project contains, for projects
    /// whose leads carry no bracket code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_contains: Option<String>,
}

impl ProjectRule {
    fn coded(name: &str, fragments: &[&str], code: &str) -> Self {
        Self {
            name: name.to_owned(),
            fragments: fragments.iter().map(|f| (*f).to_owned()).collect(),
            bracket_code: Some(code.to_owned()),
            title_contains: None,
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            blocklist: vec!["villa gavea".to_owned()],
            variants: Vec::new(),
            projects: vec![
                ProjectRule::coded(
                    "Reserva dos Pássaros",
                    &["reserva dos passaros cod 4219"],
                    "4219",
                ),
                ProjectRule::coded(
                    "Villa Gávea",
                    &["villa gávea cod 2772", "villa gavea cod 2772"],
                    "2772",
                ),
                ProjectRule::coded("Villas do Parque", &["villas do parque 2123"], "2123"),
                ProjectRule::coded("Village Mercês", &["village merces cod 1377"], "1377"),
                ProjectRule::coded("Felicità", &["felicita 1643"], "1643"),
                ProjectRule::coded("Casa no Cyrela II", &["casa no cyrela ii"], "1031"),
                ProjectRule::coded(
                    "Edifício Boulevard",
                    &["edificio boulevard 6162"],
                    "6162",
                ),
                ProjectRule::coded("Casa B Olinda", &["casa b olinda"], "3593"),
                ProjectRule {
                    name: "Casa no Pacaembu".to_owned(),
                    fragments: vec!["casa no pacaembu cod 1054".to_owned()],
                    bracket_code: None,
                    title_contains: Some("lead de whatsapp".to_owned()),
                },
            ],
            teams: [
                ("Time Ely", "ely"),
                ("Time Daiane", "daiane"),
                ("Time André", "andre"),
                ("Time Lorena", "lorena"),
            ]
            .into_iter()
            .map(|(name, filter)| TeamFilter {
                name: name.to_owned(),
                filter: filter.to_owned(),
            })
            .collect(),
            landing_sources: vec![
                "Landing Page (RE/MAX Comunitá)".to_owned(),
                "Landing Page (G. Santos Imóveis)".to_owned(),
            ],
        }
    }
}

/// Accepts a bracket code written either as a YAML integer or a string.
fn deserialize_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Int(u64),
        Text(String),
    }

    Ok(Option::<Code>::deserialize(deserializer)?.map(|code| match code {
        Code::Int(n) => n.to_string(),
        Code::Text(s) => s.trim().to_owned(),
    }))
}

/// Load and validate a rule table from a YAML file.
///
/// # Errors
///
/// Returns `EngineError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<RuleTable, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_rules(&content)
}

/// Parse and validate a rule table from YAML text.
///
/// # Errors
///
/// Returns `EngineError` if the text is not valid YAML for a [`RuleTable`]
/// or the table fails validation.
pub fn parse_rules(content: &str) -> Result<RuleTable, EngineError> {
    let table: RuleTable = serde_yaml::from_str(content)?;
    validate_rules(&table)?;
    Ok(table)
}

/// Checks a rule table for entries that could never fire or would fire on
/// everything.
///
/// # Errors
///
/// Returns [`EngineError::RulesValidation`] describing the first problem found.
pub fn validate_rules(table: &RuleTable) -> Result<(), EngineError> {
    for name in &table.blocklist {
        if normalize(name).is_empty() {
            return Err(EngineError::RulesValidation(
                "blocklist entries must be non-empty".to_string(),
            ));
        }
    }

    for variant in &table.variants {
        if normalize(&variant.marker).is_empty() || normalize(&variant.suffix).is_empty() {
            return Err(EngineError::RulesValidation(format!(
                "variant '{}' / '{}' needs a non-empty marker and suffix",
                variant.marker, variant.suffix
            )));
        }
    }

    let mut seen_names = HashSet::new();
    for project in &table.projects {
        if project.name.trim().is_empty() {
            return Err(EngineError::RulesValidation(
                "project name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(normalize(&project.name)) {
            return Err(EngineError::RulesValidation(format!(
                "duplicate project name: '{}'",
                project.name
            )));
        }

        if project.fragments.is_empty() || project.fragments.iter().any(|f| normalize(f).is_empty())
        {
            return Err(EngineError::RulesValidation(format!(
                "project '{}' needs at least one non-empty fragment",
                project.name
            )));
        }

        match (&project.bracket_code, &project.title_contains) {
            (Some(code), None) => {
                if code.len() < 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(EngineError::RulesValidation(format!(
                        "project '{}' has invalid bracket code '{code}'; expected 3 or more digits",
                        project.name
                    )));
                }
            }
            (None, Some(text)) => {
                if normalize(text).is_empty() {
                    return Err(EngineError::RulesValidation(format!(
                        "project '{}' has an empty title_contains",
                        project.name
                    )));
                }
            }
            _ => {
                return Err(EngineError::RulesValidation(format!(
                    "project '{}' must set exactly one of bracket_code or title_contains",
                    project.name
                )));
            }
        }
    }

    for team in &table.teams {
        if team.name.trim().is_empty() || normalize(&team.filter).is_empty() {
            return Err(EngineError::RulesValidation(format!(
                "team '{}' needs a non-empty name and filter",
                team.name
            )));
        }
    }

    if table
        .landing_sources
        .iter()
        .any(|s| normalize_source(s).is_empty())
    {
        return Err(EngineError::RulesValidation(
            "landing sources must be non-empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
