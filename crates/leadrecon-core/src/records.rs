use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which uploaded file a campaign row came from.
///
/// Ad-platform reports carry a 1-based ordinal matching upload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SourceFile {
    AdPlatform(u16),
    /// Reserved for rows that originate in the lead export rather than an
    /// ad-platform report. The extractors never produce it: every row is
    /// built from a campaign record. It parses from `"comparison"` and sorts
    /// after every ad-platform file, so a row carrying it (e.g. deserialized
    /// from stored output) groups last.
    Comparison,
}

impl SourceFile {
    /// Origin tag for the ad-platform file at zero-based upload `index`.
    #[must_use]
    pub fn from_upload_index(index: usize) -> Self {
        let ordinal = u16::try_from(index.saturating_add(1)).unwrap_or(u16::MAX);
        SourceFile::AdPlatform(ordinal)
    }

    #[must_use]
    pub fn is_ad_platform(self) -> bool {
        matches!(self, SourceFile::AdPlatform(_))
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFile::AdPlatform(n) => write!(f, "file-{n}"),
            SourceFile::Comparison => write!(f, "comparison"),
        }
    }
}

impl FromStr for SourceFile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "comparison" {
            return Ok(SourceFile::Comparison);
        }
        s.strip_prefix("file-")
            .and_then(|n| n.parse::<u16>().ok())
            .filter(|n| *n > 0)
            .map(SourceFile::AdPlatform)
            .ok_or_else(|| format!("invalid source file tag: {s:?}"))
    }
}

impl From<SourceFile> for String {
    fn from(value: SourceFile) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SourceFile {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One row of an ad-platform campaign report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// Campaign name exactly as exported, e.g. `"Reserva dos Passaros Cod 4219"`.
    pub name: String,
    /// Reporting start date as exported (usually `YYYY-MM-DD`).
    pub report_start: String,
    pub result_count: f64,
    pub cost_per_result: f64,
    /// Amount spent in BRL.
    pub amount_spent: f64,
    pub source_file: SourceFile,
}

/// One row of the CRM lead export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Lead title, often prefixed with a bracket code, e.g. `"[4219] João Silva"`.
    pub title: String,
    pub arrival_date: String,
    /// Current pipeline activity, e.g. `"Visita Agendada"`.
    pub current_activity: String,
    /// Lifecycle status, e.g. `"Arquivado"`.
    pub status: String,
    pub responsible_user: Option<String>,
    pub client_name: Option<String>,
    /// Lead origin channel, e.g. `"Landing Page (RE/MAX Comunitá)"`.
    pub source: Option<String>,
}

impl LeadRecord {
    /// Lead with only a title set; every other field empty.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            arrival_date: String::new(),
            current_activity: String::new(),
            status: String::new(),
            responsible_user: None,
            client_name: None,
            source: None,
        }
    }
}
