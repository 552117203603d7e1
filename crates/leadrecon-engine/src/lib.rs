//! Campaign-to-lead reconciliation for ad-platform reports and CRM lead exports.
//!
//! The two sources name the same campaign inconsistently, so leads are
//! assigned to campaigns through an ordered cascade of normalized-text rules
//! (see [`cascade`]) before per-campaign metrics are computed.

pub mod aggregate;
pub mod cascade;
pub mod column_sum;
pub mod decode;
pub mod error;
pub mod extract;
pub mod header;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod rules;
pub mod workbook;

pub use aggregate::{ComparisonRow, Totals};
pub use cascade::{CompiledRules, MatchRule};
pub use column_sum::{analyze_columns, ColumnSumReport, FileSum, NamedRows, SumComparison};
pub use decode::{decode_csv, decode_upload, detect_format, UploadFormat};
pub use error::EngineError;
pub use extract::{extract_campaigns, extract_leads, RawRow};
pub use normalize::{normalize, normalize_opt, normalize_source};
pub use pipeline::{check_ad_file_count, compare, compare_records, CompareInput};
pub use reconcile::{reconcile, CampaignMatch, Reconciliation};
pub use report::{
    ComparisonReport, Diagnostics, FileSpend, LabelCount, LandingLead, RowGroup, TeamSpend,
};
pub use rules::{load_rules, parse_rules, validate_rules, RuleTable, TeamFilter};
pub use workbook::decode_workbook;
