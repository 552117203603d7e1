//! Rule table command handlers for the CLI.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use leadrecon_core::AppConfig;
use leadrecon_engine::{load_rules, RuleTable};

#[derive(Debug, Subcommand)]
pub enum RulesCommands {
    /// Load and validate a YAML rule table
    Check {
        /// Path to the rule table
        path: PathBuf,
    },
    /// Print the effective rule table as YAML
    Show {
        /// YAML rule table to show instead of the configured one
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

pub(crate) fn run_rules(config: &AppConfig, command: RulesCommands) -> anyhow::Result<()> {
    match command {
        RulesCommands::Check { path } => {
            let table = load_rules(&path)?;
            println!("{}", check_summary(&table));
            Ok(())
        }
        RulesCommands::Show { rules } => {
            let table = resolve_rule_table(rules.as_deref(), config)?;
            print!("{}", serde_yaml::to_string(&table)?);
            Ok(())
        }
    }
}

pub(crate) fn check_summary(table: &RuleTable) -> String {
    format!(
        "ok: {} blocklisted, {} variant pairs, {} projects, {} teams, {} landing sources",
        table.blocklist.len(),
        table.variants.len(),
        table.projects.len(),
        table.teams.len(),
        table.landing_sources.len()
    )
}

/// The rule table in effect: `--rules` if given, else `LEADRECON_RULES_PATH`,
/// else the built-in table.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be loaded or fails validation.
pub(crate) fn resolve_rule_table(
    flag: Option<&Path>,
    config: &AppConfig,
) -> anyhow::Result<RuleTable> {
    match flag.or(config.rules_path.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading rule table");
            Ok(load_rules(path)?)
        }
        None => Ok(RuleTable::default()),
    }
}
