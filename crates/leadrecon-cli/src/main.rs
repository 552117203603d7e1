mod analyze;
mod compare;
mod rules;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadrecon-cli")]
#[command(about = "Reconcile ad-platform campaign reports with CRM lead exports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare ad-platform reports against a lead export
    Compare {
        /// Ad-platform report (CSV or workbook); repeat in upload order
        #[arg(long = "ad-file", required = true)]
        ad_files: Vec<PathBuf>,
        /// CRM lead export (CSV or workbook)
        #[arg(long)]
        leads: PathBuf,
        /// YAML rule table replacing the built-in one
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Print the full report as JSON instead of a summary table
        #[arg(long)]
        json: bool,
    },
    /// Sum columns across spreadsheets, optionally against a newer sheet
    Analyze {
        /// Spreadsheet (CSV or workbook); repeat for each file
        #[arg(long = "file", required = true)]
        files: Vec<PathBuf>,
        /// Column to sum; repeat for each column
        #[arg(long = "column", required = true)]
        columns: Vec<String>,
        /// Newer spreadsheet compared against the summed total
        #[arg(long)]
        against: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect matching rule tables
    Rules {
        #[command(subcommand)]
        command: rules::RulesCommands,
    },
}

fn main() -> anyhow::Result<()> {
    let config = leadrecon_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Compare {
            ad_files,
            leads,
            rules,
            json,
        }) => compare::run_compare(&config, &ad_files, &leads, rules.as_deref(), json),
        Some(Commands::Analyze {
            files,
            columns,
            against,
            json,
        }) => analyze::run_analyze(&files, &columns, against.as_deref(), json),
        Some(Commands::Rules { command }) => rules::run_rules(&config, command),
        None => {
            println!("leadrecon-cli: use `compare`, `analyze` or `rules`; see --help");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
