use std::path::{Path, PathBuf};

use leadrecon_core::{AppConfig, Environment};
use leadrecon_engine::{analyze_columns, compare, CompareInput, CompiledRules, NamedRows, RuleTable};

use super::*;
use crate::analyze::format_column_sums;
use crate::compare::format_summary;
use crate::rules::{check_summary, resolve_rule_table, RulesCommands};

fn test_config() -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:3000".parse().expect("addr"),
        log_level: "info".to_string(),
        rules_path: None,
        ad_file_count: 4,
        max_upload_bytes: 1024,
        rate_limit_per_minute: 10,
    }
}

#[test]
fn parses_compare_with_repeated_ad_files() {
    let cli = Cli::try_parse_from([
        "leadrecon-cli",
        "compare",
        "--ad-file",
        "a.csv",
        "--ad-file",
        "b.csv",
        "--leads",
        "leads.csv",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Compare {
            ad_files,
            leads,
            rules,
            json,
        }) => {
            assert_eq!(ad_files, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
            assert_eq!(leads, PathBuf::from("leads.csv"));
            assert!(rules.is_none());
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_compare_with_rules_and_json() {
    let cli = Cli::try_parse_from([
        "leadrecon-cli",
        "compare",
        "--ad-file",
        "a.csv",
        "--leads",
        "leads.csv",
        "--rules",
        "rules.yaml",
        "--json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Compare { json: true, rules: Some(ref r), .. }) if r == Path::new("rules.yaml")
    ));
}

#[test]
fn compare_requires_an_ad_file_and_leads() {
    assert!(Cli::try_parse_from(["leadrecon-cli", "compare", "--leads", "l.csv"]).is_err());
    assert!(Cli::try_parse_from(["leadrecon-cli", "compare", "--ad-file", "a.csv"]).is_err());
}

#[test]
fn parses_rules_check_command() {
    let cli = Cli::try_parse_from(["leadrecon-cli", "rules", "check", "rules.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Rules {
            command: RulesCommands::Check { ref path }
        }) if path == Path::new("rules.yaml")
    ));
}

#[test]
fn parses_rules_show_without_path() {
    let cli =
        Cli::try_parse_from(["leadrecon-cli", "rules", "show"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Rules {
            command: RulesCommands::Show { rules: None }
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["leadrecon-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn resolve_rule_table_defaults_to_built_in() {
    let table = resolve_rule_table(None, &test_config()).expect("default table");
    assert_eq!(table, RuleTable::default());
}

#[test]
fn resolve_rule_table_reports_missing_configured_file() {
    let mut config = test_config();
    config.rules_path = Some(PathBuf::from("/nonexistent/leadrecon-rules.yaml"));
    assert!(resolve_rule_table(None, &config).is_err());
}

#[test]
fn summary_lists_rows_totals_and_archived() {
    let input: CompareInput = serde_json::from_value(serde_json::json!({
        "ad_files": [[
            {"Nome da campanha": "Reserva dos Passaros Cod 4219", "Início dos relatórios": "2024-03-01", "Resultados": 5, "Valor usado (BRL)": 100}
        ]],
        "leads": [
            {"Título": "[4219] João Silva", "Status": "Novo"},
            {"Título": "[9999] Maria", "Status": "Arquivado"}
        ]
    }))
    .expect("valid input");
    let report = compare(input, &CompiledRules::default());
    let summary = format_summary(&report);

    assert!(summary.starts_with("CAMPAIGN"));
    assert!(summary.contains("Reserva dos Passaros Cod 4219"));
    assert!(summary.contains("file-1"));
    assert!(summary.contains("project"));
    assert!(summary.contains("total: 5 results, 1 leads, R$ 100.00 spent, R$ 100.00 per lead"));
    assert!(summary.contains("archived leads: 1"));
}

#[test]
fn summary_handles_empty_report() {
    let report = compare(CompareInput::default(), &CompiledRules::default());
    assert_eq!(
        format_summary(&report),
        "no campaigns found in the ad-platform reports\n"
    );
}

#[test]
fn parses_analyze_with_columns_and_newer_sheet() {
    let cli = Cli::try_parse_from([
        "leadrecon-cli",
        "analyze",
        "--file",
        "a.xlsx",
        "--file",
        "b.csv",
        "--column",
        "Resultados",
        "--column",
        "Valor usado (BRL)",
        "--against",
        "new.xlsx",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Analyze {
            files,
            columns,
            against,
            json,
        }) => {
            assert_eq!(files, vec![PathBuf::from("a.xlsx"), PathBuf::from("b.csv")]);
            assert_eq!(columns, vec!["Resultados", "Valor usado (BRL)"]);
            assert_eq!(against, Some(PathBuf::from("new.xlsx")));
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn analyze_requires_a_column() {
    assert!(Cli::try_parse_from(["leadrecon-cli", "analyze", "--file", "a.csv"]).is_err());
}

#[test]
fn column_sums_list_files_total_and_comparison() {
    let rows = serde_json::from_value(serde_json::json!([{"A": 10, "B": "2,5"}])).expect("rows");
    let newer = serde_json::from_value::<Vec<leadrecon_engine::RawRow>>(serde_json::json!([{"A": 25}]))
        .expect("rows");
    let report = analyze_columns(
        &[NamedRows {
            file: "meta-1.csv".to_owned(),
            rows,
        }],
        &["A".to_owned(), "B".to_owned()],
        Some(&newer),
    )
    .expect("valid columns");

    let text = format_column_sums(&report);
    assert!(text.starts_with("columns: A, B\n"));
    assert!(text.contains("meta-1.csv"));
    assert!(text.contains("12.50"));
    assert!(text.contains("new sheet: 25.00 (difference +12.50, 100.00%)"));
}

#[test]
fn check_summary_counts_every_section() {
    assert_eq!(
        check_summary(&RuleTable::default()),
        "ok: 1 blocklisted, 0 variant pairs, 9 projects, 4 teams, 2 landing sources"
    );
}
