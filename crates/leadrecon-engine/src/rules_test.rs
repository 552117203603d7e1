use super::*;

#[test]
fn default_table_is_valid() {
    validate_rules(&RuleTable::default()).expect("built-in table should validate");
}

#[test]
fn default_table_keeps_project_order() {
    let table = RuleTable::default();
    let codes: Vec<&str> = table
        .projects
        .iter()
        .filter_map(|p| p.bracket_code.as_deref())
        .collect();
    assert_eq!(
        codes,
        vec!["4219", "2772", "2123", "1377", "1643", "1031", "6162", "3593"]
    );
    let last = table.projects.last().expect("non-empty table");
    assert_eq!(last.title_contains.as_deref(), Some("lead de whatsapp"));
}

#[test]
fn parse_rules_accepts_integer_and_string_codes() {
    let yaml = r"
blocklist: [villa gavea]
projects:
  - name: Reserva
    fragments: [reserva dos passaros cod 4219]
    bracket_code: 4219
  - name: Villas
    fragments: [villas do parque 2123]
    bracket_code: '2123'
";
    let table = parse_rules(yaml).expect("valid yaml");
    assert_eq!(table.projects[0].bracket_code.as_deref(), Some("4219"));
    assert_eq!(table.projects[1].bracket_code.as_deref(), Some("2123"));
    assert!(table.variants.is_empty());
}

#[test]
fn parse_rules_rejects_short_code() {
    let yaml = r"
projects:
  - name: Tiny
    fragments: [tiny]
    bracket_code: 42
";
    let err = parse_rules(yaml).unwrap_err();
    assert!(
        matches!(err, EngineError::RulesValidation(ref msg) if msg.contains("invalid bracket code")),
        "got: {err:?}"
    );
}

#[test]
fn parse_rules_rejects_project_with_two_matchers() {
    let yaml = r"
projects:
  - name: Both
    fragments: [both]
    bracket_code: 1234
    title_contains: whatsapp
";
    let err = parse_rules(yaml).unwrap_err();
    assert!(matches!(err, EngineError::RulesValidation(ref msg) if msg.contains("exactly one")));
}

#[test]
fn parse_rules_rejects_project_without_matcher() {
    let yaml = r"
projects:
  - name: Neither
    fragments: [neither]
";
    let err = parse_rules(yaml).unwrap_err();
    assert!(matches!(err, EngineError::RulesValidation(ref msg) if msg.contains("exactly one")));
}

#[test]
fn parse_rules_rejects_duplicate_project_names_ignoring_accents() {
    let yaml = r"
projects:
  - name: Felicità
    fragments: [felicita 1643]
    bracket_code: 1643
  - name: felicita
    fragments: [felicita 2000]
    bracket_code: 2000
";
    let err = parse_rules(yaml).unwrap_err();
    assert!(matches!(err, EngineError::RulesValidation(ref msg) if msg.contains("duplicate")));
}

#[test]
fn parse_rules_rejects_blank_fragment() {
    let yaml = r"
projects:
  - name: Blank
    fragments: ['  ']
    bracket_code: 1234
";
    let err = parse_rules(yaml).unwrap_err();
    assert!(matches!(err, EngineError::RulesValidation(ref msg) if msg.contains("fragment")));
}

#[test]
fn parse_rules_rejects_blank_variant_suffix() {
    let yaml = r"
variants:
  - marker: alto padrao
    suffix: ''
";
    let err = parse_rules(yaml).unwrap_err();
    assert!(matches!(err, EngineError::RulesValidation(ref msg) if msg.contains("suffix")));
}

#[test]
fn parse_rules_reports_yaml_errors() {
    let err = parse_rules("projects: [unclosed").unwrap_err();
    assert!(matches!(err, EngineError::RulesFileParse(_)));
}

#[test]
fn load_rules_reports_missing_file() {
    let err = load_rules(Path::new("/nonexistent/leadrecon/rules.yaml")).unwrap_err();
    assert!(matches!(err, EngineError::RulesFileIo { .. }));
}

#[test]
fn default_table_round_trips_through_yaml() {
    let table = RuleTable::default();
    let yaml = serde_yaml::to_string(&table).expect("serialize");
    let back = parse_rules(&yaml).expect("reparse");
    assert_eq!(back, table);
}

#[test]
fn default_table_ships_no_variants_but_teams_and_landing_sources() {
    let table = RuleTable::default();
    assert!(table.variants.is_empty());
    let teams: Vec<&str> = table.teams.iter().map(|t| t.filter.as_str()).collect();
    assert_eq!(teams, vec!["ely", "daiane", "andre", "lorena"]);
    assert_eq!(table.landing_sources.len(), 2);
}

#[test]
fn parse_rules_reads_teams_and_landing_sources() {
    let yaml = r"
teams:
  - name: Time Ely
    filter: ely
landing_sources:
  - Landing Page (RE/MAX Comunitá)
";
    let table = parse_rules(yaml).expect("valid yaml");
    assert_eq!(table.teams[0].name, "Time Ely");
    assert_eq!(table.landing_sources, vec!["Landing Page (RE/MAX Comunitá)"]);
    assert!(table.projects.is_empty());
}

#[test]
fn parse_rules_rejects_blank_team_filter() {
    let yaml = r"
teams:
  - name: Time Ely
    filter: '  '
";
    let err = parse_rules(yaml).unwrap_err();
    assert!(matches!(err, EngineError::RulesValidation(ref msg) if msg.contains("team")));
}

#[test]
fn parse_rules_rejects_punctuation_only_landing_source() {
    let err = parse_rules("landing_sources: ['--']").unwrap_err();
    assert!(matches!(err, EngineError::RulesValidation(ref msg) if msg.contains("landing")));
}
