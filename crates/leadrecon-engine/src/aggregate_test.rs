use leadrecon_core::CampaignRecord;

use super::*;
use crate::cascade::CompiledRules;
use crate::reconcile::reconcile;

fn campaign(name: &str, results: f64, spent: f64) -> CampaignRecord {
    CampaignRecord {
        name: name.to_owned(),
        report_start: "2024-03-01".to_owned(),
        result_count: results,
        cost_per_result: 0.0,
        amount_spent: spent,
        source_file: SourceFile::AdPlatform(1),
    }
}

fn lead(title: &str, activity: &str, status: &str, responsible: Option<&str>) -> LeadRecord {
    LeadRecord {
        current_activity: activity.to_owned(),
        status: status.to_owned(),
        responsible_user: responsible.map(str::to_owned),
        ..LeadRecord::titled(title)
    }
}

fn rows_for(campaigns: &[CampaignRecord], leads: &[LeadRecord]) -> Vec<ComparisonRow> {
    let matches = reconcile(campaigns, leads, &CompiledRules::default());
    build_rows(&matches, leads)
}

#[test]
fn row_counts_leads_and_exact_scheduled_visits() {
    let campaigns = vec![campaign("Felicita 1643", 10.0, 250.0)];
    let leads = vec![
        lead("[1643] Ana", "Visita Agendada", "Novo", Some("Carlos")),
        lead("[1643] Bia", "visita agendada", "Novo", None),
        lead("[1643] Caio", "Contato", "Novo", Some("Dora")),
    ];
    let rows = rows_for(&campaigns, &leads);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.lead_count, 3);
    assert_eq!(row.scheduled_visit_count, 1);
    assert_eq!(row.primary_responsible_user, "Carlos");
    assert_eq!(row.amount_spent, 250.0);
    assert_eq!(
        row.matched_by,
        MatchRule::Project {
            name: "Felicità".to_owned()
        }
    );
}

#[test]
fn primary_responsible_user_uses_first_lead_only() {
    let campaigns = vec![campaign("Felicita 1643", 1.0, 1.0)];
    let leads = vec![
        lead("[1643] Ana", "", "", None),
        lead("[1643] Bia", "", "", Some("Dora")),
    ];
    let rows = rows_for(&campaigns, &leads);
    assert_eq!(rows[0].primary_responsible_user, NOT_INFORMED);
}

#[test]
fn unmatched_campaign_has_sentinel_and_zero_counts() {
    let campaigns = vec![campaign("Sem Leads", 5.0, 80.0)];
    let rows = rows_for(&campaigns, &[]);
    assert_eq!(rows[0].lead_count, 0);
    assert_eq!(rows[0].scheduled_visit_count, 0);
    assert_eq!(rows[0].primary_responsible_user, NOT_INFORMED);
}

#[test]
fn totals_sum_rows_and_derive_cost_per_lead() {
    let campaigns = vec![
        campaign("Felicita 1643", 10.0, 300.0),
        campaign("Casa B Olinda", 4.0, 100.0),
    ];
    let leads = vec![
        lead("[1643] Ana", "", "", None),
        lead("[1643] Bia", "", "", None),
        lead("[3593] Caio", "", "", None),
        lead("[3593] Dora", "", "", None),
    ];
    let rows = rows_for(&campaigns, &leads);
    let totals = compute_totals(&rows);
    assert_eq!(totals.result_count, 14.0);
    assert_eq!(totals.lead_count, 4);
    assert_eq!(totals.lead_count, rows.iter().map(|r| r.lead_count).sum::<usize>());
    assert_eq!(totals.amount_spent, 400.0);
    assert_eq!(totals.cost_per_lead, 100.0);
}

#[test]
fn totals_without_leads_have_zero_cost_per_lead() {
    let rows = rows_for(&[campaign("Sem Leads", 2.0, 50.0)], &[]);
    let totals = compute_totals(&rows);
    assert_eq!(totals.lead_count, 0);
    assert_eq!(totals.cost_per_lead, 0.0);
    assert_eq!(compute_totals(&[]), Totals::default());
}

#[test]
fn archived_leads_ignore_matching_and_normalize_status() {
    let leads = vec![
        lead("[4219] Ana", "", "Arquivado", None),
        lead("[9999] Bia", "", " ARQUIVADO ", None),
        lead("Caio", "", "Novo", None),
        lead("Dora", "", "Arquivada", None),
    ];
    let archived = archived_leads(&leads);
    let titles: Vec<&str> = archived.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["[4219] Ana", "[9999] Bia"]);
}
