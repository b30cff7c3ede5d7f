use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use lechance_db::models::Draw;
use lechance_engine::report::RunReport;
use lechance_engine::ScoredGrid;

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Tirage", "Grille"]);

    for draw in draws {
        table.add_row(vec![&draw.date, &draw.draw_id, &draw.grid.to_string()]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_ranked(ranked: &[ScoredGrid], title: &str) {
    println!("\n🎯 {title}\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Grille", "log P markov", "log P prior", "Score"]);

    for (i, sg) in ranked.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("{}", i + 1)),
            Cell::new(sg.grid.to_string()),
            Cell::new(format!("{:.4}", sg.markov_logp)),
            Cell::new(format!("{:.4}", sg.prior_logp)),
            Cell::new(format!("{:.4}", sg.score)),
        ]);
    }
    println!("{table}");
}

pub fn display_report(report: &RunReport) {
    print!("{}", render_report(report));
    if report.has_convergence_warning() {
        println!(
            "Attention : au moins une position n'a pas convergé en {} pas.",
            report.max_steps
        );
    }
}

/// Rendu texte du rapport : le même contenu part sur le terminal et dans
/// l'artefact rapport.
pub fn render_report(report: &RunReport) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "== Rapport d'exécution ==");
    let _ = writeln!(out, "Jeu               : {}", report.game);
    let _ = writeln!(out, "Généré le         : {}", report.generated_at);
    let _ = writeln!(out, "Tirages utilisés  : {}", report.draw_count);
    let _ = writeln!(out, "Dernier tirage    : {}", report.last_draw_date);
    let _ = writeln!(out, "Générateur        : {}", report.rng_kind);
    let _ = writeln!(
        out,
        "Seed              : {}",
        report
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "—".to_string())
    );
    let _ = writeln!(out, "alpha_smooth      : {}", report.alpha_smooth);
    let _ = writeln!(out, "damping           : {}", report.damping);
    let _ = writeln!(out, "epsilon           : {:e}", report.epsilon);
    let _ = writeln!(out, "max_steps         : {}", report.max_steps);
    let _ = writeln!(out, "weight            : {}", report.weight);
    let _ = writeln!(out, "Candidats         : {}", report.candidate_mode);
    let _ = writeln!(out, "Candidats scorés  : {}", report.candidates_scored);
    let _ = writeln!(out, "Candidats écartés : {}", report.candidates_skipped);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Position",
            "k",
            "Entropie (bits)",
            "Max (bits)",
            "Pas",
            "Convergé",
        ]);
    for diag in &report.positions {
        let converged = if diag.converged { "oui" } else { "NON" };
        let color = if diag.converged { Color::White } else { Color::Red };
        table.add_row(vec![
            Cell::new(diag.position.to_string()),
            Cell::new(diag.states.to_string()),
            Cell::new(format!("{:.6}", diag.entropy_bits)),
            Cell::new(format!("{:.6}", diag.max_entropy_bits)),
            Cell::new(diag.steps.to_string()),
            Cell::new(converged).fg(color),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}
