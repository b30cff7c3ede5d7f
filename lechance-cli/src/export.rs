use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use lechance_db::models::Grid;
use lechance_engine::report::RunReport;
use lechance_engine::{ranker, ScoredGrid, ScoreOutcome};

use crate::display::render_report;

/// Destinations demandées pour les artefacts d'une exécution.
#[derive(Debug, Default, Clone)]
pub struct ExportPlan {
    pub ranked_all: Option<PathBuf>,
    pub ranked_top: Option<PathBuf>,
    pub report_txt: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
}

/// Bilan d'export : un artefact en échec n'empêche jamais les autres
/// d'être tentés.
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl ExportSummary {
    pub fn all_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn export_all(outcome: &ScoreOutcome, top_n: usize, plan: &ExportPlan) -> ExportSummary {
    let mut summary = ExportSummary { written: Vec::new(), failed: Vec::new() };

    let mut attempt = |path: &Option<PathBuf>, result: fn(&Path, &ScoreOutcome, usize) -> Result<()>| {
        if let Some(p) = path {
            match result(p, outcome, top_n) {
                Ok(()) => summary.written.push(p.clone()),
                Err(e) => summary.failed.push((p.clone(), e)),
            }
        }
    };

    attempt(&plan.ranked_all, |p, o, _| write_ranked_csv(p, &o.ranked));
    attempt(&plan.ranked_top, |p, o, n| {
        write_ranked_csv(p, ranker::top_n(&o.ranked, n))
    });
    attempt(&plan.report_txt, |p, o, _| write_report_txt(p, &o.report));
    attempt(&plan.report_json, |p, o, _| write_report_json(p, &o.report));

    summary
}

/// Liste classée au format CSV : champs de la grille puis les trois
/// composantes de score.
pub fn write_ranked_csv(path: &Path, ranked: &[ScoredGrid]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Impossible de créer {:?}", path))?;

    let ball_shape = matches!(ranked.first(), Some(sg) if matches!(sg.grid, Grid::Balls { .. }));
    if ball_shape {
        writer.write_record([
            "rang", "ball_1", "ball_2", "ball_3", "ball_4", "ball_5", "chance",
            "markov_logp", "prior_logp", "score",
        ])?;
    } else {
        writer.write_record(["rang", "grille", "markov_logp", "prior_logp", "score"])?;
    }

    for (i, sg) in ranked.iter().enumerate() {
        let rank = (i + 1).to_string();
        match &sg.grid {
            Grid::Balls { balls, bonus } => {
                let mut record = vec![rank];
                record.extend(balls.iter().map(|b| b.to_string()));
                record.push(bonus.to_string());
                record.push(format!("{:.12}", sg.markov_logp));
                record.push(format!("{:.12}", sg.prior_logp));
                record.push(format!("{:.12}", sg.score));
                writer.write_record(&record)?;
            }
            Grid::Digits(_) => {
                writer.write_record([
                    rank,
                    sg.grid.to_string(),
                    format!("{:.12}", sg.markov_logp),
                    format!("{:.12}", sg.prior_logp),
                    format!("{:.12}", sg.score),
                ])?;
            }
        }
    }

    writer.flush().context("Échec de l'écriture CSV")?;
    Ok(())
}

fn write_report_txt(path: &Path, report: &RunReport) -> Result<()> {
    std::fs::write(path, render_report(report))
        .with_context(|| format!("Impossible d'écrire {:?}", path))
}

fn write_report_json(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Sérialisation du rapport")?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))
}
