use crate::candidates::{enumerate_all, sample};
use crate::config::{CandidateMode, RngKind, ScoreConfig};
use crate::error::ScoreError;
use crate::history::HistorySeries;
use crate::ranker::rank;
use crate::report::RunReport;
use crate::rng::{build_rng, date_seed};
use crate::scorer::{ScoredGrid, Scorer};
use crate::stationary::{stationary, StationaryVector};
use crate::transition::TransitionModel;

/// Résultat complet d'une exécution : classement intégral et rapport de
/// diagnostic.
pub struct ScoreOutcome {
    pub ranked: Vec<ScoredGrid>,
    pub report: RunReport,
}

pub fn run(game_id: &str, series: &HistorySeries, config: &ScoreConfig) -> Result<ScoreOutcome, ScoreError> {
    run_with(game_id, series, config, |_, _| {})
}

/// Pipeline synchrone : validation, modèle de transitions, distributions
/// stationnaires, candidats, scoring, classement, rapport. `progress`
/// reçoit (scorés, total) à chaque candidat traité.
pub fn run_with(
    game_id: &str,
    series: &HistorySeries,
    config: &ScoreConfig,
    mut progress: impl FnMut(usize, usize),
) -> Result<ScoreOutcome, ScoreError> {
    let domain = series.domain();
    config.validate(domain)?;

    let model = TransitionModel::fit(series, config.alpha_smooth)?;
    let pis: Vec<StationaryVector> = (0..model.positions())
        .map(|pos| stationary(model.matrix(pos), config.damping, config.epsilon, config.max_steps))
        .collect();

    let effective_seed = config.seed.unwrap_or_else(date_seed);
    let candidates = match config.mode {
        CandidateMode::Enumerate => enumerate_all(domain)?,
        CandidateMode::Sample(n) => {
            let mut rng = build_rng(config.rng_kind, effective_seed);
            sample(domain, n, rng.as_mut())
        }
    };

    let scorer = Scorer::new(series, &model, &pis, config);
    let total = candidates.len();
    let mut scored = Vec::with_capacity(total);
    let mut skipped = 0usize;
    for (i, grid) in candidates.iter().enumerate() {
        match scorer.score(grid) {
            Ok(s) => scored.push(s),
            Err(ScoreError::Domain(_)) => skipped += 1,
            Err(e) => return Err(e),
        }
        progress(i + 1, total);
    }

    let ranked = rank(scored);

    let seed_reported = match (config.mode, config.rng_kind) {
        (CandidateMode::Enumerate, _) => None,
        (_, RngKind::Sys) => None,
        _ => Some(effective_seed),
    };

    let report = RunReport {
        game: game_id.to_string(),
        generated_at: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        draw_count: series.len(),
        last_draw_date: series.last().date.clone(),
        rng_kind: config.rng_kind.id().to_string(),
        seed: seed_reported,
        alpha_smooth: config.alpha_smooth,
        damping: config.damping,
        epsilon: config.epsilon,
        max_steps: config.max_steps,
        weight: config.weight,
        candidate_mode: RunReport::describe_mode(config),
        candidates_scored: ranked.len(),
        candidates_skipped: skipped,
        positions: RunReport::position_diagnostics(&pis),
    };

    Ok(ScoreOutcome { ranked, report })
}
