use lechance_db::models::{validate_grid, GameDomain, Grid};

use crate::config::ScoreConfig;
use crate::error::ScoreError;
use crate::history::HistorySeries;
use crate::stationary::StationaryVector;
use crate::transition::TransitionModel;

/// Plancher appliqué avant tout logarithme, pour éviter log(0).
pub const PROB_FLOOR: f64 = 1e-15;

pub fn floored_ln(p: f64) -> f64 {
    p.max(PROB_FLOOR).ln()
}

/// Candidat scoré : la grille et ses trois composantes dérivées,
/// jamais modifiées après le scoring.
#[derive(Debug, Clone)]
pub struct ScoredGrid {
    pub grid: Grid,
    pub markov_logp: f64,
    pub prior_logp: f64,
    pub score: f64,
}

/// Score d'une grille candidate :
/// `w · logP_markov(grille | dernier tirage) + (1−w) · logP_prior(grille)`,
/// plus, pour les boules uniquement, deux termes heuristiques : bonus de
/// popularité marginale et pénalité de récence. Ces deux termes sont
/// empiriques, pas dérivés statistiquement.
pub struct Scorer<'a> {
    domain: &'a GameDomain,
    model: &'a TransitionModel,
    stationary: &'a [StationaryVector],
    config: &'a ScoreConfig,
    last_indices: Vec<usize>,
    ball_freqs: Option<Vec<f64>>,
    ball_ages: Option<Vec<Option<usize>>>,
}

impl<'a> Scorer<'a> {
    pub fn new(
        series: &'a HistorySeries,
        model: &'a TransitionModel,
        stationary: &'a [StationaryVector],
        config: &'a ScoreConfig,
    ) -> Self {
        let domain = series.domain();
        let last = series.last();
        let last_indices = (0..domain.positions())
            .map(|pos| {
                domain
                    .state_index(pos, last.grid.value_at(pos))
                    .unwrap_or(0)
            })
            .collect();
        Self {
            domain,
            model,
            stationary,
            config,
            last_indices,
            ball_freqs: series.ball_frequencies(),
            ball_ages: series.ball_ages(),
        }
    }

    /// Score une grille. Une grille mal formée est une `ScoreError::Domain` :
    /// l'appelant l'écarte et la compte sans interrompre l'exécution.
    pub fn score(&self, grid: &Grid) -> Result<ScoredGrid, ScoreError> {
        validate_grid(grid, self.domain).map_err(|e| ScoreError::Domain(e.to_string()))?;

        let mut markov_logp = 0.0;
        let mut prior_logp = 0.0;
        for pos in 0..self.domain.positions() {
            let idx = self
                .domain
                .state_index(pos, grid.value_at(pos))
                .ok_or_else(|| {
                    ScoreError::Domain(format!(
                        "valeur {} hors domaine en position {}",
                        grid.value_at(pos),
                        pos
                    ))
                })?;
            markov_logp += floored_ln(self.model.prob(pos, self.last_indices[pos], idx));
            prior_logp += floored_ln(self.stationary[pos].probs[idx]);
        }

        let w = self.config.weight;
        let mut score = w * markov_logp + (1.0 - w) * prior_logp;
        if let Grid::Balls { balls, .. } = grid {
            score += self.popularity_bonus(balls);
            score -= self.recency_penalty(balls);
        }

        Ok(ScoredGrid { grid: grid.clone(), markov_logp, prior_logp, score })
    }

    /// Bonus heuristique : somme pondérée des fréquences marginales des
    /// boules de la grille.
    fn popularity_bonus(&self, balls: &[u8; 5]) -> f64 {
        let (Some(freqs), GameDomain::Balls { lo, .. }) = (&self.ball_freqs, self.domain) else {
            return 0.0;
        };
        let total: f64 = balls.iter().map(|&b| freqs[(b - lo) as usize]).sum();
        self.config.popularity_weight * total
    }

    /// Pénalité heuristique : les boules vues dans la fenêtre des
    /// `recency_window` derniers tirages sont pénalisées, d'autant plus
    /// qu'elles sont récentes.
    fn recency_penalty(&self, balls: &[u8; 5]) -> f64 {
        let (Some(ages), GameDomain::Balls { lo, .. }) = (&self.ball_ages, self.domain) else {
            return 0.0;
        };
        let window = self.config.recency_window;
        if window == 0 {
            return 0.0;
        }
        let mut penalty = 0.0;
        for &b in balls {
            if let Some(age) = ages[(b - lo) as usize] {
                if age < window {
                    penalty += self.config.recency_strength * (window - age) as f64 / window as f64;
                }
            }
        }
        penalty
    }
}
