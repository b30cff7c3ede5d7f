use serde::Serialize;

use crate::config::ScoreConfig;
use crate::stationary::StationaryVector;

/// Diagnostics d'une position : entropie de la distribution stationnaire
/// et nombre de pas de mélange de l'itération de puissance.
#[derive(Debug, Clone, Serialize)]
pub struct PositionDiagnostic {
    pub position: usize,
    pub states: usize,
    pub entropy_bits: f64,
    /// Entropie maximale possible, log2(k) : borne de lecture du tableau.
    pub max_entropy_bits: f64,
    pub steps: usize,
    pub converged: bool,
}

/// Rapport de diagnostic d'une exécution : paramètres effectifs et
/// table entropie/mélange par position. La non-convergence d'une
/// position y est signalée, jamais traitée comme une erreur.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub game: String,
    pub generated_at: String,
    pub draw_count: usize,
    pub last_draw_date: String,
    pub rng_kind: String,
    /// Seed effectif ; None pour le générateur système.
    pub seed: Option<u64>,
    pub alpha_smooth: f64,
    pub damping: f64,
    pub epsilon: f64,
    pub max_steps: usize,
    pub weight: f64,
    pub candidate_mode: String,
    pub candidates_scored: usize,
    /// Candidats mal formés, écartés sans interrompre l'exécution.
    pub candidates_skipped: usize,
    pub positions: Vec<PositionDiagnostic>,
}

impl RunReport {
    pub fn position_diagnostics(stationary: &[StationaryVector]) -> Vec<PositionDiagnostic> {
        stationary
            .iter()
            .enumerate()
            .map(|(position, sv)| PositionDiagnostic {
                position,
                states: sv.probs.len(),
                entropy_bits: sv.entropy_bits,
                max_entropy_bits: (sv.probs.len() as f64).log2(),
                steps: sv.steps,
                converged: sv.converged,
            })
            .collect()
    }

    /// true si au moins une position a épuisé max_steps sans converger.
    pub fn has_convergence_warning(&self) -> bool {
        self.positions.iter().any(|p| !p.converged)
    }

    pub fn describe_mode(config: &ScoreConfig) -> String {
        match config.mode {
            crate::config::CandidateMode::Enumerate => "énumération complète".to_string(),
            crate::config::CandidateMode::Sample(n) => format!("échantillon de {}", n),
        }
    }
}
