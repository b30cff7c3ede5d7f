use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use lechance_db::models::GameDomain;

use crate::candidates::MAX_ENUMERATE;
use crate::error::ScoreError;

/// Générateur pseudo-aléatoire utilisé pour l'échantillonnage des
/// candidats. Tout identifiant inconnu est refusé au démarrage : aucun
/// repli silencieux vers un générateur par défaut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RngKind {
    /// Générateur déterministe seedé (StdRng de rand).
    Mt,
    /// Registre à décalage de Galois 32 bits, léger et auditable.
    Lfsr,
    /// Entropie système, sans garantie de reproductibilité.
    Sys,
}

impl RngKind {
    pub fn id(&self) -> &'static str {
        match self {
            RngKind::Mt => "mt",
            RngKind::Lfsr => "lfsr",
            RngKind::Sys => "sys",
        }
    }

    pub fn from_id(s: &str) -> Result<Self, ScoreError> {
        match s {
            "mt" => Ok(RngKind::Mt),
            "lfsr" => Ok(RngKind::Lfsr),
            "sys" => Ok(RngKind::Sys),
            other => Err(ScoreError::Config(format!(
                "générateur inconnu : '{}' (attendu : mt, lfsr, sys)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RngKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Mode de génération des candidats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateMode {
    /// Énumérer tout le domaine (petits domaines de chiffres uniquement).
    Enumerate,
    /// Échantillonner n grilles uniques via le générateur configuré.
    Sample(usize),
}

/// Configuration immuable d'une exécution de scoring, transmise
/// explicitement de bout en bout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub rng_kind: RngKind,
    pub seed: Option<u64>,
    /// Lissage de Laplace α ≥ 0 sur les comptages de transitions.
    pub alpha_smooth: f64,
    /// Amortissement de l'itération de puissance, dans (0, 1].
    pub damping: f64,
    /// Tolérance de convergence (norme L1).
    pub epsilon: f64,
    pub max_steps: usize,
    pub mode: CandidateMode,
    /// Poids w du mélange markov/prior, dans [0, 1].
    pub weight: f64,
    pub top_n: usize,
    /// Bonus heuristique de popularité marginale (boules uniquement).
    pub popularity_weight: f64,
    /// Fenêtre de la pénalité de récence, en tirages (boules uniquement).
    pub recency_window: usize,
    /// Intensité de la pénalité de récence (boules uniquement).
    pub recency_strength: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            rng_kind: RngKind::Mt,
            seed: None,
            alpha_smooth: 1.0,
            damping: 0.85,
            epsilon: 1e-10,
            max_steps: 1000,
            mode: CandidateMode::Sample(1000),
            weight: 0.5,
            top_n: 10,
            popularity_weight: 0.1,
            recency_window: 10,
            recency_strength: 0.05,
        }
    }
}

impl ScoreConfig {
    /// Valide les paramètres avant tout calcul : une configuration
    /// invalide ne doit jamais atteindre le modèle.
    pub fn validate(&self, domain: &GameDomain) -> Result<(), ScoreError> {
        if !self.alpha_smooth.is_finite() || self.alpha_smooth < 0.0 {
            return Err(ScoreError::Config(format!(
                "alpha_smooth doit être ≥ 0 (reçu {})",
                self.alpha_smooth
            )));
        }
        if !self.damping.is_finite() || self.damping <= 0.0 || self.damping > 1.0 {
            return Err(ScoreError::Config(format!(
                "damping doit être dans (0, 1] (reçu {})",
                self.damping
            )));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ScoreError::Config(format!(
                "epsilon doit être > 0 (reçu {})",
                self.epsilon
            )));
        }
        if self.max_steps == 0 {
            return Err(ScoreError::Config("max_steps doit être ≥ 1".to_string()));
        }
        if !self.weight.is_finite() || self.weight < 0.0 || self.weight > 1.0 {
            return Err(ScoreError::Config(format!(
                "weight doit être dans [0, 1] (reçu {})",
                self.weight
            )));
        }
        match self.mode {
            CandidateMode::Sample(0) => {
                return Err(ScoreError::Config(
                    "le nombre de candidats doit être ≥ 1".to_string(),
                ));
            }
            CandidateMode::Enumerate => {
                let size = domain.size();
                if !matches!(domain, GameDomain::Digits { .. }) || size > MAX_ENUMERATE {
                    return Err(ScoreError::Config(format!(
                        "énumération interdite : domaine de {} grilles (maximum {})",
                        size, MAX_ENUMERATE
                    )));
                }
            }
            CandidateMode::Sample(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lechance_db::models::Game;

    fn digits4() -> GameDomain {
        GameDomain::Digits { len: 4 }
    }

    #[test]
    fn test_default_config_valid() {
        let config = ScoreConfig::default();
        assert!(config.validate(&digits4()).is_ok());
        assert!(config.validate(&Game::Loto.domain()).is_ok());
    }

    #[test]
    fn test_rng_kind_from_id() {
        assert_eq!(RngKind::from_id("mt").unwrap(), RngKind::Mt);
        assert_eq!(RngKind::from_id("lfsr").unwrap(), RngKind::Lfsr);
        assert_eq!(RngKind::from_id("sys").unwrap(), RngKind::Sys);
    }

    #[test]
    fn test_unknown_rng_fails_closed() {
        let err = RngKind::from_id("xorshift").unwrap_err();
        assert!(matches!(err, ScoreError::Config(_)));
    }

    #[test]
    fn test_damping_out_of_range() {
        let mut config = ScoreConfig::default();
        config.damping = 0.0;
        assert!(config.validate(&digits4()).is_err());
        config.damping = 1.5;
        assert!(config.validate(&digits4()).is_err());
        config.damping = 1.0;
        assert!(config.validate(&digits4()).is_ok());
    }

    #[test]
    fn test_weight_out_of_range() {
        let mut config = ScoreConfig::default();
        config.weight = -0.1;
        assert!(config.validate(&digits4()).is_err());
        config.weight = 1.1;
        assert!(config.validate(&digits4()).is_err());
    }

    #[test]
    fn test_negative_smoothing_rejected() {
        let mut config = ScoreConfig::default();
        config.alpha_smooth = -1.0;
        assert!(config.validate(&digits4()).is_err());
        config.alpha_smooth = 0.0;
        assert!(config.validate(&digits4()).is_ok());
    }

    #[test]
    fn test_enumerate_small_domain_ok() {
        let mut config = ScoreConfig::default();
        config.mode = CandidateMode::Enumerate;
        // 10^4 = 10 000 grilles : autorisé
        assert!(config.validate(&digits4()).is_ok());
    }

    #[test]
    fn test_enumerate_large_domain_rejected() {
        let mut config = ScoreConfig::default();
        config.mode = CandidateMode::Enumerate;
        // 10^7 grilles pour le Joker : refusé
        assert!(config.validate(&Game::Joker.domain()).is_err());
        // Domaine à boules : jamais énumérable
        assert!(config.validate(&Game::Loto.domain()).is_err());
    }

    #[test]
    fn test_zero_candidates_rejected() {
        let mut config = ScoreConfig::default();
        config.mode = CandidateMode::Sample(0);
        assert!(config.validate(&digits4()).is_err());
    }
}
