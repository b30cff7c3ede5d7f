use lechance_db::models::{Draw, GameDomain, Grid};

use crate::error::ScoreError;

/// Séquence historique d'un jeu : tirages en ordre de date strictement
/// croissant, immuable une fois construite. Deux tirages minimum pour
/// entraîner un modèle de transitions.
#[derive(Debug)]
pub struct HistorySeries {
    domain: GameDomain,
    draws: Vec<Draw>,
}

impl HistorySeries {
    pub fn new(domain: GameDomain, mut draws: Vec<Draw>) -> Result<Self, ScoreError> {
        if draws.len() < 2 {
            return Err(ScoreError::Data(draws.len()));
        }
        draws.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.draw_id.cmp(&b.draw_id)));
        Ok(Self { domain, draws })
    }

    pub fn domain(&self) -> &GameDomain {
        &self.domain
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Le tirage le plus récent, point de départ du score markovien.
    pub fn last(&self) -> &Draw {
        &self.draws[self.draws.len() - 1]
    }

    /// Fréquence marginale de chaque boule principale sur tout
    /// l'historique, normalisée (somme = 1). None pour les jeux de
    /// chiffres.
    pub fn ball_frequencies(&self) -> Option<Vec<f64>> {
        let GameDomain::Balls { lo, hi, .. } = self.domain else {
            return None;
        };
        let k = (hi - lo + 1) as usize;
        let mut counts = vec![0u32; k];
        for draw in &self.draws {
            if let Grid::Balls { balls, .. } = &draw.grid {
                for &b in balls {
                    counts[(b - lo) as usize] += 1;
                }
            }
        }
        let total: u32 = counts.iter().sum();
        if total == 0 {
            return Some(vec![0.0; k]);
        }
        Some(counts.iter().map(|&c| c as f64 / total as f64).collect())
    }

    /// Âge de la dernière apparition de chaque boule principale :
    /// 0 = vue au tirage le plus récent, None = jamais vue.
    /// None pour les jeux de chiffres.
    pub fn ball_ages(&self) -> Option<Vec<Option<usize>>> {
        let GameDomain::Balls { lo, hi, .. } = self.domain else {
            return None;
        };
        let k = (hi - lo + 1) as usize;
        let mut ages = vec![None; k];
        for (age, draw) in self.draws.iter().rev().enumerate() {
            if let Grid::Balls { balls, .. } = &draw.grid {
                for &b in balls {
                    let idx = (b - lo) as usize;
                    if ages[idx].is_none() {
                        ages[idx] = Some(age);
                    }
                }
            }
        }
        Some(ages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lechance_db::models::Game;

    fn ball_draw(id: &str, date: &str, balls: [u8; 5], bonus: u8) -> Draw {
        Draw {
            draw_id: id.to_string(),
            date: date.to_string(),
            grid: Grid::Balls { balls, bonus },
        }
    }

    #[test]
    fn test_too_few_draws() {
        let err = HistorySeries::new(Game::Loto.domain(), vec![]).unwrap_err();
        assert!(matches!(err, ScoreError::Data(0)));

        let one = vec![ball_draw("001", "2024-01-01", [1, 2, 3, 4, 5], 1)];
        let err = HistorySeries::new(Game::Loto.domain(), one).unwrap_err();
        assert!(matches!(err, ScoreError::Data(1)));
    }

    #[test]
    fn test_sorted_ascending() {
        let draws = vec![
            ball_draw("002", "2024-01-05", [1, 2, 3, 4, 5], 1),
            ball_draw("001", "2024-01-01", [6, 7, 8, 9, 10], 2),
        ];
        let series = HistorySeries::new(Game::Loto.domain(), draws).unwrap();
        assert_eq!(series.draws()[0].date, "2024-01-01");
        assert_eq!(series.last().date, "2024-01-05");
    }

    #[test]
    fn test_ball_frequencies() {
        let draws = vec![
            ball_draw("001", "2024-01-01", [1, 2, 3, 4, 5], 1),
            ball_draw("002", "2024-01-02", [1, 2, 3, 4, 6], 2),
        ];
        let series = HistorySeries::new(Game::Loto.domain(), draws).unwrap();
        let freqs = series.ball_frequencies().unwrap();
        assert_eq!(freqs.len(), 49);
        // La boule 1 apparaît 2 fois sur 10 tirages de boule
        assert!((freqs[0] - 0.2).abs() < 1e-12);
        // La boule 6 apparaît 1 fois sur 10
        assert!((freqs[5] - 0.1).abs() < 1e-12);
        let sum: f64 = freqs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "les fréquences doivent sommer à 1");
    }

    #[test]
    fn test_ball_ages() {
        let draws = vec![
            ball_draw("001", "2024-01-01", [1, 2, 3, 4, 5], 1),
            ball_draw("002", "2024-01-02", [6, 7, 8, 9, 10], 2),
        ];
        let series = HistorySeries::new(Game::Loto.domain(), draws).unwrap();
        let ages = series.ball_ages().unwrap();
        assert_eq!(ages[5], Some(0)); // boule 6, tirage le plus récent
        assert_eq!(ages[0], Some(1)); // boule 1, tirage précédent
        assert_eq!(ages[20], None); // boule 21, jamais vue
    }

    #[test]
    fn test_digit_series_has_no_ball_helpers() {
        let draws = vec![
            Draw {
                draw_id: "J01".to_string(),
                date: "2024-01-01".to_string(),
                grid: Grid::Digits(vec![1, 2, 3, 4, 5, 6, 7]),
            },
            Draw {
                draw_id: "J02".to_string(),
                date: "2024-01-02".to_string(),
                grid: Grid::Digits(vec![7, 6, 5, 4, 3, 2, 1]),
            },
        ];
        let series = HistorySeries::new(Game::Joker.domain(), draws).unwrap();
        assert!(series.ball_frequencies().is_none());
        assert!(series.ball_ages().is_none());
    }
}
