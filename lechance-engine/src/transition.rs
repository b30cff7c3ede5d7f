use lechance_db::models::GameDomain;

use crate::error::ScoreError;
use crate::history::HistorySeries;

/// Matrice de transition k×k pour une position, à partir de la séquence
/// d'indices d'états observée. Lissage de Laplace `alpha` sur chaque
/// cellule puis normalisation par ligne. Avec `alpha == 0`, une ligne
/// jamais observée comme prédécesseur retombe sur la distribution
/// uniforme plutôt que sur une ligne nulle.
pub fn transition_matrix(
    values: &[usize],
    k: usize,
    alpha: f64,
) -> Result<Vec<Vec<f64>>, ScoreError> {
    if k < 2 {
        return Err(ScoreError::Config(format!(
            "domaine d'états trop petit : k = {} (2 minimum)",
            k
        )));
    }

    let mut counts = vec![vec![0.0f64; k]; k];
    for pair in values.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if prev < k && curr < k {
            counts[prev][curr] += 1.0;
        }
    }

    let uniform = 1.0 / k as f64;
    let mut matrix = vec![vec![0.0f64; k]; k];
    for (from, row) in counts.iter().enumerate() {
        let row_sum: f64 = row.iter().sum();
        let denom = row_sum + alpha * k as f64;
        if denom > 0.0 {
            for to in 0..k {
                matrix[from][to] = (row[to] + alpha) / denom;
            }
        } else {
            // alpha == 0 et prédécesseur jamais observé
            for to in 0..k {
                matrix[from][to] = uniform;
            }
        }
    }
    Ok(matrix)
}

/// Modèle de transitions par position : une matrice k×k stochastique en
/// ligne par position du domaine, construite une fois par exécution puis
/// en lecture seule.
pub struct TransitionModel {
    matrices: Vec<Vec<Vec<f64>>>,
}

impl TransitionModel {
    pub fn fit(series: &HistorySeries, alpha: f64) -> Result<Self, ScoreError> {
        let domain = series.domain();
        let mut matrices = Vec::with_capacity(domain.positions());
        for pos in 0..domain.positions() {
            let k = domain.state_count(pos);
            let values: Vec<usize> = series
                .draws()
                .iter()
                .filter_map(|d| domain.state_index(pos, d.grid.value_at(pos)))
                .collect();
            matrices.push(transition_matrix(&values, k, alpha)?);
        }
        Ok(Self { matrices })
    }

    pub fn positions(&self) -> usize {
        self.matrices.len()
    }

    pub fn matrix(&self, pos: usize) -> &[Vec<f64>] {
        &self.matrices[pos]
    }

    pub fn prob(&self, pos: usize, from: usize, to: usize) -> f64 {
        self.matrices[pos][from][to]
    }
}
