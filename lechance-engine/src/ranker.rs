use crate::scorer::ScoredGrid;

/// Trie les candidats par score décroissant ; à score égal, l'ordre
/// lexicographique naturel de la grille départage — le classement est
/// entièrement déterministe.
pub fn rank(mut scored: Vec<ScoredGrid>) -> Vec<ScoredGrid> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.grid.cmp(&b.grid))
    });
    scored
}

/// Les n meilleurs candidats d'un classement déjà trié.
pub fn top_n(ranked: &[ScoredGrid], n: usize) -> &[ScoredGrid] {
    &ranked[..n.min(ranked.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use lechance_db::models::Grid;

    fn scored(digits: Vec<u8>, score: f64) -> ScoredGrid {
        ScoredGrid {
            grid: Grid::Digits(digits),
            markov_logp: score,
            prior_logp: score,
            score,
        }
    }

    #[test]
    fn test_rank_descending() {
        let ranked = rank(vec![
            scored(vec![1, 1], -3.0),
            scored(vec![2, 2], -1.0),
            scored(vec![3, 3], -2.0),
        ]);
        assert_eq!(ranked[0].grid, Grid::Digits(vec![2, 2]));
        assert_eq!(ranked[1].grid, Grid::Digits(vec![3, 3]));
        assert_eq!(ranked[2].grid, Grid::Digits(vec![1, 1]));
    }

    #[test]
    fn test_ties_break_lexicographic() {
        let ranked = rank(vec![
            scored(vec![9, 0], -1.0),
            scored(vec![0, 9], -1.0),
            scored(vec![5, 5], -1.0),
        ]);
        assert_eq!(ranked[0].grid, Grid::Digits(vec![0, 9]));
        assert_eq!(ranked[1].grid, Grid::Digits(vec![5, 5]));
        assert_eq!(ranked[2].grid, Grid::Digits(vec![9, 0]));
    }

    #[test]
    fn test_top_n() {
        let ranked = rank(vec![
            scored(vec![1], -3.0),
            scored(vec![2], -1.0),
            scored(vec![3], -2.0),
        ]);
        let top = top_n(&ranked, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].grid, Grid::Digits(vec![2]));

        // n au-delà de la taille : tout le classement, sans panique
        assert_eq!(top_n(&ranked, 100).len(), 3);
    }
}
