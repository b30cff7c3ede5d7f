use std::collections::HashSet;

use lechance_db::models::{GameDomain, Grid};

use crate::error::ScoreError;
use crate::rng::GridRng;

/// Plafond d'énumération exhaustive : au-delà, seul l'échantillonnage
/// est permis.
pub const MAX_ENUMERATE: u64 = 100_000;

/// Énumère toutes les grilles d'un petit domaine de chiffres, en ordre
/// lexicographique croissant. Les domaines à boules (≈19 M de grilles
/// pour le Loto) ne sont jamais énumérables.
pub fn enumerate_all(domain: &GameDomain) -> Result<Vec<Grid>, ScoreError> {
    let GameDomain::Digits { len } = domain else {
        return Err(ScoreError::Config(
            "seuls les domaines de chiffres sont énumérables".to_string(),
        ));
    };
    let size = domain.size();
    if size > MAX_ENUMERATE {
        return Err(ScoreError::Config(format!(
            "énumération interdite : domaine de {} grilles (maximum {})",
            size, MAX_ENUMERATE
        )));
    }
    Ok((0..size).map(|v| decode_digits(v, *len)).collect())
}

fn decode_digits(mut v: u64, len: usize) -> Grid {
    let mut digits = vec![0u8; len];
    for pos in (0..len).rev() {
        digits[pos] = (v % 10) as u8;
        v /= 10;
    }
    Grid::Digits(digits)
}

/// Échantillonne jusqu'à `n` grilles uniques. Termine proprement quand
/// le domaine adressable est épuisé : jamais de boucle infinie.
pub fn sample(domain: &GameDomain, n: usize, rng: &mut dyn GridRng) -> Vec<Grid> {
    let capacity = domain.size();
    let mut seen: HashSet<Grid> = HashSet::new();
    let mut out = Vec::with_capacity(n.min(capacity as usize));

    while out.len() < n && (out.len() as u64) < capacity {
        let grid = draw_grid(domain, rng);
        if seen.insert(grid.clone()) {
            out.push(grid);
        }
    }
    out
}

/// Tire une grille : l'ordre des appels à `randint` est fixe, donc une
/// même séquence de générateur produit une même séquence de grilles.
fn draw_grid(domain: &GameDomain, rng: &mut dyn GridRng) -> Grid {
    match domain {
        GameDomain::Digits { len } => {
            let digits = (0..*len).map(|_| rng.randint(0, 9) as u8).collect();
            Grid::Digits(digits)
        }
        GameDomain::Balls { lo, hi, bonus_lo, bonus_hi } => {
            let mut balls: Vec<u8> = Vec::with_capacity(5);
            while balls.len() < 5 {
                let b = rng.randint(*lo as u32, *hi as u32) as u8;
                if !balls.contains(&b) {
                    balls.push(b);
                }
            }
            balls.sort();
            let mut arr = [0u8; 5];
            arr.copy_from_slice(&balls);
            let bonus = rng.randint(*bonus_lo as u32, *bonus_hi as u32) as u8;
            Grid::Balls { balls: arr, bonus }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{LfsrRng, MtRng};
    use lechance_db::models::{validate_grid, Game};

    #[test]
    fn test_enumerate_four_digits() {
        let domain = GameDomain::Digits { len: 4 };
        let grids = enumerate_all(&domain).unwrap();
        assert_eq!(grids.len(), 10_000);
        assert_eq!(grids[0], Grid::Digits(vec![0, 0, 0, 0]));
        assert_eq!(grids[1], Grid::Digits(vec![0, 0, 0, 1]));
        assert_eq!(grids[9999], Grid::Digits(vec![9, 9, 9, 9]));
        // Ordre lexicographique croissant
        assert!(grids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_enumerate_rejects_large_domain() {
        assert!(enumerate_all(&Game::Joker.domain()).is_err());
        assert!(enumerate_all(&Game::Loto.domain()).is_err());
    }

    #[test]
    fn test_sample_requested_count() {
        let domain = Game::Loto.domain();
        let mut rng = MtRng::new(42);
        let grids = sample(&domain, 100, &mut rng);
        assert_eq!(grids.len(), 100);
        for g in &grids {
            validate_grid(g, &domain).expect("toute grille échantillonnée doit être valide");
        }
    }

    #[test]
    fn test_sample_unique() {
        let domain = GameDomain::Digits { len: 4 };
        let mut rng = MtRng::new(42);
        let grids = sample(&domain, 500, &mut rng);
        let unique: HashSet<_> = grids.iter().collect();
        assert_eq!(unique.len(), grids.len(), "aucun doublon attendu");
    }

    #[test]
    fn test_sample_exhausts_domain_and_stops() {
        // 20 000 demandées sur un domaine de 10 000 : exactement 10 000
        // grilles uniques, sans boucle infinie
        let domain = GameDomain::Digits { len: 4 };
        let mut rng = MtRng::new(12345);
        let grids = sample(&domain, 20_000, &mut rng);
        assert_eq!(grids.len(), 10_000);
        let unique: HashSet<_> = grids.iter().collect();
        assert_eq!(unique.len(), 10_000);
    }

    #[test]
    fn test_sample_deterministic_with_lfsr() {
        let domain = Game::Loto.domain();
        let mut a = LfsrRng::new(12345);
        let mut b = LfsrRng::new(12345);
        let ga = sample(&domain, 5, &mut a);
        let gb = sample(&domain, 5, &mut b);
        assert_eq!(ga, gb, "même seed LFSR, mêmes 5 premières grilles");
    }

    #[test]
    fn test_sampled_balls_sorted_distinct() {
        let domain = Game::Loto.domain();
        let mut rng = LfsrRng::new(7);
        for grid in sample(&domain, 50, &mut rng) {
            let Grid::Balls { balls, bonus } = grid else {
                panic!("attendu des grilles à boules");
            };
            assert!(balls.windows(2).all(|w| w[0] < w[1]));
            assert!((1..=10).contains(&bonus));
        }
    }
}
