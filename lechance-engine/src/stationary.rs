/// Distribution stationnaire d'une position, avec ses diagnostics de
/// convergence. Immuable une fois calculée.
#[derive(Debug, Clone)]
pub struct StationaryVector {
    pub probs: Vec<f64>,
    /// Nombre d'itérations effectuées.
    pub steps: usize,
    /// false si max_steps a été atteint sans passer sous epsilon :
    /// signal non fatal, remonté dans le rapport.
    pub converged: bool,
    /// Entropie de Shannon de la distribution, en bits.
    pub entropy_bits: f64,
}

/// Itération de puissance amortie, façon PageRank :
/// π₀ = u ; π_{t+1} = damping·(π_t·P) + (1−damping)·u,
/// arrêt quand ‖π_{t+1} − π_t‖₁ < epsilon ou après max_steps.
/// Le vecteur final est renormalisé pour absorber la dérive flottante.
pub fn stationary(
    matrix: &[Vec<f64>],
    damping: f64,
    epsilon: f64,
    max_steps: usize,
) -> StationaryVector {
    let k = matrix.len();
    let uniform = 1.0 / k as f64;
    let teleport = (1.0 - damping) * uniform;

    let mut pi = vec![uniform; k];
    let mut next = vec![0.0f64; k];
    let mut steps = 0;
    let mut converged = false;

    while steps < max_steps {
        for v in next.iter_mut() {
            *v = teleport;
        }
        for (from, row) in matrix.iter().enumerate() {
            let p_from = pi[from];
            for (to, &p) in row.iter().enumerate() {
                next[to] += damping * p_from * p;
            }
        }
        steps += 1;

        let diff: f64 = pi.iter().zip(next.iter()).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut pi, &mut next);
        if diff < epsilon {
            converged = true;
            break;
        }
    }

    let total: f64 = pi.iter().sum();
    if total > 0.0 {
        for p in &mut pi {
            *p /= total;
        }
    }

    let entropy_bits = shannon_entropy_bits(&pi);
    StationaryVector { probs: pi, steps, converged, entropy_bits }
}

/// Entropie de Shannon en bits : H = −Σ p·log2(p), avec 0·log2(0) = 0.
pub fn shannon_entropy_bits(probs: &[f64]) -> f64 {
    -probs
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| p * p.log2())
        .sum::<f64>()
}
