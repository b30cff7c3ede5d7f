use chrono::Datelike;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RngKind;

/// Contrat commun des générateurs : un entier uniforme dans [lo, hi]
/// inclus. L'ordre des tirages est fixé par l'appelant, jamais par le
/// générateur, pour préserver le déterminisme de bout en bout.
pub trait GridRng {
    fn randint(&mut self, lo: u32, hi: u32) -> u32;
}

/// Générateur déterministe seedé (StdRng de rand). Même seed, même
/// séquence — c'est le contrat de reproductibilité du mode `mt`.
pub struct MtRng {
    inner: StdRng,
}

impl MtRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: StdRng::seed_from_u64(seed) }
    }
}

impl GridRng for MtRng {
    fn randint(&mut self, lo: u32, hi: u32) -> u32 {
        self.inner.random_range(lo..=hi)
    }
}

/// Registre à décalage à rétroaction linéaire (forme de Galois) sur
/// 32 bits, taps 31 et 28 : polynôme x³¹ + x²⁸ + 1, réciproque du
/// trinôme primitif x³¹ + x³ + 1. Période 2³¹ − 1, strictement
/// inférieure à 2³² − 1. Non cryptographique : choisi uniquement pour
/// une génération légère, auditable et reproductible.
pub struct LfsrRng {
    state: u32,
}

/// Bits 30 et 27 : rétroaction de x³¹ et x²⁸.
const LFSR_TAPS: u32 = 0x4800_0000;

impl LfsrRng {
    pub fn new(seed: u64) -> Self {
        // Repli du seed 64 bits sur l'espace d'états non nul de 31 bits
        let folded = (seed ^ (seed >> 31) ^ (seed >> 62)) as u32 & 0x7FFF_FFFF;
        Self { state: if folded == 0 { 1 } else { folded } }
    }

    pub fn next_u32(&mut self) -> u32 {
        let lsb = self.state & 1;
        self.state >>= 1;
        if lsb == 1 {
            self.state ^= LFSR_TAPS;
        }
        self.state
    }
}

impl GridRng for LfsrRng {
    fn randint(&mut self, lo: u32, hi: u32) -> u32 {
        // Biais modulo négligeable : les plages du domaine sont minuscules
        // devant 2³¹
        lo + self.next_u32() % (hi - lo + 1)
    }
}

/// Entropie système : aucune garantie de reproductibilité, à réserver
/// aux usages sans exigence d'audit.
pub struct SysRng {
    inner: rand::rngs::ThreadRng,
}

impl SysRng {
    pub fn new() -> Self {
        Self { inner: rand::rng() }
    }
}

impl Default for SysRng {
    fn default() -> Self {
        Self::new()
    }
}

impl GridRng for SysRng {
    fn randint(&mut self, lo: u32, hi: u32) -> u32 {
        self.inner.random_range(lo..=hi)
    }
}

/// Construit le générateur demandé. `seed` est ignoré par `sys`.
pub fn build_rng(kind: RngKind, seed: u64) -> Box<dyn GridRng> {
    match kind {
        RngKind::Mt => Box::new(MtRng::new(seed)),
        RngKind::Lfsr => Box::new(LfsrRng::new(seed)),
        RngKind::Sys => Box::new(SysRng::new()),
    }
}

/// Seed par défaut : la date du jour au format YYYYMMDD.
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfsr_same_seed_same_sequence() {
        let mut a = LfsrRng::new(12345);
        let mut b = LfsrRng::new(12345);
        let first_a: Vec<u32> = (0..5).map(|_| a.randint(0, 9)).collect();
        let first_b: Vec<u32> = (0..5).map(|_| b.randint(0, 9)).collect();
        assert_eq!(first_a, first_b, "même seed, même séquence");
    }

    #[test]
    fn test_lfsr_different_seeds_diverge() {
        let mut a = LfsrRng::new(12345);
        let mut b = LfsrRng::new(54321);
        let seq_a: Vec<u32> = (0..20).map(|_| a.next_u32()).collect();
        let seq_b: Vec<u32> = (0..20).map(|_| b.next_u32()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn test_lfsr_state_never_zero() {
        let mut rng = LfsrRng::new(1);
        for _ in 0..100_000 {
            assert_ne!(rng.next_u32(), 0, "l'état nul est absorbant, il doit être inatteignable");
        }
    }

    #[test]
    fn test_lfsr_zero_seed_folded_to_nonzero() {
        let mut rng = LfsrRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_lfsr_state_stays_31_bits() {
        let mut rng = LfsrRng::new(0xFFFF_FFFF_FFFF_FFFF);
        for _ in 0..10_000 {
            assert!(rng.next_u32() < 0x8000_0000);
        }
    }

    #[test]
    fn test_randint_inclusive_bounds() {
        let mut lfsr = LfsrRng::new(7);
        let mut mt = MtRng::new(7);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..10_000 {
            let v = lfsr.randint(3, 7);
            assert!((3..=7).contains(&v));
            let w = mt.randint(3, 7);
            assert!((3..=7).contains(&w));
            seen_lo |= v == 3;
            seen_hi |= v == 7;
        }
        assert!(seen_lo && seen_hi, "les deux bornes incluses doivent être atteintes");
    }

    #[test]
    fn test_randint_degenerate_range() {
        let mut rng = LfsrRng::new(99);
        for _ in 0..10 {
            assert_eq!(rng.randint(5, 5), 5);
        }
    }

    #[test]
    fn test_mt_same_seed_same_sequence() {
        let mut a = MtRng::new(2024);
        let mut b = MtRng::new(2024);
        for _ in 0..100 {
            assert_eq!(a.randint(1, 49), b.randint(1, 49));
        }
    }

    #[test]
    fn test_build_rng_deterministic_kinds() {
        let mut a = build_rng(RngKind::Lfsr, 12345);
        let mut b = build_rng(RngKind::Lfsr, 12345);
        for _ in 0..5 {
            assert_eq!(a.randint(0, 9999), b.randint(0, 9999));
        }
    }

    #[test]
    fn test_date_seed_format() {
        let seed = date_seed();
        assert!(seed >= 20_000_000, "seed trop petit : {seed}");
        assert_eq!(seed.to_string().len(), 8, "le seed doit avoir 8 chiffres");
    }
}
