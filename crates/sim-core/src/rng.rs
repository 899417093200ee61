//! Seeded determinism.
//!
//! A single `SimRng` is threaded through the whole tick: processes first (in
//! process order), then attempt resolution (in attempt order), then
//! movement, then intents/plans/states -- matching the consumption order
//! the determinism contract requires. `SmallRng::seed_from_u64` gives a
//! platform-independent, purely-deterministic sequence for a given seed, the
//! same guarantee the teacher's tests assert for `SmallRng` directly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Uniform float in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    /// Uniform integer in the inclusive range `[a, b]`.
    pub fn int(&mut self, a: i64, b: i64) -> i64 {
        if a >= b {
            return a;
        }
        self.0.gen_range(a..=b)
    }

    /// A boolean that's `true` with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p.clamp(0.0, 1.0)
    }

    /// Picks a uniformly random index into a non-empty weighted list using
    /// a running cumulative walk, per the selection rule in spec §4.4:
    /// `weight_i = max(0, score_i)`, draw `r = next() * sum(weights)`, walk
    /// in fixed order until cumulative >= r.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        if weights.is_empty() || total <= 0.0 {
            return None;
        }
        let r = self.next() * total;
        let mut cumulative = 0.0;
        for (i, w) in weights.iter().enumerate() {
            cumulative += w.max(0.0);
            if cumulative >= r {
                return Some(i);
            }
        }
        Some(weights.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SimRng::from_seed(42);
        let mut b = SimRng::from_seed(42);
        for _ in 0..50 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimRng::from_seed(1);
        let mut b = SimRng::from_seed(2);
        let seq_a: Vec<f64> = (0..10).map(|_| a.next()).collect();
        let seq_b: Vec<f64> = (0..10).map(|_| b.next()).collect();
        assert_ne!(seq_a, seq_b);
    }

    #[test]
    fn weighted_index_respects_zero_weights() {
        let mut rng = SimRng::from_seed(7);
        for _ in 0..20 {
            let idx = rng.weighted_index(&[0.0, 5.0, 0.0]).unwrap();
            assert_eq!(idx, 1);
        }
    }

    #[test]
    fn weighted_index_none_when_all_zero() {
        let mut rng = SimRng::from_seed(7);
        assert!(rng.weighted_index(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn int_is_inclusive() {
        let mut rng = SimRng::from_seed(3);
        for _ in 0..200 {
            let v = rng.int(0, 1);
            assert!(v == 0 || v == 1);
        }
    }
}
