//! Weighted selection over scored candidates (§4.4): `weight_i = max(0,
//! score_i)`, draw proportionally, walk in fixed (definition) order.

use super::scoring::ScoreBreakdown;
use crate::attempt::ActionKind;
use crate::rng::SimRng;

pub fn select(candidates: &[ScoreBreakdown], rng: &mut SimRng) -> Option<ActionKind> {
    let weights: Vec<f64> = candidates.iter().map(|c| c.score.max(0.0)).collect();
    let idx = rng.weighted_index(&weights)?;
    Some(candidates[idx].kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_picks_only_positive_weight() {
        let candidates = vec![
            ScoreBreakdown { kind: ActionKind::Idle, score: -5.0 },
            ScoreBreakdown { kind: ActionKind::WorkFarm, score: 40.0 },
        ];
        let mut rng = SimRng::from_seed(1);
        for _ in 0..20 {
            assert_eq!(select(&candidates, &mut rng), Some(ActionKind::WorkFarm));
        }
    }
}
