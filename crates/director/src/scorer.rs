//! Event scoring by dramatic interest (§4.8): which events become story
//! beats versus silent chronicle entries.

use serde::{Deserialize, Serialize};
use sim_events::kinds;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWeights {
    #[serde(default)]
    pub base_scores: HashMap<String, f32>,
}

impl Default for EventWeights {
    fn default() -> Self {
        let mut base_scores = HashMap::new();
        base_scores.insert(kinds::NPC_DIED.to_string(), 0.9);
        base_scores.insert(kinds::WORLD_CULT_INCIDENT.to_string(), 0.75);
        base_scores.insert(kinds::ATTEMPT_RECORDED.to_string(), 0.4);
        base_scores.insert(kinds::NPC_DETAINED.to_string(), 0.55);
        base_scores.insert(kinds::NPC_ECLIPSING.to_string(), 0.6);
        base_scores.insert(kinds::WORLD_UNREST_CHANGED.to_string(), 0.2);
        base_scores.insert(kinds::RUMOR_SPREAD.to_string(), 0.15);
        base_scores.insert(kinds::TRAVEL_ARRIVED.to_string(), 0.05);
        base_scores.insert(kinds::SIM_STARTED.to_string(), 0.1);
        base_scores.insert(kinds::SIM_DAY_ENDED.to_string(), 0.1);
        base_scores.insert(kinds::FACTION_OPERATION_CREATED.to_string(), 0.65);
        base_scores.insert(kinds::FACTION_OPERATION_PHASE.to_string(), 0.5);
        base_scores.insert(kinds::FACTION_OPERATION_COMPLETED.to_string(), 0.8);
        base_scores.insert(kinds::FACTION_OPERATION_ABORTED.to_string(), 0.45);
        Self { base_scores }
    }
}

impl EventWeights {
    pub fn base_score(&self, kind: &str) -> f32 {
        self.base_scores.get(kind).copied().unwrap_or(0.1)
    }
}

/// Boosts scores for events naming a currently-tracked actor or already
/// part of an active narrative arc.
#[derive(Debug, Clone, Default)]
pub struct DirectorContext {
    pub tracked_actor_ids: std::collections::HashSet<String>,
    pub active_arc_actor_ids: std::collections::HashSet<String>,
}

impl DirectorContext {
    pub fn track(&mut self, actor_id: impl Into<String>) {
        self.tracked_actor_ids.insert(actor_id.into());
    }
}

#[derive(Debug, Clone)]
pub struct EventScorer {
    weights: EventWeights,
    tracked_boost: f32,
}

impl EventScorer {
    pub fn new(weights: EventWeights) -> Self {
        Self { weights, tracked_boost: 1.5 }
    }

    pub fn score(&self, event: &sim_events::SimEvent, actor_id: Option<&str>, ctx: &DirectorContext) -> f32 {
        let mut score = self.weights.base_score(&event.kind);
        if let Some(actor) = actor_id {
            if ctx.tracked_actor_ids.contains(actor) || ctx.active_arc_actor_ids.contains(actor) {
                score *= self.tracked_boost;
            }
        }
        score.min(1.5)
    }
}

impl Default for EventScorer {
    fn default() -> Self {
        Self::new(EventWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_events::{SimEvent, Visibility};

    #[test]
    fn death_scores_higher_than_arrival() {
        let scorer = EventScorer::default();
        let ctx = DirectorContext::default();
        let death = SimEvent::new(1, 0, 1, kinds::NPC_DIED, Visibility::Public, None, "x", None);
        let arrival = SimEvent::new(2, 0, 2, kinds::TRAVEL_ARRIVED, Visibility::Private, None, "x", None);
        assert!(scorer.score(&death, None, &ctx) > scorer.score(&arrival, None, &ctx));
    }

    #[test]
    fn tracked_actor_boosts_score() {
        let scorer = EventScorer::default();
        let mut ctx = DirectorContext::default();
        let event = SimEvent::new(1, 0, 1, kinds::ATTEMPT_RECORDED, Visibility::Public, None, "x", None);
        let base = scorer.score(&event, Some("npc_a"), &ctx);
        ctx.track("npc_a");
        let boosted = scorer.score(&event, Some("npc_a"), &ctx);
        assert!(boosted > base);
    }
}
