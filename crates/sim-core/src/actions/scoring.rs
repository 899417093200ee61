//! Scoring pass (§4.4): `score = base + need/trait weighted sum + site
//! condition bonuses`, further adjusted by reactive-state modifiers before
//! selection.

use crate::attempt::ActionKind;
use crate::reactive_states::{self, ActiveState};
use crate::world::npc::{Need, Npc, Trait};
use crate::world::World;

pub struct ScoreBreakdown {
    pub kind: ActionKind,
    pub score: f64,
}

fn base_score(kind: ActionKind, npc: &Npc, world: &World) -> f64 {
    use ActionKind::*;
    let hunger = world
        .get_site(&npc.site_id)
        .and_then(|s| s.settlement())
        .map(|s| s.hunger)
        .unwrap_or(0.0);

    match kind {
        Idle => 5.0,
        Travel => 8.0,
        WorkFarm => {
            let mut score = 40.0
                + npc.need_value(Need::Food) * 0.5
                + npc.need_value(Need::Duty) * 0.3
                + npc.trait_value(Trait::Discipline) * 0.2;
            if hunger > 50.0 {
                score += 20.0;
            }
            score
        }
        WorkFish | WorkHunt => {
            30.0 + npc.need_value(Need::Food) * 0.4 + npc.trait_value(Trait::Discipline) * 0.2
        }
        Trade => 25.0 + npc.need_value(Need::Wealth) * 0.4,
        Patrol => 20.0 + npc.need_value(Need::Duty) * 0.4,
        Investigate => 15.0 + npc.trait_value(Trait::Suspicion) * 0.4 + npc.trait_value(Trait::Curiosity) * 0.2,
        Assault => npc.trait_value(Trait::Aggression) * 0.5 - npc.trait_value(Trait::Empathy) * 0.2,
        Kill => npc.trait_value(Trait::Aggression) * 0.4 - npc.trait_value(Trait::Integrity) * 0.3,
        Kidnap => npc.trait_value(Trait::Ambition) * 0.3 + npc.trait_value(Trait::Aggression) * 0.2,
        Raid => npc.trait_value(Trait::Greed) * 0.3 + npc.trait_value(Trait::Aggression) * 0.2,
        Steal => 10.0 + npc.trait_value(Trait::Greed) * 0.3 + npc.need_value(Need::Wealth) * 0.2,
        Heal => 20.0 + npc.trait_value(Trait::Empathy) * 0.3,
        PreachFixedPath => 18.0 + npc.trait_value(Trait::Ambition) * 0.2,
        ForcedEclipse => 12.0,
        AnchorSever => 12.0,
        Arrest => 15.0 + npc.trait_value(Trait::Discipline) * 0.3,
        Gossip => 10.0 + npc.need_value(Need::Belonging) * 0.3,
        Blackmail => 8.0 + npc.trait_value(Trait::Greed) * 0.2,
        Recon => 10.0 + npc.trait_value(Trait::Suspicion) * 0.2,
    }
}

pub fn score_candidates(
    candidates: &[ActionKind],
    npc: &Npc,
    world: &World,
    active_states: &[ActiveState],
    plan_bias_kind: Option<ActionKind>,
) -> Vec<ScoreBreakdown> {
    candidates
        .iter()
        .map(|&kind| {
            let mut score =
                base_score(kind, npc, world) + reactive_states::scoring_modifier_for(active_states, kind);
            if plan_bias_kind == Some(kind) {
                score += 30.0;
            }
            ScoreBreakdown { kind, score }
        })
        .collect()
}
