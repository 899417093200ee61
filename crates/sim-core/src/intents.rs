//! Emergent intents (§4.7): lightweight, longer-lived urges derived from
//! beliefs, decaying at a fixed rate and capped per NPC.

use crate::ids::SiteId;
use crate::world::npc::{BeliefPredicate, CultRole, Intent, Npc, Trait};
use crate::world::World;

const DECAY_PER_HOUR: f64 = 8.0;
const MAX_INTENTS_PER_NPC: usize = 5;

pub fn decay_and_cap(npc: &mut Npc) {
    for intent in npc.intents.iter_mut() {
        intent.intensity -= DECAY_PER_HOUR;
    }
    npc.intents.retain(|i| i.intensity > 0.0);
    while npc.intents.len() > MAX_INTENTS_PER_NPC {
        npc.intents.remove(0);
    }
}

/// Maps beliefs to intents: a high-confidence `witnessed_crime` paired with
/// high Aggression yields an `attack` intent.
pub fn derive_from_beliefs(npc: &mut Npc) {
    let aggression = npc.trait_value(Trait::Aggression);
    let has_high_conf_crime = npc
        .beliefs
        .iter()
        .any(|b| b.predicate == BeliefPredicate::WitnessedCrime && b.confidence >= 70.0);
    if has_high_conf_crime && aggression >= 60.0 && !npc.intents.iter().any(|i| i.kind == "attack") {
        npc.intents.push(Intent {
            kind: "attack".to_string(),
            target_site_id: None,
            execute_at_tick: None,
            intensity: 100.0,
        });
    }
}

/// Cult cell leaders in high-influence sites get a `raid_plan` intent at
/// the daily boundary, targeting a neighboring settlement.
pub fn derive_raid_plans(world: &mut World, tick: u64) {
    if tick % 24 != 0 {
        return;
    }
    let site_ids = world.site_ids_in_map_order();
    for site_id in &site_ids {
        let influence = world
            .get_site(site_id)
            .and_then(|s| s.settlement())
            .map(|s| s.cult_influence)
            .unwrap_or(0.0);
        if influence < 60.0 {
            continue;
        }
        let target: Option<SiteId> = world
            .map
            .neighbors(site_id)
            .into_iter()
            .find(|(n, _)| world.get_site(n).and_then(|s| s.settlement()).is_some())
            .map(|(n, _)| n.clone());
        let Some(target) = target else { continue };
        let leaders: Vec<_> = world
            .npcs_at_site(site_id)
            .into_iter()
            .filter(|n| matches!(n.cult.role, Some(CultRole::CellLeader)))
            .map(|n| n.id.clone())
            .collect();
        for leader_id in leaders {
            if let Some(leader) = world.get_npc_mut(&leader_id) {
                if !leader.intents.iter().any(|i| i.kind == "raid_plan") {
                    leader.intents.push(Intent {
                        kind: "raid_plan".to_string(),
                        target_site_id: Some(target.clone()),
                        execute_at_tick: Some(tick + 72),
                        intensity: 100.0,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::NpcId;
    use crate::world::npc::{BeliefSource, CultStatus, Emotions, NpcStatus};
    use std::collections::HashMap;

    fn sample_npc() -> Npc {
        Npc {
            id: NpcId::new("a"),
            name: "A".into(),
            category: crate::world::npc::Category::Bandit,
            site_id: crate::ids::SiteId::new("s"),
            home_site_id: crate::ids::SiteId::new("s"),
            alive: true,
            death: None,
            traits: HashMap::from([(Trait::Aggression, 80.0)]),
            needs: HashMap::new(),
            hp: 10.0,
            max_hp: 10.0,
            trauma: 0.0,
            notability: 0.0,
            cult: CultStatus::default(),
            beliefs: vec![],
            relationships: HashMap::new(),
            goals: vec![],
            plan: None,
            intents: vec![],
            knowledge: None,
            inventory: None,
            debts: vec![],
            recent_actions: vec![],
            consecutive_hunger_hours: 0,
            busy_until_tick: 0,
            busy_kind: None,
            last_attempt_tick: None,
            forced_active_until_tick: None,
            travel: None,
            local_travel: None,
            status: NpcStatus::default(),
            away_from_home_since_tick: None,
            family_ids: vec![],
            episodic_memory: vec![],
            emotions: Emotions::default(),
            active_states: vec![],
        }
    }

    #[test]
    fn high_confidence_crime_and_aggression_yields_attack_intent() {
        let mut npc = sample_npc();
        npc.beliefs.push(crate::world::npc::Belief {
            subject_id: NpcId::new("thief"),
            predicate: BeliefPredicate::WitnessedCrime,
            object: "steal".into(),
            confidence: 90.0,
            source: BeliefSource::Witnessed,
            tick: 1,
        });
        derive_from_beliefs(&mut npc);
        assert!(npc.intents.iter().any(|i| i.kind == "attack"));
    }

    #[test]
    fn intents_decay_and_are_removed_at_zero() {
        let mut npc = sample_npc();
        npc.intents.push(Intent { kind: "attack".into(), target_site_id: None, execute_at_tick: None, intensity: 10.0 });
        decay_and_cap(&mut npc);
        assert!(npc.intents.is_empty());
    }
}
