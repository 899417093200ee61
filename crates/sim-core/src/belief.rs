//! Witness/belief/rumor machinery (§4.5).

use crate::config::Config;
use crate::ids::NpcId;
use crate::reactive_states;
use crate::rng::SimRng;
use crate::world::npc::{Belief, BeliefPredicate, BeliefSource};
use crate::world::site::RumorEntry;
use crate::world::World;

/// Predicate and rumor label derived from an attempt kind for the purpose
/// of witness belief generation (§4.5: "kill -> witnessed_crime/kill" etc).
pub fn predicate_for_attempt_kind(kind: &str) -> Option<(BeliefPredicate, &'static str)> {
    match kind {
        "kill" => Some((BeliefPredicate::WitnessedCrime, "kill")),
        "steal" => Some((BeliefPredicate::WitnessedCrime, "steal")),
        "assault" => Some((BeliefPredicate::WitnessedCrime, "assault")),
        "raid" => Some((BeliefPredicate::WitnessedCrime, "raid")),
        "kidnap" => Some((BeliefPredicate::WitnessedCrime, "kidnap")),
        _ => None,
    }
}

/// Merge a newly-formed belief into an NPC's belief list: superseded
/// duplicates (same subject+predicate+object) merge by max confidence and
/// latest tick (§3). Returns whether this was a genuinely new belief, as
/// opposed to a merge into an existing one, for callers that trigger
/// reactive states on actual belief gain.
pub fn add_belief(beliefs: &mut Vec<Belief>, new_belief: Belief, cap: usize) -> bool {
    if let Some(existing) = beliefs.iter_mut().find(|b| {
        b.subject_id == new_belief.subject_id
            && b.predicate == new_belief.predicate
            && b.object == new_belief.object
    }) {
        existing.confidence = existing.confidence.max(new_belief.confidence);
        existing.tick = existing.tick.max(new_belief.tick);
        return false;
    }
    beliefs.push(new_belief);
    while beliefs.len() > cap {
        beliefs.remove(0);
    }
    true
}

/// Generates a rumor entry and witness beliefs for a public attempt,
/// called by the attempt resolver immediately after a public resolution.
pub fn witness_public_attempt(
    world: &mut World,
    config: &Config,
    actor_id: &NpcId,
    attempt_kind: &str,
    site_id: &crate::ids::SiteId,
    tick: u64,
) {
    let Some((predicate, label)) = predicate_for_attempt_kind(attempt_kind) else {
        return;
    };
    let witnesses: Vec<NpcId> = world
        .npcs_at_site(site_id)
        .into_iter()
        .filter(|n| &n.id != actor_id)
        .map(|n| n.id.clone())
        .collect();

    for witness_id in &witnesses {
        if let Some(witness) = world.get_npc_mut(witness_id) {
            let belief = Belief {
                subject_id: actor_id.clone(),
                predicate,
                object: label.to_string(),
                confidence: 90.0,
                source: BeliefSource::Witnessed,
                tick,
            };
            if add_belief(
                &mut witness.beliefs,
                belief,
                config.limits.max_memories_per_entity,
            ) {
                reactive_states::activate(&mut witness.active_states, "suspicious");
            }
            reactive_states::notify_witnessed_attempt(witness);
        }
    }

    if let Some(site) = world.get_site_mut(site_id) {
        if let Some(settlement) = site.settlement_mut() {
            settlement.rumors.push_back(RumorEntry {
                tick,
                kind: attempt_kind.to_string(),
                actor_id: Some(actor_id.clone()),
                site_id: site_id.clone(),
                confidence: 90.0,
                label: label.to_string(),
            });
            while settlement.rumors.len() > 500 {
                settlement.rumors.pop_front();
            }
        }
    }
}

/// Grants witnesses at `site_id` an `npc_died` belief and the "grieving"
/// reactive state when `deceased_id` dies there (§4.4's kill contract,
/// §4.7's `NpcDied` trigger).
pub fn witness_npc_death(
    world: &mut World,
    config: &Config,
    deceased_id: &NpcId,
    site_id: &crate::ids::SiteId,
    tick: u64,
) {
    let witnesses: Vec<NpcId> = world
        .npcs_at_site(site_id)
        .into_iter()
        .filter(|n| &n.id != deceased_id)
        .map(|n| n.id.clone())
        .collect();
    for witness_id in &witnesses {
        if let Some(witness) = world.get_npc_mut(witness_id) {
            let belief = Belief {
                subject_id: deceased_id.clone(),
                predicate: BeliefPredicate::NpcDied,
                object: "died".to_string(),
                confidence: 95.0,
                source: BeliefSource::Witnessed,
                tick,
            };
            add_belief(
                &mut witness.beliefs,
                belief,
                config.limits.max_memories_per_entity,
            );
            reactive_states::notify_npc_died(witness);
        }
    }
}

/// Rumor propagation at the day boundary (§4.5): a fraction of each rumor
/// jumps to a connected settlement, confidence halved, with a chance to
/// mutate the object field.
pub fn propagate_rumors(world: &mut World, config: &Config, rng: &mut SimRng, tick: u64) {
    let site_ids = world.site_ids_in_map_order();
    let mut spawned: Vec<(crate::ids::SiteId, RumorEntry)> = Vec::new();

    for site_id in &site_ids {
        let neighbors: Vec<crate::ids::SiteId> = world
            .map
            .neighbors(site_id)
            .into_iter()
            .map(|(id, _)| id.clone())
            .collect();
        if neighbors.is_empty() {
            continue;
        }
        let Some(site) = world.get_site(site_id) else {
            continue;
        };
        let Some(settlement) = site.settlement() else {
            continue;
        };
        for rumor in &settlement.rumors {
            if !rng.chance(config.tuning.rumor_spread_chance) {
                continue;
            }
            let dest_idx = rng.int(0, neighbors.len() as i64 - 1) as usize;
            let dest = neighbors[dest_idx].clone();
            let mut spread = rumor.clone();
            spread.confidence *= 0.5;
            spread.site_id = dest.clone();
            if rng.chance(config.tuning.rumor_mutation_chance) {
                spread.label = format!("{}(garbled)", spread.label);
            }
            spread.tick = tick;
            spawned.push((dest, spread));
        }
    }

    for (dest, rumor) in spawned {
        if let Some(site) = world.get_site_mut(&dest) {
            if let Some(settlement) = site.settlement_mut() {
                settlement.rumors.push_back(rumor);
                while settlement.rumors.len() > config.limits.max_rumors_in_world {
                    settlement.rumors.pop_front();
                }
            }
        }
    }
}

/// Return ingestion (§4.5): when an NPC arrives at a site, unseen rumors
/// older than its last visit become beliefs with `source=rumor` and shift
/// relationships toward the mentioned party.
pub fn ingest_rumors_on_arrival(
    world: &mut World,
    config: &Config,
    rng: &mut SimRng,
    npc_id: &NpcId,
    since_tick: u64,
) {
    let site_id = match world.get_npc(npc_id) {
        Some(n) => n.site_id.clone(),
        None => return,
    };
    let rumors: Vec<RumorEntry> = world
        .get_site(&site_id)
        .and_then(|s| s.settlement())
        .map(|s| {
            s.rumors
                .iter()
                .filter(|r| r.tick > since_tick)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    for rumor in rumors {
        let Some(npc) = world.get_npc_mut(npc_id) else {
            return;
        };
        let belief = Belief {
            subject_id: rumor
                .actor_id
                .clone()
                .unwrap_or_else(|| NpcId::new("unknown")),
            predicate: BeliefPredicate::HeardRumor,
            object: rumor.label.clone(),
            confidence: 35.0,
            source: BeliefSource::Rumor,
            tick: rumor.tick,
        };
        if add_belief(
            &mut npc.beliefs,
            belief,
            config.limits.max_memories_per_entity,
        ) {
            reactive_states::activate(&mut npc.active_states, "suspicious");
        }

        if let Some(mentioned) = &rumor.actor_id {
            // Delta range per §4.5 ("trust -25 to 30, fear +15, loyalty to
            // 20 threshold"); the sign of the trust swing is the source's
            // own peculiarity, preserved rather than "fixed" (see §9 open
            // questions on preserving odd-but-specified source behavior).
            let rel = npc.relationships.entry(mentioned.clone()).or_default();
            rel.trust = (rel.trust + rng.int(-25, 30) as f64).clamp(-100.0, 100.0);
            rel.fear = (rel.fear + 15.0).min(100.0);
            rel.loyalty = rel.loyalty.max(20.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_belief_merges_duplicates_by_max_confidence() {
        let mut beliefs = Vec::new();
        add_belief(
            &mut beliefs,
            Belief {
                subject_id: NpcId::new("a"),
                predicate: BeliefPredicate::WitnessedCrime,
                object: "kill".into(),
                confidence: 50.0,
                source: BeliefSource::Witnessed,
                tick: 1,
            },
            10,
        );
        add_belief(
            &mut beliefs,
            Belief {
                subject_id: NpcId::new("a"),
                predicate: BeliefPredicate::WitnessedCrime,
                object: "kill".into(),
                confidence: 90.0,
                source: BeliefSource::Witnessed,
                tick: 5,
            },
            10,
        );
        assert_eq!(beliefs.len(), 1);
        assert_eq!(beliefs[0].confidence, 90.0);
        assert_eq!(beliefs[0].tick, 5);
    }

    #[test]
    fn predicate_mapping_matches_spec_examples() {
        assert_eq!(
            predicate_for_attempt_kind("kill"),
            Some((BeliefPredicate::WitnessedCrime, "kill"))
        );
        assert_eq!(
            predicate_for_attempt_kind("steal"),
            Some((BeliefPredicate::WitnessedCrime, "steal"))
        );
        assert_eq!(predicate_for_attempt_kind("idle"), None);
    }
}
