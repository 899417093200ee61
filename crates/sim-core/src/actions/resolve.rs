//! Attempt resolution (§4.4): shared contract across all action kinds --
//! compute success chance, roll, apply world deltas, emit the
//! started/recorded/completed event triptych, and witness public attempts.

use crate::attempt::{ActionKind, Attempt};
use crate::belief::{witness_npc_death, witness_public_attempt};
use crate::config::Config;
use crate::processes::EventContext;
use crate::relationship::{apply_delta, grant_favor};
use crate::rng::SimRng;
use crate::world::npc::{Death, DeathCause, Detention};
use crate::world::site::FoodType;
use crate::world::World;
use sim_events::{kinds, SimEvent, Visibility};

pub struct ResolveOutcome {
    pub success: bool,
    pub consequences: serde_json::Value,
}

/// Roll `int(0,99)`, success iff `roll < clamp(score + mods, 0, 100)`.
fn roll_success(rng: &mut SimRng, score: f64, mods: f64) -> bool {
    let threshold = (score + mods).clamp(0.0, 100.0);
    (rng.int(0, 99) as f64) < threshold
}

pub fn resolve_attempt(
    world: &mut World,
    config: &Config,
    rng: &mut SimRng,
    events: &mut EventContext,
    attempt: &Attempt,
) -> Vec<SimEvent> {
    let mut out = Vec::new();
    out.push(events.emit(
        kinds::ATTEMPT_STARTED,
        Visibility::System,
        Some(attempt.site_id.to_string()),
        format!("{} begins {}", attempt.actor_id, attempt.kind.as_str()),
        Some(serde_json::json!({ "attemptId": attempt.id, "kind": attempt.kind.as_str(), "actorId": attempt.actor_id.to_string() })),
    ));

    let (outcome, mut operation_events) = apply(world, config, rng, events, attempt);

    out.push(events.emit(
        kinds::ATTEMPT_RECORDED,
        attempt.visibility,
        Some(attempt.site_id.to_string()),
        format!(
            "{} {} {}",
            attempt.actor_id,
            attempt.kind.as_str(),
            if outcome.success { "succeeded" } else { "failed" }
        ),
        Some(serde_json::json!({
            "attempt": {
                "id": attempt.id,
                "kind": attempt.kind.as_str(),
                "actorId": attempt.actor_id.to_string(),
                "targetId": attempt.target_id.as_ref().map(|t| t.to_string()),
            },
            "success": outcome.success,
            "consequences": outcome.consequences,
        })),
    ));

    out.push(events.emit(
        kinds::ATTEMPT_COMPLETED,
        Visibility::System,
        Some(attempt.site_id.to_string()),
        format!("{} completed", attempt.kind.as_str()),
        None,
    ));

    if attempt.visibility == Visibility::Public {
        witness_public_attempt(
            world,
            config,
            &attempt.actor_id,
            attempt.kind.as_str(),
            &attempt.site_id,
            attempt.tick,
        );
    } else if outcome.success {
        world.record_secret(attempt.actor_id.clone(), attempt.kind.as_str());
    }

    out.append(&mut operation_events);
    out
}

fn apply(
    world: &mut World,
    config: &Config,
    rng: &mut SimRng,
    events: &mut EventContext,
    attempt: &Attempt,
) -> (ResolveOutcome, Vec<SimEvent>) {
    use ActionKind::*;
    let mut operation_events = Vec::new();
    let outcome = match attempt.kind {
        Idle => ResolveOutcome { success: true, consequences: serde_json::json!({}) },
        Travel => resolve_travel(world, attempt),
        WorkFarm | WorkFish | WorkHunt => resolve_work(world, attempt),
        Steal => resolve_steal(world, rng, attempt),
        Assault => resolve_assault(world, rng, attempt),
        Kill => resolve_kill(world, config, rng, attempt, events, &mut operation_events),
        Kidnap => resolve_kidnap(world, rng, attempt, events, &mut operation_events),
        ForcedEclipse => resolve_forced_eclipse(world, rng, attempt, events, &mut operation_events),
        AnchorSever => resolve_anchor_sever(world, rng, attempt, events, &mut operation_events),
        Investigate => resolve_investigate(world, rng, attempt),
        Raid => resolve_raid(world, rng, attempt),
        PreachFixedPath => resolve_preach(world, attempt),
        Heal => resolve_heal(world, rng, attempt),
        Trade => resolve_trade(world, attempt),
        Arrest => resolve_arrest(world, rng, attempt),
        Patrol | Recon => resolve_generic(world, rng, attempt, 50.0),
        Gossip => resolve_generic(world, rng, attempt, 70.0),
        Blackmail => resolve_generic(world, rng, attempt, 35.0),
    };
    (outcome, operation_events)
}

fn resolve_travel(world: &mut World, attempt: &Attempt) -> ResolveOutcome {
    let Some(to) = attempt
        .resources
        .as_ref()
        .and_then(|r| r.get("to"))
        .and_then(|v| v.as_str())
    else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_destination"}) };
    };
    let to = crate::ids::SiteId::new(to);
    match crate::movement::start_travel(world, &attempt.actor_id, to.clone()) {
        Ok(()) => ResolveOutcome { success: true, consequences: serde_json::json!({ "to": to.to_string() }) },
        Err(reason) => ResolveOutcome { success: false, consequences: serde_json::json!({ "reason": reason }) },
    }
}

fn resolve_work(world: &mut World, attempt: &Attempt) -> ResolveOutcome {
    let food_type = match attempt.kind {
        ActionKind::WorkFarm => FoodType::Grain,
        ActionKind::WorkFish => FoodType::Fish,
        _ => FoodType::Meat,
    };
    let fields_condition = world
        .get_site(&attempt.site_id)
        .and_then(|s| s.settlement())
        .map(|s| s.fields_condition)
        .unwrap_or(1.0);
    let amount = 2.0 * attempt.duration_hours as f64 * fields_condition;
    if let Some(site) = world.get_site_mut(&attempt.site_id) {
        if let Some(settlement) = site.settlement_mut() {
            *settlement.labor_worked_today.entry(food_type).or_insert(0.0) += amount;
        }
    }
    ResolveOutcome {
        success: true,
        consequences: serde_json::json!({ "foodType": food_type.as_str(), "amount": amount }),
    }
}

fn resolve_steal(world: &mut World, rng: &mut SimRng, attempt: &Attempt) -> ResolveOutcome {
    let actor_greed = world.get_npc(&attempt.actor_id).map(|n| n.trait_value(crate::world::npc::Trait::Greed)).unwrap_or(0.0);
    let unrest = world.get_site(&attempt.site_id).and_then(|s| s.settlement()).map(|s| s.unrest).unwrap_or(0.0);
    let success = roll_success(rng, 40.0, actor_greed * 0.3 - unrest * 0.1);
    let mut stolen = 0.0;
    if success {
        if let Some(site) = world.get_site_mut(&attempt.site_id) {
            if let Some(settlement) = site.settlement_mut() {
                for food_type in FoodType::ALL {
                    if let Some(lots) = settlement.food.get_mut(&food_type) {
                        if let Some(newest) = lots.iter_mut().max_by_key(|l| l.produced_day) {
                            let take = newest.amount.min(5.0);
                            newest.amount -= take;
                            stolen = take;
                            break;
                        }
                    }
                }
            }
        }
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "stolen": stolen }) }
}

fn resolve_assault(world: &mut World, rng: &mut SimRng, attempt: &Attempt) -> ResolveOutcome {
    let Some(target_id) = attempt.target_id.clone() else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_target"}) };
    };
    let actor_agg = world.get_npc(&attempt.actor_id).map(|n| n.trait_value(crate::world::npc::Trait::Aggression)).unwrap_or(0.0);
    let target_disc = world.get_npc(&target_id).map(|n| n.trait_value(crate::world::npc::Trait::Discipline)).unwrap_or(0.0);
    let success = roll_success(rng, 40.0, actor_agg * 0.4 - target_disc * 0.2);
    let actor_damage = (rng.int(2, 8)) as f64;
    let target_damage = if success { (rng.int(4, 12)) as f64 } else { (rng.int(1, 4)) as f64 };
    if let Some(actor) = world.get_npc_mut(&attempt.actor_id) {
        actor.hp = (actor.hp - actor_damage).max(0.0);
    }
    if let Some(target) = world.get_npc_mut(&target_id) {
        target.hp = (target.hp - target_damage).max(0.0);
    }
    ResolveOutcome {
        success,
        consequences: serde_json::json!({ "targetId": target_id.to_string(), "actorDamage": actor_damage, "targetDamage": target_damage }),
    }
}

fn resolve_kill(
    world: &mut World,
    config: &Config,
    rng: &mut SimRng,
    attempt: &Attempt,
    events: &mut EventContext,
    out: &mut Vec<SimEvent>,
) -> ResolveOutcome {
    let Some(target_id) = attempt.target_id.clone() else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_target"}) };
    };
    let actor = world.get_npc(&attempt.actor_id);
    let (agg, cour, disc) = actor
        .map(|n| {
            (
                n.trait_value(crate::world::npc::Trait::Aggression),
                n.trait_value(crate::world::npc::Trait::Courage),
                n.trait_value(crate::world::npc::Trait::Discipline),
            )
        })
        .unwrap_or((0.0, 0.0, 0.0));
    let defender_sum = world
        .get_npc(&target_id)
        .map(|n| {
            n.trait_value(crate::world::npc::Trait::Aggression)
                + n.trait_value(crate::world::npc::Trait::Courage)
                + n.trait_value(crate::world::npc::Trait::Discipline)
        })
        .unwrap_or(0.0);
    let mods = (agg + cour + disc) * 0.1 - defender_sum * 0.1;
    let success = roll_success(rng, 30.0, mods);
    if success {
        let at_site = attempt.site_id.clone();
        let actor_id = attempt.actor_id.clone();
        if let Some(target) = world.get_npc_mut(&target_id) {
            target.alive = false;
            target.death = Some(Death {
                tick: attempt.tick,
                cause: DeathCause::Murder,
                by_npc_id: Some(actor_id),
                at_site_id: at_site.clone(),
            });
        }
        out.push(events.emit(
            kinds::NPC_DIED,
            Visibility::Public,
            Some(at_site.to_string()),
            format!("{target_id} was killed by {}", attempt.actor_id),
            Some(serde_json::json!({ "npcId": target_id.to_string(), "cause": "murder", "byNpcId": attempt.actor_id.to_string() })),
        ));
        witness_npc_death(world, config, &target_id, &at_site, attempt.tick);
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "targetId": target_id.to_string() }) }
}

fn resolve_kidnap(
    world: &mut World,
    rng: &mut SimRng,
    attempt: &Attempt,
    events: &mut EventContext,
    operation_events: &mut Vec<SimEvent>,
) -> ResolveOutcome {
    let Some(target_id) = attempt.target_id.clone() else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_target"}) };
    };
    let cult_allies = world
        .npcs_at_site(&attempt.site_id)
        .into_iter()
        .filter(|n| n.cult.member && n.id != attempt.actor_id)
        .count() as f64;
    let success = roll_success(rng, 23.0, cult_allies * 10.0);
    if success {
        let actor_id = attempt.actor_id.clone();
        let site_id = attempt.site_id.clone();
        let until = attempt.tick + 48;
        if let Some(target) = world.get_npc_mut(&target_id) {
            target.status.detained = Some(Detention {
                by_npc_id: actor_id,
                at_site_id: site_id,
                until_tick: until,
            });
        }

        let operation_id = format!("op_{}", world.next_operation_id);
        world.next_operation_id += 1;
        world.operations.insert(
            operation_id.clone(),
            crate::operation::Operation {
                id: operation_id.clone(),
                kind: crate::operation::OperationKind::EclipsingChain,
                actor_id: attempt.actor_id.clone(),
                target_id: target_id.clone(),
                phase: crate::operation::OperationPhase::Planning,
                started_tick: attempt.tick,
            },
        );
        operation_events.push(events.emit(
            kinds::FACTION_OPERATION_CREATED,
            Visibility::System,
            Some(attempt.site_id.to_string()),
            format!("{} opens an eclipsing chain against {target_id}", attempt.actor_id),
            Some(serde_json::json!({
                "operationId": operation_id,
                "kind": crate::operation::OperationKind::EclipsingChain.as_str(),
                "phase": crate::operation::OperationPhase::Planning.as_str(),
                "actorId": attempt.actor_id.to_string(),
                "targetId": target_id.to_string(),
            })),
        ));
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "targetId": target_id.to_string() }) }
}

fn resolve_forced_eclipse(
    world: &mut World,
    rng: &mut SimRng,
    attempt: &Attempt,
    events: &mut EventContext,
    operation_events: &mut Vec<SimEvent>,
) -> ResolveOutcome {
    let Some(target_id) = attempt.target_id.clone() else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_target"}) };
    };
    let detained = world.get_npc(&target_id).map(|n| n.is_detained()).unwrap_or(false);
    if !detained {
        return ResolveOutcome { success: false, consequences: serde_json::json!({ "reason": "target_not_detained" }) };
    }
    let success = roll_success(rng, 60.0, 0.0);
    if success {
        if let Some(target) = world.get_npc_mut(&target_id) {
            target.status.eclipsing = true;
        }
        if let Some(operation_id) = operation_id_for_target(world, &target_id) {
            if let Some(op) = world.operations.get_mut(&operation_id) {
                op.phase = crate::operation::OperationPhase::Execution;
            }
            operation_events.push(events.emit(
                kinds::FACTION_OPERATION_PHASE,
                Visibility::System,
                Some(attempt.site_id.to_string()),
                format!("eclipsing chain against {target_id} enters execution"),
                Some(serde_json::json!({
                    "operationId": operation_id,
                    "phase": crate::operation::OperationPhase::Execution.as_str(),
                    "actorId": attempt.actor_id.to_string(),
                    "targetId": target_id.to_string(),
                })),
            ));
        }
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "targetId": target_id.to_string() }) }
}

fn resolve_anchor_sever(
    world: &mut World,
    rng: &mut SimRng,
    attempt: &Attempt,
    events: &mut EventContext,
    operation_events: &mut Vec<SimEvent>,
) -> ResolveOutcome {
    let Some(target_id) = attempt.target_id.clone() else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_target"}) };
    };
    let success = roll_success(rng, 70.0, 0.0);
    if success {
        if let Some(target) = world.get_npc_mut(&target_id) {
            target.status.eclipsing = false;
        }
        if let Some(operation_id) = operation_id_for_target(world, &target_id) {
            world.operations.remove(&operation_id);
            operation_events.push(events.emit(
                kinds::FACTION_OPERATION_COMPLETED,
                Visibility::System,
                Some(attempt.site_id.to_string()),
                format!("eclipsing chain against {target_id} resolved"),
                Some(serde_json::json!({
                    "operationId": operation_id,
                    "phase": crate::operation::OperationPhase::Outcome.as_str(),
                    "actorId": attempt.actor_id.to_string(),
                    "targetId": target_id.to_string(),
                })),
            ));
        }
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "targetId": target_id.to_string() }) }
}

/// The kidnap chain only ever has one open operation per target at a time,
/// so the most recently started one for this target is the active one.
fn operation_id_for_target(world: &World, target_id: &crate::ids::NpcId) -> Option<String> {
    world
        .operations
        .values()
        .filter(|op| &op.target_id == target_id)
        .max_by_key(|op| op.started_tick)
        .map(|op| op.id.clone())
}

fn resolve_investigate(world: &mut World, rng: &mut SimRng, attempt: &Attempt) -> ResolveOutcome {
    let actor = world.get_npc(&attempt.actor_id);
    let (suspicion, discipline) = actor
        .map(|n| (n.trait_value(crate::world::npc::Trait::Suspicion), n.trait_value(crate::world::npc::Trait::Discipline)))
        .unwrap_or((0.0, 0.0));
    let at_hideout = world.get_site(&attempt.site_id).map(|s| s.is_hidden_hideout()).unwrap_or(false);
    let mut base = 5.0 + (suspicion + discipline) * 0.3;
    if at_hideout {
        base *= 2.0;
    }
    let success = roll_success(rng, base.min(80.0), 0.0);
    if success {
        if let Some(target_id) = &attempt.target_id {
            let belief = crate::world::npc::Belief {
                subject_id: target_id.clone(),
                predicate: crate::world::npc::BeliefPredicate::IdentifiedCultMember,
                object: target_id.to_string(),
                confidence: 80.0,
                source: crate::world::npc::BeliefSource::Witnessed,
                tick: attempt.tick,
            };
            if let Some(actor) = world.get_npc_mut(&attempt.actor_id) {
                if crate::belief::add_belief(&mut actor.beliefs, belief, 100) {
                    crate::reactive_states::activate(&mut actor.active_states, "suspicious");
                }
            }
        }
    }
    ResolveOutcome { success, consequences: serde_json::json!({}) }
}

fn resolve_raid(world: &mut World, rng: &mut SimRng, attempt: &Attempt) -> ResolveOutcome {
    use crate::world::npc::Category;
    let extra_bandits = world
        .npcs_at_site(&attempt.site_id)
        .into_iter()
        .filter(|n| n.category == Category::Bandit && n.id != attempt.actor_id)
        .count() as f64;
    let success = roll_success(rng, 20.0, extra_bandits * 10.0);
    if success {
        let damage = 0.05 + rng.next() * 0.10;
        if let Some(site) = world.get_site_mut(&attempt.site_id) {
            if let Some(settlement) = site.settlement_mut() {
                settlement.fields_condition = (settlement.fields_condition - damage).clamp(0.0, 1.0);
            }
        }
        if rng.chance(0.35) {
            let candidates: Vec<crate::ids::NpcId> = world
                .npcs_at_site(&attempt.site_id)
                .into_iter()
                .filter(|n| n.id != attempt.actor_id)
                .map(|n| n.id.clone())
                .collect();
            if !candidates.is_empty() {
                let idx = rng.int(0, candidates.len() as i64 - 1) as usize;
                let site_id = attempt.site_id.clone();
                let actor_id = attempt.actor_id.clone();
                let tick = attempt.tick;
                if let Some(victim) = world.get_npc_mut(&candidates[idx]) {
                    victim.alive = false;
                    victim.death = Some(Death {
                        tick,
                        cause: DeathCause::Raid,
                        by_npc_id: Some(actor_id),
                        at_site_id: site_id,
                    });
                }
            }
        }
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "extraBandits": extra_bandits }) }
}

fn resolve_preach(world: &mut World, attempt: &Attempt) -> ResolveOutcome {
    let Some(site) = world.get_site(&attempt.site_id) else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({}) };
    };
    let anchor = site.anchoring_strength();
    let influence = site.settlement().map(|s| s.cult_influence).unwrap_or(0.0);
    let anchor_mult = 1.0 - anchor / 100.0;
    let saturation_mult = if influence > 80.0 { 0.5 } else { 1.0 };
    let high_anchor_penalty = if anchor >= 60.0 { 0.5 } else { 1.0 };
    let chance = anchor_mult * saturation_mult * high_anchor_penalty;
    let success = chance > 0.0;
    if success {
        if let Some(site) = world.get_site_mut(&attempt.site_id) {
            if let Some(settlement) = site.settlement_mut() {
                settlement.cult_influence = (settlement.cult_influence + 1.0).min(100.0);
            }
        }
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "chance": chance }) }
}

fn resolve_heal(world: &mut World, rng: &mut SimRng, attempt: &Attempt) -> ResolveOutcome {
    let Some(target_id) = attempt.target_id.clone() else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_target"}) };
    };
    let success = roll_success(rng, 60.0, 0.0);
    if success {
        let heal_amount = (rng.int(5, 15)) as f64;
        if let Some(target) = world.get_npc_mut(&target_id) {
            target.hp = (target.hp + heal_amount).min(target.max_hp);
        }
        let actor_id = attempt.actor_id.clone();
        let tick = attempt.tick;
        if let Some(target) = world.get_npc_mut(&target_id) {
            apply_delta(target, &actor_id, 12.0, -2.0, 6.0);
            grant_favor(target, actor_id, tick, 10.0);
            crate::reactive_states::activate(&mut target.active_states, "grateful");
        }
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "targetId": target_id.to_string() }) }
}

fn resolve_trade(world: &mut World, attempt: &Attempt) -> ResolveOutcome {
    let Some(target_id) = attempt.target_id.clone() else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_target"}) };
    };
    let trust_ok = world
        .get_npc(&attempt.actor_id)
        .and_then(|n| n.relationships.get(&target_id))
        .map(|r| r.trust >= 20.0)
        .unwrap_or(true);
    if !trust_ok {
        return ResolveOutcome { success: false, consequences: serde_json::json!({ "reason": "low_trust" }) };
    }
    ResolveOutcome { success: true, consequences: serde_json::json!({ "targetId": target_id.to_string() }) }
}

fn resolve_arrest(world: &mut World, rng: &mut SimRng, attempt: &Attempt) -> ResolveOutcome {
    let Some(target_id) = attempt.target_id.clone() else {
        return ResolveOutcome { success: false, consequences: serde_json::json!({"reason": "no_target"}) };
    };
    let success = roll_success(rng, 50.0, 0.0);
    if success {
        let site_id = attempt.site_id.clone();
        let actor_id = attempt.actor_id.clone();
        let until = attempt.tick + 24;
        if let Some(target) = world.get_npc_mut(&target_id) {
            target.status.detained = Some(Detention { by_npc_id: actor_id, at_site_id: site_id, until_tick: until });
        }
    }
    ResolveOutcome { success, consequences: serde_json::json!({ "targetId": target_id.to_string() }) }
}

fn resolve_generic(_world: &mut World, rng: &mut SimRng, _attempt: &Attempt, base: f64) -> ResolveOutcome {
    let success = roll_success(rng, base, 0.0);
    ResolveOutcome { success, consequences: serde_json::json!({}) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_success_is_deterministic_under_fixed_rng() {
        let mut rng_a = SimRng::from_seed(5);
        let mut rng_b = SimRng::from_seed(5);
        assert_eq!(roll_success(&mut rng_a, 50.0, 0.0), roll_success(&mut rng_b, 50.0, 0.0));
    }
}
