//! Candidate-attempt generation (§4.4): `generateScoredAttempt` is the main
//! path; `generateReflexAttempt` is a simpler fallback used when scoring
//! yields nothing and as a test oracle. Two standing random rolls
//! (high-unrest assault, bandit raid) run independently of scoring.

use super::preconditions::all_hold;
use super::scoring::score_candidates;
use super::selection::select;
use crate::attempt::{ActionKind, Attempt, IntentMagnitude};
use crate::ids::NpcId;
use crate::rng::SimRng;
use crate::world::npc::Category;
use crate::world::World;
use sim_events::Visibility;

fn pick_target_for(kind: ActionKind, world: &World, actor_id: &NpcId) -> Option<NpcId> {
    let actor = world.get_npc(actor_id)?;
    match kind {
        ActionKind::Trade | ActionKind::Heal | ActionKind::Gossip | ActionKind::Assault | ActionKind::Kill
        | ActionKind::Kidnap | ActionKind::Steal | ActionKind::Blackmail | ActionKind::Arrest => world
            .npcs_at_site(&actor.site_id)
            .into_iter()
            .find(|n| &n.id != actor_id)
            .map(|n| n.id.clone()),
        ActionKind::ForcedEclipse => world
            .npcs_at_site(&actor.site_id)
            .into_iter()
            .find(|n| &n.id != actor_id && n.is_detained())
            .map(|n| n.id.clone()),
        ActionKind::AnchorSever => world
            .npcs_at_site(&actor.site_id)
            .into_iter()
            .find(|n| &n.id != actor_id && n.status.eclipsing)
            .map(|n| n.id.clone()),
        _ => None,
    }
}

/// Travel has no NPC target; it needs a destination site, picked uniformly
/// among the actor's map neighbors and carried in `Attempt.resources` since
/// `target_id` is typed for NPCs.
fn pick_travel_destination(world: &World, actor_id: &NpcId, rng: &mut SimRng) -> Option<crate::ids::SiteId> {
    let actor = world.get_npc(actor_id)?;
    let neighbors = world.map.neighbors(&actor.site_id);
    if neighbors.is_empty() {
        return None;
    }
    let idx = rng.int(0, neighbors.len() as i64 - 1) as usize;
    Some(neighbors[idx].0.clone())
}

fn visibility_for(kind: ActionKind) -> Visibility {
    use ActionKind::*;
    match kind {
        Idle | Investigate | ForcedEclipse | AnchorSever | Blackmail | Recon => Visibility::Private,
        _ => Visibility::Public,
    }
}

/// Main generation path: score the full closed `ActionKind` vocabulary
/// (§4.4), filtered down to whatever kind's preconditions currently hold,
/// select weighted, build an `Attempt` if preconditions hold for the
/// chosen kind.
pub fn generate_scored_attempt(
    world: &World,
    actor_id: &NpcId,
    rng: &mut SimRng,
    next_attempt_id: u64,
) -> Option<Attempt> {
    let actor = world.get_npc(actor_id)?;
    if !actor.alive || actor.is_busy(world.tick) || actor.is_traveling() || actor.is_detained() {
        return None;
    }

    let candidates: Vec<ActionKind> = ActionKind::ALL
        .iter()
        .copied()
        .filter(|&kind| {
            if kind == ActionKind::Travel {
                return !world.map.neighbors(&actor.site_id).is_empty() && all_hold(kind, world, actor_id, None);
            }
            let target = pick_target_for(kind, world, actor_id);
            all_hold(kind, world, actor_id, target.as_ref())
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let plan_bias = actor
        .plan
        .as_ref()
        .and_then(|p| p.current_step())
        .and_then(|s| ActionKind::ALL.iter().find(|k| k.as_str() == s.kind).copied());

    let scored = score_candidates(&candidates, actor, world, &actor.active_states, plan_bias);
    let kind = select(&scored, rng)?;

    let (target_id, resources) = if kind == ActionKind::Travel {
        let to = pick_travel_destination(world, actor_id, rng);
        (None, to.map(|to| serde_json::json!({ "to": to.to_string() })))
    } else {
        (pick_target_for(kind, world, actor_id), None)
    };

    Some(Attempt {
        id: next_attempt_id,
        tick: world.tick,
        kind,
        visibility: visibility_for(kind),
        actor_id: actor_id.clone(),
        target_id,
        site_id: actor.site_id.clone(),
        duration_hours: 1,
        intent_magnitude: IntentMagnitude::Normal,
        resources,
        why: None,
    })
}

/// Legacy fallback path (§4.4): always idle. Used when the scored path
/// yields nothing, and as a deterministic test oracle.
pub fn generate_reflex_attempt(world: &World, actor_id: &NpcId, next_attempt_id: u64) -> Attempt {
    let site_id = world
        .get_npc(actor_id)
        .map(|n| n.site_id.clone())
        .unwrap_or_else(|| crate::ids::SiteId::new("unknown"));
    Attempt {
        id: next_attempt_id,
        tick: world.tick,
        kind: ActionKind::Idle,
        visibility: Visibility::Private,
        actor_id: actor_id.clone(),
        target_id: None,
        site_id,
        duration_hours: 1,
        intent_magnitude: IntentMagnitude::Minor,
        resources: None,
        why: None,
    }
}

/// High-unrest sites trigger a 5% random assault roll per NPC (§4.4).
pub fn roll_unrest_assault(
    world: &World,
    actor_id: &NpcId,
    rng: &mut SimRng,
    next_attempt_id: u64,
) -> Option<Attempt> {
    let actor = world.get_npc(actor_id)?;
    let unrest = world
        .get_site(&actor.site_id)
        .and_then(|s| s.settlement())
        .map(|s| s.unrest)
        .unwrap_or(0.0);
    if unrest <= 70.0 || !rng.chance(0.05) {
        return None;
    }
    let target = world
        .npcs_at_site(&actor.site_id)
        .into_iter()
        .find(|n| &n.id != actor_id)?
        .id
        .clone();
    Some(Attempt {
        id: next_attempt_id,
        tick: world.tick,
        kind: ActionKind::Assault,
        visibility: Visibility::Public,
        actor_id: actor_id.clone(),
        target_id: Some(target),
        site_id: actor.site_id.clone(),
        duration_hours: 1,
        intent_magnitude: IntentMagnitude::Major,
        resources: None,
        why: None,
    })
}

/// Bandits at a site with Food>50 settlement trigger a 20% raid roll (§4.4).
pub fn roll_bandit_raid(
    world: &World,
    actor_id: &NpcId,
    rng: &mut SimRng,
    next_attempt_id: u64,
) -> Option<Attempt> {
    let actor = world.get_npc(actor_id)?;
    if actor.category != Category::Bandit {
        return None;
    }
    let food_total: f64 = world
        .get_site(&actor.site_id)
        .and_then(|s| s.settlement())
        .map(|s| s.food.values().flat_map(|l| l.iter()).map(|l| l.amount).sum())
        .unwrap_or(0.0);
    if food_total <= 50.0 || !rng.chance(0.20) {
        return None;
    }
    Some(Attempt {
        id: next_attempt_id,
        tick: world.tick,
        kind: ActionKind::Raid,
        visibility: Visibility::Public,
        actor_id: actor_id.clone(),
        target_id: None,
        site_id: actor.site_id.clone(),
        duration_hours: 1,
        intent_magnitude: IntentMagnitude::Major,
        resources: None,
        why: None,
    })
}
