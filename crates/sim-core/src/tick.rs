//! The tick engine (§4.1): `tickHour(world, attempts) -> (events,
//! dailySummary?)`. One call advances time by exactly one hour, in the
//! fixed order given in the ordering list below.

use crate::actions::{generate, preconditions, resolve};
use crate::attempt::Attempt;
use crate::belief;
use crate::config::Config;
use crate::intents;
use crate::movement;
use crate::notability;
use crate::planning;
use crate::processes::{self, EventContext, ProcessContext};
use crate::reactive_states;
use crate::relationship;
use crate::rng::SimRng;
use crate::summary;
use crate::world::World;
use sim_events::{kinds, DailySummary, SimEvent, Visibility};

pub struct TickOutput {
    pub events: Vec<SimEvent>,
    pub daily_summary: Option<DailySummary>,
}

/// Advances `world` by one hour. `injected_attempts` are applied in the
/// order received, ahead of generated attempts (§4.1 step 3).
#[tracing::instrument(skip(world, config, rng), fields(tick = world.tick))]
pub fn tick_hour(
    world: &mut World,
    config: &Config,
    rng: &mut SimRng,
    next_seq: u64,
    injected_attempts: Vec<Attempt>,
) -> (TickOutput, u64) {
    let tick = world.tick;
    let mut events_ctx = EventContext::new(tick, next_seq);
    let mut all_events = Vec::new();

    {
        let mut ctx = ProcessContext {
            rng,
            events: &mut events_ctx,
            out: &mut all_events,
        };
        processes::run_pipeline(world, config, &mut ctx);
    }

    let mut next_attempt_id = 1u64;
    let mut attempts = injected_attempts;

    let alive_ids = world.alive_npc_ids_sorted();
    for actor_id in &alive_ids {
        if let Some(attempt) = generate::roll_unrest_assault(world, actor_id, rng, next_attempt_id) {
            next_attempt_id += 1;
            attempts.push(attempt);
            continue;
        }
        if let Some(attempt) = generate::roll_bandit_raid(world, actor_id, rng, next_attempt_id) {
            next_attempt_id += 1;
            attempts.push(attempt);
            continue;
        }
        if let Some(attempt) = generate::generate_scored_attempt(world, actor_id, rng, next_attempt_id) {
            next_attempt_id += 1;
            attempts.push(attempt);
        }
    }

    for attempt in &attempts {
        if !preconditions::all_hold(attempt.kind, world, &attempt.actor_id, attempt.target_id.as_ref()) {
            let event = events_ctx.emit(
                kinds::ATTEMPT_ABORTED,
                Visibility::System,
                Some(attempt.site_id.to_string()),
                format!("{} aborted: preconditions failed", attempt.kind.as_str()),
                Some(serde_json::json!({ "attemptId": attempt.id, "kind": attempt.kind.as_str(), "reason": "preconditions" })),
            );
            all_events.push(event);
            continue;
        }
        let mut resolved = resolve::resolve_attempt(world, config, rng, &mut events_ctx, attempt);
        if let Some(actor) = world.get_npc_mut(&attempt.actor_id) {
            actor.last_attempt_tick = Some(tick);
            actor.recent_actions.push(crate::world::npc::RecentAction { tick, kind: attempt.kind.as_str().to_string() });
            if actor.recent_actions.len() > 20 {
                actor.recent_actions.remove(0);
            }
            planning::advance_on_attempt(actor, attempt.kind.as_str());
        }
        all_events.append(&mut resolved);
    }

    movement::progress_travel(world, config, &mut events_ctx);

    if world.hour_of_day() == 23 {
        belief::propagate_rumors(world, config, rng, tick);
    }

    let npc_ids: Vec<_> = world.npcs.keys().cloned().collect();
    for id in &npc_ids {
        let since = world.get_npc(id).map(|n| n.last_attempt_tick.unwrap_or(0)).unwrap_or(0);
        let arrived_this_tick = world
            .get_npc(id)
            .map(|n| n.travel.is_none() && n.away_from_home_since_tick == Some(tick))
            .unwrap_or(false);
        if arrived_this_tick {
            belief::ingest_rumors_on_arrival(world, config, rng, id, since);
        }
    }

    intents::derive_raid_plans(world, tick);
    for id in &npc_ids {
        if let Some(npc) = world.get_npc_mut(id) {
            intents::derive_from_beliefs(npc);
            intents::decay_and_cap(npc);
            planning::maybe_synthesize(npc);
            reactive_states::decay(&mut npc.active_states);
        }
    }

    for id in &npc_ids {
        if let Some(npc) = world.get_npc_mut(id) {
            npc.emotions.stress = (npc.emotions.stress - config.tuning.stress_decay_per_hour).max(0.0);
            npc.emotions.fear = (npc.emotions.fear - config.tuning.emotion_decay_per_hour).max(0.0);
            npc.emotions.anger = (npc.emotions.anger - config.tuning.emotion_decay_per_hour).max(0.0);
            npc.emotions.grief = (npc.emotions.grief - config.tuning.emotion_decay_per_hour).max(0.0);
        }
    }

    if world.hour_of_day() == 0 {
        for id in &npc_ids {
            if let Some(npc) = world.get_npc_mut(id) {
                notability::decay_daily(npc, config);
                relationship::decay_daily(npc, config);
            }
        }
    }

    apply_site_and_need_triggers(world, tick);

    apply_starvation_damage(world, &mut events_ctx, &mut all_events, tick);

    for event in &all_events {
        notability::apply_event_gain(world, event);
    }

    let daily_summary = if world.hour_of_day() == 23 {
        let s = summary::build_daily_summary(world);
        all_events.push(events_ctx.emit(
            kinds::SIM_DAY_ENDED,
            Visibility::System,
            None,
            format!("day {} ended", s.day),
            Some(serde_json::to_value(&s).unwrap()),
        ));
        Some(s)
    } else {
        None
    };

    let next_seq = events_ctx.into_next_seq();
    world.tick += 1;

    (
        TickOutput {
            events: all_events,
            daily_summary,
        },
        next_seq,
    )
}

/// Site- and need-condition reactive-state triggers (§4.7): "desperate" on
/// high food need, "vigilant" on high settlement unrest, "homesick" after
/// three days away from home.
fn apply_site_and_need_triggers(world: &mut World, tick: u64) {
    let ids: Vec<_> = world.npcs.keys().cloned().collect();
    for id in ids {
        let Some((alive, site_id, food_need, away_since)) = world.get_npc(&id).map(|npc| {
            (
                npc.alive,
                npc.site_id.clone(),
                npc.need_value(crate::world::npc::Need::Food),
                npc.away_from_home_since_tick,
            )
        }) else {
            continue;
        };
        if !alive {
            continue;
        }
        let site_unrest = world
            .get_site(&site_id)
            .and_then(|s| s.settlement())
            .map(|s| s.unrest)
            .unwrap_or(0.0);
        let away_hours = away_since.map(|since| tick.saturating_sub(since)).unwrap_or(0);

        let desperate = food_need > 70.0;
        let vigilant = site_unrest > 70.0;
        let homesick = away_hours >= 72;
        if !desperate && !vigilant && !homesick {
            continue;
        }
        if let Some(npc) = world.get_npc_mut(&id) {
            if desperate {
                reactive_states::activate(&mut npc.active_states, "desperate");
            }
            if vigilant {
                reactive_states::activate(&mut npc.active_states, "vigilant");
            }
            if homesick {
                reactive_states::activate(&mut npc.active_states, "homesick");
            }
        }
    }
}

fn apply_starvation_damage(world: &mut World, events: &mut EventContext, out: &mut Vec<SimEvent>, tick: u64) {
    let ids: Vec<_> = world.npcs.keys().cloned().collect();
    for id in ids {
        let Some(npc) = world.get_npc(&id) else { continue };
        if !npc.alive {
            continue;
        }
        let hungry = world
            .get_site(&npc.site_id)
            .and_then(|s| s.settlement())
            .map(|s| s.hunger > 50.0)
            .unwrap_or(false);
        if !hungry {
            if let Some(npc) = world.get_npc_mut(&id) {
                npc.consecutive_hunger_hours = 0;
            }
            continue;
        }
        let Some(npc) = world.get_npc_mut(&id) else { continue };
        npc.consecutive_hunger_hours += 1;
        if npc.consecutive_hunger_hours < 48 {
            continue;
        }
        let is_elder = matches!(npc.category, crate::world::npc::Category::Elder);
        let damage: f64 = if is_elder { (5.0_f64 * 1.5).round() } else { 5.0 };
        npc.hp = (npc.hp - damage).max(0.0);
        if npc.hp <= 0.0 {
            let at_site = npc.site_id.clone();
            npc.alive = false;
            npc.death = Some(crate::world::npc::Death {
                tick,
                cause: crate::world::npc::DeathCause::Starvation,
                by_npc_id: None,
                at_site_id: at_site,
            });
            out.push(events.emit(
                kinds::NPC_DIED,
                Visibility::Public,
                Some(npc.site_id.to_string()),
                format!("{id} died of starvation"),
                Some(serde_json::json!({ "npcId": id.to_string(), "cause": "starvation" })),
            ));
        }
    }
}
