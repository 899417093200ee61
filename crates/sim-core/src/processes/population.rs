//! Population dynamics: refugee inflow, named refugees, sickness drift,
//! starvation/illness deaths, births, migration (§4.3, daily at hour 0).

use super::ProcessContext;
use crate::config::Config;
use crate::ids::NpcId;
use crate::world::npc::{Category, CultStatus, Emotions, Npc, NpcStatus, Trait};
use crate::world::World;
use sim_events::{kinds, Visibility};
use std::collections::HashMap;

pub fn run(world: &mut World, _config: &Config, ctx: &mut ProcessContext) {
    let tick = world.tick;
    let site_ids = world.site_ids_in_map_order();

    for site_id in &site_ids {
        if let Some(site) = world.get_site_mut(site_id) {
            if let Some(settlement) = site.settlement_mut() {
                settlement.deaths_today.clear();
            }
        }
    }

    refugee_inflow(world, ctx, &site_ids, tick);
    named_refugees(world, ctx, &site_ids, tick);
    sickness_drift(world);
    starvation_and_illness_deaths(world, ctx, tick);
    births(world, ctx, tick);
    migration(world, ctx, &site_ids, tick);
}

fn settlement_score(world: &World, site_id: &crate::ids::SiteId) -> Option<f64> {
    let site = world.get_site(site_id)?;
    if site.culture != crate::world::site::Culture::Human {
        return None;
    }
    let settlement = site.settlement()?;
    let housing_slack = (settlement.housing_capacity - settlement.cohorts.total()).max(0.0);
    let per_capita = per_capita_stored(settlement);
    Some(
        2.0 * housing_slack
            + (100.0 - settlement.unrest)
            + 0.2 * (100.0 - settlement.sickness)
            + (per_capita * 20.0).clamp(0.0, 60.0),
    )
}

fn per_capita_stored(settlement: &crate::world::site::Settlement) -> f64 {
    let total_food: f64 = settlement
        .food
        .values()
        .flat_map(|lots| lots.iter())
        .map(|lot| lot.amount)
        .sum();
    let pop = settlement.cohorts.total().max(1.0);
    total_food / pop
}

fn pick_destination(
    world: &World,
    site_ids: &[crate::ids::SiteId],
    rng: &mut crate::rng::SimRng,
) -> Option<crate::ids::SiteId> {
    let mut scored: Vec<(crate::ids::SiteId, f64)> = site_ids
        .iter()
        .filter_map(|id| {
            let settlement = world.get_site(id)?.settlement()?;
            if per_capita_stored(settlement) < 0.6 {
                return None;
            }
            if settlement.cohorts.total() >= settlement.housing_capacity {
                return None;
            }
            settlement_score(world, id).map(|score| (id.clone(), score))
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    scored.truncate(3);
    if scored.is_empty() {
        return None;
    }
    let idx = rng.int(0, scored.len() as i64 - 1) as usize;
    Some(scored[idx].0.clone())
}

fn refugee_inflow(
    world: &mut World,
    ctx: &mut ProcessContext,
    site_ids: &[crate::ids::SiteId],
    tick: u64,
) {
    let count = ctx.rng.int(0, 2);
    if count == 0 {
        return;
    }
    let Some(dest) = pick_destination(world, site_ids, ctx.rng) else {
        return;
    };
    let adults = (count as f64 * 0.7).round();
    let children = count as f64 - adults;
    if let Some(site) = world.get_site_mut(&dest) {
        if let Some(settlement) = site.settlement_mut() {
            settlement.cohorts.adults += adults;
            settlement.cohorts.children += children;
        }
    }
    ctx.out.push(ctx.events.emit(
        kinds::WORLD_POPULATION_REFUGEES,
        Visibility::Public,
        Some(dest.to_string()),
        format!("{count} refugees arrived at {dest}"),
        Some(serde_json::json!({ "siteId": dest.to_string(), "count": count, "tick": tick })),
    ));
}

fn named_refugees(
    world: &mut World,
    ctx: &mut ProcessContext,
    site_ids: &[crate::ids::SiteId],
    tick: u64,
) {
    for site_id in site_ids {
        let (culture, underpopulated) = match world.get_site(site_id) {
            Some(site) => {
                let is_human = site.culture == crate::world::site::Culture::Human;
                let under = site
                    .settlement()
                    .map(|s| s.cohorts.total() < 0.5 * s.housing_capacity)
                    .unwrap_or(false);
                (is_human, under)
            }
            None => continue,
        };
        if !culture || !underpopulated {
            continue;
        }
        if !ctx.rng.chance(0.35) {
            continue;
        }
        let spawn_count = ctx.rng.int(1, 3);
        for i in 0..spawn_count {
            let id = NpcId::new(format!("refugee_{tick}_{site_id}_{i}"));
            let mut traits = HashMap::new();
            traits.insert(Trait::Fear, ctx.rng.int(70, 90) as f64);
            let mut relationships = HashMap::new();
            for existing in world.npcs_at_site(site_id) {
                relationships.insert(
                    existing.id.clone(),
                    crate::world::npc::Relationship {
                        trust: -15.0,
                        fear: 0.0,
                        loyalty: 0.0,
                    },
                );
            }
            let npc = Npc {
                id: id.clone(),
                name: format!("Refugee {i}"),
                category: Category::Refugee,
                site_id: site_id.clone(),
                home_site_id: site_id.clone(),
                alive: true,
                death: None,
                traits,
                needs: HashMap::new(),
                hp: 10.0,
                max_hp: 10.0,
                trauma: 20.0,
                notability: 0.0,
                cult: CultStatus::default(),
                beliefs: vec![],
                relationships,
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
            };
            world.npcs.insert(id, npc);
            if let Some(site) = world.get_site_mut(site_id) {
                if let Some(settlement) = site.settlement_mut() {
                    settlement.cohorts.adults += 1.0;
                }
            }
        }
    }
}

fn sickness_drift(world: &mut World) {
    let site_ids = world.site_ids_in_map_order();
    for site_id in &site_ids {
        let Some(site) = world.get_site_mut(site_id) else {
            continue;
        };
        let Some(settlement) = site.settlement_mut() else {
            continue;
        };
        let per_capita = per_capita_stored(settlement);
        let reserve_stress = (0.6 - per_capita / 3.0).clamp(0.0, 0.6);
        let crowd_stress = ((settlement.cohorts.total() - settlement.housing_capacity).max(0.0)
            / settlement.housing_capacity.max(1.0))
        .min(1.0);
        let delta =
            (settlement.hunger / 100.0 * 7.0 + crowd_stress * 3.0 + reserve_stress * 2.0).round();
        if settlement.hunger < 5.0 && reserve_stress < 0.05 {
            settlement.sickness = (settlement.sickness - 2.0).max(0.0);
        } else {
            settlement.sickness = (settlement.sickness + delta).clamp(0.0, 100.0);
        }
    }
}

fn starvation_and_illness_deaths(world: &mut World, ctx: &mut ProcessContext, tick: u64) {
    let site_ids = world.site_ids_in_map_order();
    for site_id in &site_ids {
        let hunger = match world.get_site(site_id).and_then(|s| s.settlement()) {
            Some(s) => s.hunger,
            None => continue,
        };
        if hunger >= 70.0 {
            let rate = ((hunger - 70.0) / 30.0).clamp(0.0, 1.0) * 0.008;
            let cohorts = world.get_site(site_id).and_then(|s| s.settlement()).map(|s| s.cohorts);
            if let Some(cohorts) = cohorts {
                let deaths = [
                    (cohorts.children, 1.1, "children"),
                    (cohorts.adults, 1.0, "adults"),
                    (cohorts.elders, 1.4, "elders"),
                ];
                for (count, multiplier, label) in deaths {
                    let expected = count * rate * multiplier;
                    let died = stochastic_round(expected, ctx.rng);
                    if died > 0.0 {
                        apply_cohort_death(world, site_id, label, died);
                        ctx.out.push(ctx.events.emit(
                            kinds::NPC_DIED,
                            Visibility::Public,
                            Some(site_id.to_string()),
                            format!("{died} {label} died of starvation at {site_id}"),
                            Some(serde_json::json!({ "siteId": site_id.to_string(), "cause": "starvation", "count": died })),
                        ));
                    }
                }
            }
        }

        let (elders, sickness) = match world.get_site(site_id).and_then(|s| s.settlement()) {
            Some(s) => (s.cohorts.elders, s.sickness),
            None => continue,
        };
        let expected = elders * 0.0009 * (1.0 + sickness / 80.0);
        let died = stochastic_round(expected, ctx.rng);
        if died > 0.0 {
            apply_cohort_death(world, site_id, "elders", died);
            ctx.out.push(ctx.events.emit(
                kinds::NPC_DIED,
                Visibility::Public,
                Some(site_id.to_string()),
                format!("{died} elders died of illness at {site_id}"),
                Some(serde_json::json!({ "siteId": site_id.to_string(), "cause": "illness", "count": died, "tick": tick })),
            ));
        }
    }
}

fn apply_cohort_death(world: &mut World, site_id: &crate::ids::SiteId, cohort: &str, count: f64) {
    if let Some(site) = world.get_site_mut(site_id) {
        if let Some(settlement) = site.settlement_mut() {
            match cohort {
                "children" => settlement.cohorts.children = (settlement.cohorts.children - count).max(0.0),
                "adults" => settlement.cohorts.adults = (settlement.cohorts.adults - count).max(0.0),
                _ => settlement.cohorts.elders = (settlement.cohorts.elders - count).max(0.0),
            }
        }
    }
}

fn stochastic_round(expected: f64, rng: &mut crate::rng::SimRng) -> f64 {
    let floor = expected.floor();
    let frac = expected - floor;
    if rng.chance(frac) {
        floor + 1.0
    } else {
        floor
    }
}

fn births(world: &mut World, ctx: &mut ProcessContext, tick: u64) {
    let site_ids = world.site_ids_in_map_order();
    for site_id in &site_ids {
        let Some(settlement) = world.get_site(site_id).and_then(|s| s.settlement()) else {
            continue;
        };
        let stability = (1.0 - settlement.unrest / 100.0).max(0.0);
        let housing_slack_ratio = if settlement.housing_capacity > 0.0 {
            (settlement.housing_capacity - settlement.cohorts.total()).max(0.0)
                / settlement.housing_capacity
        } else {
            0.0
        };
        let expected = settlement.cohorts.adults * 0.00035 * stability * housing_slack_ratio;
        let born = stochastic_round(expected, ctx.rng);
        if born > 0.0 {
            if let Some(site) = world.get_site_mut(site_id) {
                if let Some(settlement) = site.settlement_mut() {
                    settlement.cohorts.children += born;
                }
            }
            ctx.out.push(ctx.events.emit(
                kinds::WORLD_POPULATION_BIRTH,
                Visibility::Public,
                Some(site_id.to_string()),
                format!("{born} born at {site_id}"),
                Some(serde_json::json!({ "siteId": site_id.to_string(), "count": born, "tick": tick })),
            ));
        }
    }
}

fn migration(
    world: &mut World,
    ctx: &mut ProcessContext,
    site_ids: &[crate::ids::SiteId],
    tick: u64,
) {
    for site_id in site_ids {
        let Some(settlement) = world.get_site(site_id).and_then(|s| s.settlement()) else {
            continue;
        };
        let pressure = settlement.hunger / 100.0 * 0.8 + settlement.unrest / 100.0 * 0.4;
        let rate = pressure.clamp(0.0, 1.0) * 0.02;
        if !ctx.rng.chance(rate) {
            continue;
        }
        let Some(dest) = pick_destination(world, site_ids, ctx.rng) else {
            continue;
        };
        if &dest == site_id {
            continue;
        }
        let settlement = world.get_site(site_id).and_then(|s| s.settlement()).unwrap();
        let moved_adults = (settlement.cohorts.adults * 0.75).floor();
        let moved_children = (settlement.cohorts.children * 0.25).floor();
        if moved_adults <= 0.0 && moved_children <= 0.0 {
            continue;
        }
        if let Some(site) = world.get_site_mut(site_id) {
            if let Some(settlement) = site.settlement_mut() {
                settlement.cohorts.adults -= moved_adults;
                settlement.cohorts.children -= moved_children;
            }
        }
        if let Some(site) = world.get_site_mut(&dest) {
            if let Some(settlement) = site.settlement_mut() {
                settlement.cohorts.adults += moved_adults;
                settlement.cohorts.children += moved_children;
            }
        }
        ctx.out.push(ctx.events.emit(
            kinds::WORLD_POPULATION_MIGRATION,
            Visibility::Public,
            Some(site_id.to_string()),
            format!("migration from {site_id} to {dest}"),
            Some(serde_json::json!({ "from": site_id.to_string(), "to": dest.to_string(), "adults": moved_adults, "children": moved_children, "tick": tick })),
        ));
    }
}
