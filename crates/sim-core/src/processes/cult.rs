//! Cult recruitment, influence smoothing, and incident generation (§4.3,
//! daily at hour 0, human settlements only).

use super::ProcessContext;
use crate::config::Config;
use crate::ids::NpcId;
use crate::world::npc::{CultRole, Trait};
use crate::world::site::{Culture, FoodType};
use crate::world::World;
use sim_events::{kinds, Visibility};

pub fn run(world: &mut World, config: &Config, ctx: &mut ProcessContext) {
    recruit(world, ctx);
    recompute_influence(world);
    generate_incidents(world, config, ctx);
}

fn recruit(world: &mut World, ctx: &mut ProcessContext) {
    let site_ids = world.site_ids_in_map_order();
    for site_id in &site_ids {
        if world.get_site(site_id).map(|s| s.culture) != Some(Culture::Human) {
            continue;
        }
        let pressure = world.get_site(site_id).map(|s| s.eclipsing_pressure()).unwrap_or(0.0);
        let anchoring = world.get_site(site_id).map(|s| s.anchoring_strength()).unwrap_or(0.0);
        let unrest = world
            .get_site(site_id)
            .and_then(|s| s.settlement())
            .map(|s| s.unrest)
            .unwrap_or(0.0);
        let anchor_block = 1.0 - anchoring / 150.0;

        let recruiters: Vec<NpcId> = world
            .npcs_at_site(site_id)
            .into_iter()
            .filter(|n| {
                n.cult.member
                    && matches!(n.cult.role, Some(CultRole::Devotee) | Some(CultRole::CellLeader))
            })
            .map(|n| n.id.clone())
            .collect();
        let targets: Vec<NpcId> = world
            .npcs_at_site(site_id)
            .into_iter()
            .filter(|n| !n.cult.member)
            .map(|n| n.id.clone())
            .collect();

        let mut attempts = 0;
        for recruiter in &recruiters {
            for target_id in &targets {
                if attempts >= 3 {
                    break;
                }
                let Some(target) = world.get_npc(target_id) else { continue };
                let certainty = target.trait_value(Trait::NeedForCertainty) / 100.0;
                let fear = target.trait_value(Trait::Fear) / 100.0;
                let trauma = target.trauma / 100.0;
                let integrity = target.trait_value(Trait::Integrity) / 100.0;
                let recruit_factor = 1.0;
                let chance = (recruit_factor
                    * anchor_block
                    * (0.35 * certainty + 0.15 * fear + 0.35 * trauma + 0.2 * pressure / 100.0
                        + 0.1 * unrest / 100.0
                        - 0.25 * integrity))
                    .clamp(0.0, 0.85);
                attempts += 1;
                if ctx.rng.chance(chance) {
                    let current_tick = world.tick;
                    if let Some(target) = world.get_npc_mut(target_id) {
                        target.cult.member = true;
                        target.cult.role = Some(CultRole::Devotee);
                        target.cult.joined_tick = Some(current_tick);
                    }
                    ctx.out.push(ctx.events.emit(
                        kinds::WORLD_CULT_RECRUITED,
                        Visibility::Private,
                        Some(site_id.to_string()),
                        format!("{target_id} recruited into the cult at {site_id}"),
                        Some(serde_json::json!({ "siteId": site_id.to_string(), "recruiterId": recruiter.to_string(), "targetId": target_id.to_string() })),
                    ));
                }
            }
            if attempts >= 3 {
                break;
            }
        }
    }
}

fn recompute_influence(world: &mut World) {
    let site_ids = world.site_ids_in_map_order();
    for site_id in &site_ids {
        if world.get_site(site_id).map(|s| s.culture) != Some(Culture::Human) {
            continue;
        }
        let npcs = world.npcs_at_site(site_id);
        if npcs.is_empty() {
            continue;
        }
        let members = npcs.iter().filter(|n| n.cult.member).count() as f64;
        let ratio = members / npcs.len() as f64 * 100.0;
        if let Some(site) = world.get_site_mut(site_id) {
            if let Some(settlement) = site.settlement_mut() {
                settlement.cult_influence = (0.7 * settlement.cult_influence + 0.3 * ratio)
                    .clamp(0.0, 100.0);
            }
        }
    }
}

fn generate_incidents(world: &mut World, config: &Config, ctx: &mut ProcessContext) {
    let site_ids = world.site_ids_in_map_order();
    for site_id in &site_ids {
        let Some(settlement) = world.get_site(site_id).and_then(|s| s.settlement()) else {
            continue;
        };
        let pressure = world.get_site(site_id).map(|s| s.eclipsing_pressure()).unwrap_or(0.0);
        let anchoring = world.get_site(site_id).map(|s| s.anchoring_strength()).unwrap_or(0.0);
        let anchor_block = 1.0 - anchoring / 150.0;
        let chance = 0.04 * settlement.cult_influence / 100.0 * pressure / 100.0 * anchor_block;
        if !ctx.rng.chance(chance) {
            continue;
        }
        let roll = ctx.rng.next();
        let incident = if roll < 0.30 {
            "theft_food"
        } else if roll < 0.55 {
            "intimidation"
        } else if roll < 0.80 {
            "arson_fields"
        } else {
            "murder"
        };
        apply_incident(world, config, ctx, site_id, incident);
    }
}

fn apply_incident(
    world: &mut World,
    config: &Config,
    ctx: &mut ProcessContext,
    site_id: &crate::ids::SiteId,
    incident: &str,
) {
    match incident {
        "theft_food" => {
            if let Some(site) = world.get_site_mut(site_id) {
                if let Some(settlement) = site.settlement_mut() {
                    for food_type in FoodType::ALL {
                        if let Some(lots) = settlement.food.get_mut(&food_type) {
                            if let Some(newest) = lots.iter_mut().max_by_key(|l| l.produced_day) {
                                newest.amount = (newest.amount - 5.0).max(0.0);
                                break;
                            }
                        }
                    }
                }
            }
        }
        "arson_fields" => {
            if let Some(site) = world.get_site_mut(site_id) {
                if let Some(settlement) = site.settlement_mut() {
                    let damage = 0.08 + ctx.rng.next() * 0.06;
                    settlement.fields_condition = (settlement.fields_condition - damage).clamp(0.0, 1.0);
                }
            }
        }
        "murder" => {
            if let Some(site) = world.get_site_mut(site_id) {
                if let Some(settlement) = site.settlement_mut() {
                    settlement.cohorts.adults = (settlement.cohorts.adults - 1.0).max(0.0);
                }
            }
            let alive: Vec<NpcId> = world.npcs_at_site(site_id).into_iter().map(|n| n.id.clone()).collect();
            if !alive.is_empty() {
                let idx = ctx.rng.int(0, alive.len() as i64 - 1) as usize;
                let victim_id = alive[idx].clone();
                let tick = world.tick;
                if let Some(victim) = world.get_npc_mut(&victim_id) {
                    victim.alive = false;
                    victim.death = Some(crate::world::npc::Death {
                        tick,
                        cause: crate::world::npc::DeathCause::Murder,
                        by_npc_id: None,
                        at_site_id: site_id.clone(),
                    });
                }
                ctx.out.push(ctx.events.emit(
                    kinds::NPC_DIED,
                    Visibility::Public,
                    Some(site_id.to_string()),
                    format!("{victim_id} was murdered in a cult incident at {site_id}"),
                    Some(serde_json::json!({ "npcId": victim_id.to_string(), "cause": "murder", "siteId": site_id.to_string() })),
                ));
                crate::belief::witness_npc_death(world, config, &victim_id, site_id, tick);
            }
            for npc in world.npcs.values_mut() {
                if &npc.site_id == site_id {
                    npc.trauma = (npc.trauma + 12.0).min(100.0);
                }
            }
        }
        "intimidation" => {
            let candidates: Vec<NpcId> = world.npcs_at_site(site_id).into_iter().map(|n| n.id.clone()).collect();
            if !candidates.is_empty() {
                let idx = ctx.rng.int(0, candidates.len() as i64 - 1) as usize;
                let tick = world.tick;
                if let Some(victim) = world.get_npc_mut(&candidates[idx]) {
                    victim.trauma = (victim.trauma + 18.0).min(100.0);
                    victim.forced_active_until_tick = Some(tick + 48);
                }
            }
        }
        _ => {}
    }

    ctx.out.push(ctx.events.emit(
        kinds::WORLD_CULT_INCIDENT,
        Visibility::Public,
        Some(site_id.to_string()),
        format!("cult incident ({incident}) at {site_id}"),
        Some(serde_json::json!({ "siteId": site_id.to_string(), "incident": incident })),
    ));
}
