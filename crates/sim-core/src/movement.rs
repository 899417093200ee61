//! Inter-site and local travel (§4.6).

use crate::ids::{NpcId, SiteId};
use crate::processes::EventContext;
use crate::world::npc::TravelState;
use crate::world::World;
use sim_events::{kinds, Visibility};

pub fn start_travel(world: &mut World, npc_id: &NpcId, to: SiteId) -> Result<(), &'static str> {
    let Some(npc) = world.get_npc(npc_id) else {
        return Err("unknown npc");
    };
    if world.get_site(&to).map(|s| s.is_hidden_hideout()).unwrap_or(true) {
        return Err("destination hidden");
    }
    let Some(edge) = world.map.edge_between(&npc.site_id, &to) else {
        return Err("no direct edge");
    };
    let travel = TravelState {
        from: npc.site_id.clone(),
        to: to.clone(),
        total_km: edge.km,
        remaining_km: edge.km,
        edge_quality: edge.quality,
    };
    if let Some(npc) = world.get_npc_mut(npc_id) {
        npc.travel = Some(travel);
    }
    Ok(())
}

/// Advances every NPC with an active inter-site or local travel by one
/// hour (§4.1 step 5), emitting `travel.started`/`travel.arrived` as
/// appropriate. Local travel uses the Dijkstra path already computed at
/// `start_local_travel` time; inter-site travel is a single-edge lookup.
pub fn progress_travel(world: &mut World, config: &crate::config::Config, events: &mut EventContext) {
    let _ = config;
    let tick = world.tick;
    let ids: Vec<NpcId> = world.npcs.keys().cloned().collect();
    for id in ids {
        progress_one(world, &id, tick, events);
    }
}

fn progress_one(world: &mut World, id: &NpcId, tick: u64, events: &mut EventContext) {
    let Some(npc) = world.get_npc(id) else { return };
    if let Some(travel) = npc.travel.clone() {
        let season_factor = season_speed_factor(tick);
        let speed = travel.edge_quality.base_speed_km_per_hour() * season_factor;
        let remaining = (travel.remaining_km - speed).max(0.0);
        let arrived = remaining <= 0.0;
        if let Some(npc) = world.get_npc_mut(id) {
            if let Some(t) = npc.travel.as_mut() {
                t.remaining_km = remaining;
            }
            if arrived {
                npc.site_id = travel.to.clone();
                npc.travel = None;
                npc.away_from_home_since_tick = if npc.site_id != npc.home_site_id {
                    npc.away_from_home_since_tick.or(Some(tick))
                } else {
                    None
                };
            }
        }
        if arrived {
            events.emit(
                kinds::TRAVEL_ARRIVED,
                Visibility::Private,
                Some(travel.to.to_string()),
                format!("{id} arrived at {}", travel.to),
                Some(serde_json::json!({ "npcId": id.to_string(), "siteId": travel.to.to_string() })),
            );
        }
        return;
    }

    if let Some(local) = npc.local_travel.clone() {
        let speed_meters = 80.0;
        let remaining = (local.remaining_meters - speed_meters).max(0.0);
        let arrived = remaining <= 0.0 && local.next_index + 1 >= local.path.len();
        if let Some(npc) = world.get_npc_mut(id) {
            if arrived {
                npc.local_travel = None;
            } else if let Some(t) = npc.local_travel.as_mut() {
                if remaining <= 0.0 {
                    t.next_index += 1;
                    t.remaining_meters = 200.0;
                } else {
                    t.remaining_meters = remaining;
                }
            }
        }
    }
}

fn season_speed_factor(tick: u64) -> f64 {
    let day_in_year = (tick / 24) % 120;
    let season = day_in_year / 30;
    match season {
        3 => 0.7,
        1 => 1.1,
        _ => 1.0,
    }
}

pub fn start_local_travel(world: &mut World, npc_id: &NpcId, from_node: &str, to_node: &str) -> Result<(), &'static str> {
    let Some(npc) = world.get_npc(npc_id) else {
        return Err("unknown npc");
    };
    let Some(site) = world.get_site(&npc.site_id) else {
        return Err("unknown site");
    };
    let Some(graph) = site.settlement().and_then(|s| s.local.as_ref()) else {
        return Err("no local graph");
    };
    let Some((path, _dist)) = crate::world::site::local_shortest_path(graph, from_node, to_node) else {
        return Err("unreachable");
    };
    if let Some(npc) = world.get_npc_mut(npc_id) {
        npc.local_travel = Some(crate::world::npc::LocalTravelState {
            path,
            next_index: 0,
            remaining_meters: 200.0,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Edge, EdgeQuality, Map};

    #[test]
    fn season_speed_factor_is_slower_in_winter() {
        let winter_tick = 3 * 30 * 24;
        let spring_tick = 0;
        assert!(season_speed_factor(winter_tick) < season_speed_factor(spring_tick));
    }

    #[test]
    fn edge_quality_speeds_match_spec() {
        assert_eq!(EdgeQuality::Road.base_speed_km_per_hour(), 4.0);
        assert_eq!(EdgeQuality::Rough.base_speed_km_per_hour(), 2.0);
    }

    #[test]
    fn map_smoke() {
        let map = Map {
            sites: vec![SiteId::new("a"), SiteId::new("b")],
            edges: vec![Edge { from: SiteId::new("a"), to: SiteId::new("b"), km: 8.0, quality: EdgeQuality::Road }],
        };
        assert!(map.edge_between(&SiteId::new("a"), &SiteId::new("b")).is_some());
    }
}
