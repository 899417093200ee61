//! Builds the daily digest snapshot (§6) from the live world state.

use crate::world::site::{Cohorts, FoodType, SiteKind};
use crate::world::World;
use sim_events::{CohortsSummary, DailySummary, FoodTotals, SiteSummary};

pub fn build_daily_summary(world: &World) -> DailySummary {
    let mut sites = Vec::new();
    for site_id in world.site_ids_in_map_order() {
        let Some(site) = world.get_site(&site_id) else { continue };
        let culture = format!("{:?}", site.culture).to_lowercase();
        let summary = match &site.kind {
            SiteKind::Settlement(s) => {
                let alive = world.npcs_at_site(&site_id).len() as u32;
                let dead = world
                    .npcs
                    .values()
                    .filter(|n| !n.alive && n.death.as_ref().map(|d| d.at_site_id == site_id).unwrap_or(false))
                    .count() as u32;
                let cult_members = world
                    .npcs_at_site(&site_id)
                    .into_iter()
                    .filter(|n| n.cult.member)
                    .count() as u32;
                let avg_trauma = {
                    let present = world.npcs_at_site(&site_id);
                    if present.is_empty() {
                        0.0
                    } else {
                        present.iter().map(|n| n.trauma).sum::<f64>() / present.len() as f64
                    }
                };
                SiteSummary {
                    site_id: site_id.to_string(),
                    name: site.name.clone(),
                    culture,
                    cohorts: Some(cohorts_summary(&s.cohorts)),
                    housing_capacity: Some(s.housing_capacity as u32),
                    food_totals: Some(food_totals(&s.food)),
                    unrest: Some(s.unrest),
                    morale: Some(s.morale),
                    sickness: Some(s.sickness),
                    hunger: Some(s.hunger),
                    cult_influence: Some(s.cult_influence),
                    eclipsing_pressure: s.eclipsing_pressure,
                    anchoring_strength: s.anchoring_strength,
                    alive_npcs: Some(alive),
                    dead_npcs: Some(dead),
                    cult_members: Some(cult_members),
                    avg_trauma: Some(avg_trauma),
                    deaths_today: Some(s.deaths_today.len() as u32),
                }
            }
            SiteKind::Terrain(n) | SiteKind::Special(n) | SiteKind::Hideout(n) => SiteSummary {
                site_id: site_id.to_string(),
                name: site.name.clone(),
                culture,
                eclipsing_pressure: n.eclipsing_pressure,
                anchoring_strength: n.anchoring_strength,
                ..Default::default()
            },
        };
        sites.push(summary);
    }

    DailySummary {
        day: world.day(),
        tick: world.tick,
        key_changes: vec![],
        sites,
    }
}

fn cohorts_summary(c: &Cohorts) -> CohortsSummary {
    CohortsSummary {
        children: c.children as u32,
        adults: c.adults as u32,
        elders: c.elders as u32,
    }
}

fn food_totals(food: &std::collections::HashMap<FoodType, Vec<crate::world::site::FoodLot>>) -> FoodTotals {
    let sum = |t: FoodType| food.get(&t).map(|lots| lots.iter().map(|l| l.amount).sum()).unwrap_or(0.0);
    FoodTotals {
        grain: sum(FoodType::Grain),
        fish: sum(FoodType::Fish),
        meat: sum(FoodType::Meat),
    }
}
