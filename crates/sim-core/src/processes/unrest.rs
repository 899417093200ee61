//! Unrest/morale drift (§4.3, hourly). The formula deliberately mixes a
//! rounded and an unrounded term; this is preserved exactly as specified
//! rather than normalized (§9 open question).

use super::ProcessContext;
use crate::config::Config;
use crate::world::World;
use sim_events::{kinds, Visibility};

pub fn run(world: &mut World, _config: &Config, ctx: &mut ProcessContext) {
    let site_ids = world.site_ids_in_map_order();
    for site_id in &site_ids {
        let Some(site) = world.get_site_mut(site_id) else {
            continue;
        };
        let Some(settlement) = site.settlement_mut() else {
            continue;
        };

        let relief = if settlement.hunger < 5.0 { 0.6 } else { 0.0 };
        let noise = ctx.rng.next() * 0.4 - 0.2;
        let delta = (settlement.hunger / 100.0) * 0.9 * 1.6 - relief * 0.4
            + (settlement.cult_influence / 100.0 * 0.3).round()
            + (settlement.eclipsing_pressure / 100.0 * 0.2).round()
            + (settlement.sickness / 100.0 * 0.2).round()
            + noise;

        settlement.unrest = (settlement.unrest + delta).clamp(0.0, 100.0);
        settlement.morale = (settlement.morale - delta * 0.6).clamp(0.0, 100.0);

        ctx.out.push(ctx.events.emit(
            kinds::WORLD_UNREST_CHANGED,
            Visibility::System,
            Some(site_id.to_string()),
            format!("unrest at {site_id} moved by {delta:.2}"),
            Some(serde_json::json!({ "siteId": site_id.to_string(), "delta": delta, "value": settlement.unrest })),
        ));
    }
}
