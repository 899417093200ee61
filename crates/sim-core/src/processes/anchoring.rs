//! Anchoring strength diffusion (§4.3, hourly). Same shape as eclipsing
//! pressure with a different source term and blend weights.

use super::ProcessContext;
use crate::config::Config;
use crate::map::diffusion_weight;
use crate::world::World;
use sim_events::{kinds, Visibility};

pub fn run(world: &mut World, _config: &Config, ctx: &mut ProcessContext) {
    let site_ids = world.site_ids_in_map_order();
    let mut next_values = Vec::with_capacity(site_ids.len());

    for site_id in &site_ids {
        let neighbors = world.map.neighbors(site_id);
        let (weighted_sum, weight_total) = neighbors.iter().fold((0.0, 0.0), |(s, w), (n, km)| {
            let weight = diffusion_weight(*km);
            let value = world.get_site(n).map(|s| s.anchoring_strength()).unwrap_or(0.0);
            (s + weight * value, w + weight)
        });
        let neighbor_avg = if weight_total > 0.0 {
            weighted_sum / weight_total
        } else {
            0.0
        };
        let source = world.get_site(site_id).map(|s| s.anchoring_source()).unwrap_or(0.0);
        let next = (neighbor_avg * 0.60 + source) * 0.99;
        next_values.push((site_id.clone(), next.clamp(0.0, 100.0)));
    }

    for (site_id, next) in next_values {
        let previous = world.get_site(&site_id).map(|s| s.anchoring_strength()).unwrap_or(0.0);
        if let Some(site) = world.get_site_mut(&site_id) {
            site.set_anchoring_strength(next);
        }
        let delta = next - previous;
        if delta.abs() > 0.01 {
            ctx.out.push(ctx.events.emit(
                kinds::WORLD_ANCHORING_STRENGTH,
                Visibility::System,
                Some(site_id.to_string()),
                format!("anchoring strength at {site_id} moved by {delta:.2}"),
                Some(serde_json::json!({ "siteId": site_id.to_string(), "value": next, "delta": delta })),
            ));
        }
    }
}
