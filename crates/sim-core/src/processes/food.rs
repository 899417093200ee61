//! Food consumption, production, and spoilage (§4.3, hourly with two
//! daily-gated sub-steps).

use super::{season_multiplier, ProcessContext};
use crate::config::Config;
use crate::error::{invariant, SimResult};
use crate::world::site::FoodType;
use crate::world::World;
use sim_events::{kinds, Visibility};

pub fn run(world: &mut World, config: &Config, ctx: &mut ProcessContext) {
    if let Err(err) = try_run(world, config, ctx) {
        tracing::error!(error = %err, "food process invariant violation");
        panic!("food process invariant violation: {err}");
    }
}

fn try_run(world: &mut World, _config: &Config, ctx: &mut ProcessContext) -> SimResult<()> {
    let site_ids = world.site_ids_in_map_order();
    let tick = world.tick;
    let hour = world.hour_of_day();
    let day = world.day() as i64;

    for site_id in &site_ids {
        let Some(site) = world.get_site_mut(site_id) else {
            continue;
        };
        let Some(settlement) = site.settlement_mut() else {
            continue;
        };

        // Consumption: 1/24 adult-equivalent per hour, shortest-expiry lot first.
        let needed = settlement.cohorts.adult_equivalents() / 24.0;
        let mut consumed = 0.0;
        for food_type in FoodType::ALL {
            let expiry = food_type.expiry_days();
            let lots = settlement.food.entry(food_type).or_default();
            lots.sort_by_key(|lot| lot.produced_day + expiry);
            let mut remaining_need = needed - consumed;
            if remaining_need <= 0.0 {
                break;
            }
            for lot in lots.iter_mut() {
                if remaining_need <= 0.0 {
                    break;
                }
                let take = lot.amount.min(remaining_need);
                lot.amount -= take;
                remaining_need -= take;
                consumed += take;
            }
            lots.retain(|lot| lot.amount > 1e-9);
        }

        let unmet = needed - consumed;
        if unmet > 0.0 {
            settlement.hunger = (settlement.hunger + (unmet * 18.0).clamp(0.0, 12.0)).min(100.0);
        } else {
            settlement.hunger = (settlement.hunger - 0.5).max(0.0);
        }

        for lots in settlement.food.values() {
            for lot in lots {
                invariant(lot.amount >= -1e-9, "negative food lot amount")?;
            }
        }

        ctx.out.push(ctx.events.emit(
            kinds::WORLD_FOOD_CONSUMED,
            Visibility::System,
            Some(site_id.to_string()),
            format!("{site_id} consumed {consumed:.2} food"),
            Some(serde_json::json!({ "siteId": site_id.to_string(), "consumed": consumed, "unmet": unmet })),
        ));

        // Daily production at hour 6.
        if hour == 6 {
            for food_type in FoodType::ALL {
                let base = *settlement.production_per_day.get(&food_type).unwrap_or(&0.0);
                let condition_factor = if food_type == FoodType::Grain {
                    settlement.fields_condition
                } else {
                    1.0
                };
                let mut raw = base * condition_factor * season_multiplier(food_type, tick);
                let labor = *settlement.labor_worked_today.get(&food_type).unwrap_or(&0.0);
                if labor == 0.0 {
                    raw = (raw * 0.7).floor();
                }
                if raw > 0.0 {
                    settlement.food.entry(food_type).or_default().push(crate::world::site::FoodLot {
                        amount: raw,
                        produced_day: day,
                    });
                    ctx.out.push(ctx.events.emit(
                        kinds::WORLD_FOOD_PRODUCED,
                        Visibility::System,
                        Some(site_id.to_string()),
                        format!("{site_id} produced {raw:.0} {}", food_type.as_str()),
                        Some(serde_json::json!({ "siteId": site_id.to_string(), "foodType": food_type.as_str(), "amount": raw })),
                    ));
                }
            }
            settlement.labor_worked_today.clear();
        }

        // Daily spoilage at hour 0.
        if hour == 0 {
            for food_type in FoodType::ALL {
                let expiry = food_type.expiry_days();
                if let Some(lots) = settlement.food.get_mut(&food_type) {
                    let before = lots.len();
                    lots.retain(|lot| day - lot.produced_day <= expiry);
                    if lots.len() != before {
                        ctx.out.push(ctx.events.emit(
                            kinds::WORLD_FOOD_SPOILED,
                            Visibility::System,
                            Some(site_id.to_string()),
                            format!("{site_id} spoiled {} lots of {}", before - lots.len(), food_type.as_str()),
                            Some(serde_json::json!({ "siteId": site_id.to_string(), "foodType": food_type.as_str() })),
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}
