//! The fixed automatic-process pipeline (§4.3), run in this exact order
//! every tick: eclipsing pressure -> anchoring -> food -> population
//! (daily-gated) -> unrest -> cult (daily-gated).

pub mod anchoring;
pub mod cult;
pub mod eclipsing;
pub mod food;
pub mod population;
pub mod unrest;

use crate::config::Config;
use crate::rng::SimRng;
use crate::world::World;
use sim_events::{SimEvent, Visibility};

/// Per-tick event numbering: `id` resets to 1 at the start of every tick
/// (§4.1 step 1); `seq` is monotonic for the whole run (§3).
pub struct EventContext {
    pub tick: u64,
    next_id: u64,
    next_seq: u64,
}

impl EventContext {
    pub fn new(tick: u64, next_seq: u64) -> Self {
        Self {
            tick,
            next_id: 1,
            next_seq,
        }
    }

    pub fn into_next_seq(self) -> u64 {
        self.next_seq
    }

    pub fn emit(
        &mut self,
        kind: impl Into<String>,
        visibility: Visibility,
        site_id: Option<String>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> SimEvent {
        let event = SimEvent::new(
            self.next_id,
            self.tick,
            self.next_seq,
            kind,
            visibility,
            site_id,
            message,
            data,
        );
        self.next_id += 1;
        self.next_seq += 1;
        event
    }
}

pub struct ProcessContext<'a> {
    pub rng: &'a mut SimRng,
    pub events: &'a mut EventContext,
    /// Process-emitted events a process wants surfaced in the tick's output
    /// stream; `events.emit` itself only allocates id/seq and hands back the
    /// value, it does not collect it.
    pub out: &'a mut Vec<SimEvent>,
}

/// Derives the season (4 equal seasons per 120-day year) and its production
/// multiplier for a given food type (§4.3).
pub fn season_multiplier(food: crate::world::site::FoodType, tick: u64) -> f64 {
    use crate::world::site::FoodType;
    let day_in_year = (tick / 24) % 120;
    let season = day_in_year / 30; // 0=spring,1=summer,2=autumn,3=winter
    match (season, food) {
        (1, FoodType::Grain) => 1.1,
        (1, FoodType::Fish) => 1.15,
        (1, FoodType::Meat) => 1.05,
        (3, FoodType::Grain) => 0.6,
        (3, FoodType::Fish) => 0.55,
        (3, FoodType::Meat) => 0.7,
        _ => 1.0,
    }
}

pub fn run_pipeline(world: &mut World, config: &Config, ctx: &mut ProcessContext) {
    eclipsing::run(world, config, ctx);
    anchoring::run(world, config, ctx);
    food::run(world, config, ctx);
    if world.hour_of_day() == 0 {
        population::run(world, config, ctx);
    }
    unrest::run(world, config, ctx);
    if world.hour_of_day() == 0 {
        cult::run(world, config, ctx);
    }
}
