//! Core simulation logic: a deterministic, tick-driven world of sites and
//! NPCs, the automatic process pipeline, the attempt/resolution pipeline,
//! and the belief/notability/narrative bookkeeping that sits on top.

pub mod actions;
pub mod attempt;
pub mod belief;
pub mod config;
pub mod error;
pub mod ids;
pub mod intents;
pub mod knowledge;
pub mod map;
pub mod movement;
pub mod narrative;
pub mod notability;
pub mod operation;
pub mod planning;
pub mod processes;
pub mod reactive_states;
pub mod relationship;
pub mod rng;
pub mod run;
pub mod setup;
pub mod summary;
pub mod tick;
pub mod world;

pub use config::Config;
pub use error::{SimError, SimResult};
pub use rng::SimRng;
pub use world::World;
