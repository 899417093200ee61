//! The attempt pipeline: preconditions -> scoring -> selection ->
//! resolution (§4.4).

pub mod generate;
pub mod preconditions;
pub mod resolve;
pub mod scoring;
pub mod selection;

pub use generate::{generate_reflex_attempt, generate_scored_attempt};
pub use resolve::resolve_attempt;
