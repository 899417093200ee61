//! Simulation event types.
//!
//! An event is the sole observable output of a tick besides the world itself
//! and the periodic daily summary. Event kinds are namespaced dotted strings
//! (`"attempt.recorded"`, `"world.food.consumed"`, ...) rather than a closed
//! Rust enum, because the catalog of kinds grows with every action and
//! process and a tagged union would need to be touched in lockstep. The
//! `kinds` module below documents the vocabulary actually emitted.

use serde::{Deserialize, Serialize};

/// Who is allowed to observe an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only the actor (and direct target, for some kinds) learns of this.
    Private,
    /// Anyone present at the site witnesses this; it can seed rumors.
    Public,
    /// Bookkeeping emitted by the engine itself (ticks, summaries, errors).
    System,
}

/// A single entry in the append-only event log.
///
/// `id` and `seq` are both monotonic within a run, but serve different
/// purposes: `seq` orders events within and across ticks (the ordering
/// invariant in the determinism contract is stated in terms of `(tick,
/// seq)`), while `id` is a stable external-facing identifier that survives
/// even if an implementation later buffers/reorders seq assignment within a
/// tick for unrelated reasons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimEvent {
    pub id: u64,
    pub tick: u64,
    pub seq: u64,
    pub kind: String,
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl SimEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        tick: u64,
        seq: u64,
        kind: impl Into<String>,
        visibility: Visibility,
        site_id: Option<String>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id,
            tick,
            seq,
            kind: kind.into(),
            visibility,
            site_id,
            message: message.into(),
            data,
        }
    }
}

/// Dotted event-kind vocabulary. Grouped by the subsystem that emits them so
/// the catalog can grow without a central enum.
pub mod kinds {
    pub const SIM_STARTED: &str = "sim.started";
    pub const SIM_DAY_ENDED: &str = "sim.day.ended";

    pub const WORLD_ECLIPSING_PRESSURE: &str = "world.eclipsing.pressure";
    pub const WORLD_ANCHORING_STRENGTH: &str = "world.anchoring.strength";
    pub const WORLD_FOOD_CONSUMED: &str = "world.food.consumed";
    pub const WORLD_FOOD_PRODUCED: &str = "world.food.produced";
    pub const WORLD_FOOD_SPOILED: &str = "world.food.spoiled";
    pub const WORLD_UNREST_CHANGED: &str = "world.unrest.changed";
    pub const WORLD_POPULATION_BIRTH: &str = "world.population.birth";
    pub const WORLD_POPULATION_REFUGEES: &str = "world.population.refugees";
    pub const WORLD_POPULATION_MIGRATION: &str = "world.population.migration";
    pub const WORLD_CULT_RECRUITED: &str = "world.cult.recruited";
    pub const WORLD_CULT_INFLUENCE: &str = "world.cult.influence";
    pub const WORLD_CULT_INCIDENT: &str = "world.cult.incident";

    pub const ATTEMPT_STARTED: &str = "attempt.started";
    pub const ATTEMPT_RECORDED: &str = "attempt.recorded";
    pub const ATTEMPT_COMPLETED: &str = "attempt.completed";
    pub const ATTEMPT_ABORTED: &str = "attempt.aborted";
    pub const ATTEMPT_INTERRUPTED: &str = "attempt.interrupted";

    pub const NPC_DIED: &str = "npc.died";
    pub const NPC_BELIEF_GAINED: &str = "npc.belief.gained";
    pub const NPC_DETAINED: &str = "npc.detained";
    pub const NPC_ECLIPSING: &str = "npc.eclipsing";
    pub const NPC_ECLIPSING_CLEARED: &str = "npc.eclipsing.cleared";

    pub const RUMOR_CREATED: &str = "rumor.created";
    pub const RUMOR_SPREAD: &str = "rumor.spread";

    pub const TRAVEL_STARTED: &str = "travel.started";
    pub const TRAVEL_ARRIVED: &str = "travel.arrived";
    pub const TRAVEL_ENCOUNTER: &str = "travel.encounter";

    pub const FACTION_OPERATION_CREATED: &str = "faction.operation.created";
    pub const FACTION_OPERATION_PHASE: &str = "faction.operation.phase";
    pub const FACTION_OPERATION_COMPLETED: &str = "faction.operation.completed";
    pub const FACTION_OPERATION_ABORTED: &str = "faction.operation.aborted";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_optional_fields() {
        let event = SimEvent::new(
            1,
            0,
            1,
            kinds::SIM_STARTED,
            Visibility::System,
            None,
            "simulation started",
            None,
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("siteId"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn roundtrips_through_json() {
        let event = SimEvent::new(
            2,
            24,
            5,
            kinds::ATTEMPT_RECORDED,
            Visibility::Public,
            Some("human_village_a".into()),
            "thief stole grain",
            Some(serde_json::json!({"success": true})),
        );
        let json = serde_json::to_string(&event).unwrap();
        let parsed: SimEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, 2);
        assert_eq!(parsed.site_id.as_deref(), Some("human_village_a"));
    }
}
