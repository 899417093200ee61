//! Reduces a tick's event stream into chronicle storage (§4.8): a pure
//! function from `&[SimEvent]` to `Chronicle` mutations, kept outside the
//! resolvers so narrative projection can change without touching
//! simulation semantics.

use crate::scorer::{DirectorContext, EventScorer};
use sim_core::narrative::{Act, Chronicle, ChronicleEntry, NarrativeArc, StoryBeat};
use sim_events::{kinds, SimEvent};

/// Story beats are only recorded above this score; everything else still
/// gets a chronicle entry, just not a beat.
pub const BEAT_THRESHOLD: f32 = 0.5;

fn actor_id_of(event: &SimEvent) -> Option<String> {
    event
        .data
        .as_ref()
        .and_then(|d| d.get("actorId").or_else(|| d.get("npcId")))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Applies one tick's events to `chronicle`, scoring each with `scorer` and
/// `ctx`. Operation milestone events (`faction.operation.created|phase|
/// completed|aborted`) additionally advance the named operation's
/// `NarrativeArc` through its three acts, per §4.8.
pub fn reduce(events: &[SimEvent], scorer: &EventScorer, ctx: &DirectorContext, chronicle: &mut Chronicle) {
    for event in events {
        let actor = actor_id_of(event);
        let score = scorer.score(event, actor.as_deref(), ctx);

        chronicle.push_entry(ChronicleEntry {
            tick: event.tick,
            event_kind: event.kind.clone(),
            site_id: event.site_id.clone(),
            text: event.message.clone(),
        });

        if score >= BEAT_THRESHOLD {
            chronicle.push_beat(StoryBeat {
                tick: event.tick,
                kind: event.kind.clone(),
                summary: event.message.clone(),
            });
        }

        if is_operation_milestone(&event.kind) {
            advance_operation_arc(chronicle, event);
        }
    }
}

fn is_operation_milestone(kind: &str) -> bool {
    kind == kinds::FACTION_OPERATION_CREATED
        || kind == kinds::FACTION_OPERATION_PHASE
        || kind == kinds::FACTION_OPERATION_COMPLETED
        || kind == kinds::FACTION_OPERATION_ABORTED
}

fn act_for(event_kind: &str, phase: Option<&str>) -> Act {
    if event_kind == kinds::FACTION_OPERATION_COMPLETED || event_kind == kinds::FACTION_OPERATION_ABORTED {
        return Act::Outcome;
    }
    match phase {
        Some("execution") => Act::Execution,
        Some("outcome") => Act::Outcome,
        _ => Act::Planning,
    }
}

fn advance_operation_arc(chronicle: &mut Chronicle, event: &SimEvent) {
    let Some(data) = event.data.as_ref() else { return };
    let Some(operation_id) = data.get("operationId").and_then(|v| v.as_str()) else {
        return;
    };
    let phase = data.get("phase").and_then(|v| v.as_str());
    let act = act_for(&event.kind, phase);

    let mut beats = chronicle
        .arcs
        .iter()
        .find(|a| a.operation_id == operation_id)
        .map(|a| a.beats.clone())
        .unwrap_or_default();
    beats.push(format!("tick {}: {}", event.tick, event.message));

    chronicle.upsert_arc(NarrativeArc {
        operation_id: operation_id.to_string(),
        act,
        beats,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_events::Visibility;

    #[test]
    fn death_event_becomes_both_entry_and_beat() {
        let scorer = EventScorer::default();
        let ctx = DirectorContext::default();
        let mut chronicle = Chronicle::default();
        let event = SimEvent::new(1, 10, 1, kinds::NPC_DIED, Visibility::Public, None, "npc_a died", None);
        reduce(&[event], &scorer, &ctx, &mut chronicle);
        assert_eq!(chronicle.entries.len(), 1);
        assert_eq!(chronicle.beats.len(), 1);
    }

    #[test]
    fn operation_milestones_build_one_arc_through_all_three_acts() {
        let scorer = EventScorer::default();
        let ctx = DirectorContext::default();
        let mut chronicle = Chronicle::default();
        let created = SimEvent::new(
            1, 1, 1,
            kinds::FACTION_OPERATION_CREATED,
            Visibility::System,
            None,
            "opens chain",
            Some(serde_json::json!({"operationId": "op_1", "phase": "planning"})),
        );
        let phase = SimEvent::new(
            2, 2, 2,
            kinds::FACTION_OPERATION_PHASE,
            Visibility::System,
            None,
            "enters execution",
            Some(serde_json::json!({"operationId": "op_1", "phase": "execution"})),
        );
        let completed = SimEvent::new(
            3, 3, 3,
            kinds::FACTION_OPERATION_COMPLETED,
            Visibility::System,
            None,
            "resolved",
            Some(serde_json::json!({"operationId": "op_1", "phase": "outcome"})),
        );
        reduce(&[created, phase, completed], &scorer, &ctx, &mut chronicle);
        assert_eq!(chronicle.arcs.len(), 1);
        assert_eq!(chronicle.arcs[0].act, Act::Outcome);
        assert_eq!(chronicle.arcs[0].beats.len(), 3);
    }
}
