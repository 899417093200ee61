//! Multi-step plan synthesis and advancement (§4.7).

use crate::world::npc::{Need, Npc, Plan, PlanStep};

fn synthesize(npc: &Npc) -> Option<Plan> {
    if npc.need_value(Need::Food) > 70.0 {
        return Some(Plan {
            goal_id: "get_food".to_string(),
            steps: vec![
                PlanStep { kind: "travel".to_string() },
                PlanStep { kind: "trade".to_string() },
            ],
            step_index: 0,
        });
    }
    None
}

/// Synthesizes a plan when a need crosses a threshold and the NPC has none.
pub fn maybe_synthesize(npc: &mut Npc) {
    if npc.plan.is_none() {
        npc.plan = synthesize(npc);
    }
}

/// Advances the current step when an executed attempt matches it; clears
/// the plan on completion.
pub fn advance_on_attempt(npc: &mut Npc, executed_kind: &str) {
    let mut clear = false;
    if let Some(plan) = npc.plan.as_mut() {
        if plan.current_step().map(|s| s.kind.as_str()) == Some(executed_kind) {
            plan.step_index += 1;
        }
        if plan.is_complete() {
            clear = true;
        }
    }
    if clear {
        npc.plan = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{NpcId, SiteId};
    use crate::world::npc::{CultStatus, Emotions, NpcStatus};
    use std::collections::HashMap;

    fn sample_npc() -> Npc {
        Npc {
            id: NpcId::new("a"),
            name: "A".into(),
            category: crate::world::npc::Category::Farmer,
            site_id: SiteId::new("s"),
            home_site_id: SiteId::new("s"),
            alive: true,
            death: None,
            traits: HashMap::new(),
            needs: HashMap::from([(Need::Food, 80.0)]),
            hp: 10.0,
            max_hp: 10.0,
            trauma: 0.0,
            notability: 0.0,
            cult: CultStatus::default(),
            beliefs: vec![],
            relationships: HashMap::new(),
            goals: vec![],
            plan: None,
            intents: vec![],
            knowledge: None,
            inventory: None,
            debts: vec![],
            recent_actions: vec![],
            consecutive_hunger_hours: 0,
            busy_until_tick: 0,
            busy_kind: None,
            last_attempt_tick: None,
            forced_active_until_tick: None,
            travel: None,
            local_travel: None,
            status: NpcStatus::default(),
            away_from_home_since_tick: None,
            family_ids: vec![],
            episodic_memory: vec![],
            emotions: Emotions::default(),
            active_states: vec![],
        }
    }

    #[test]
    fn high_food_need_synthesizes_get_food_plan() {
        let mut npc = sample_npc();
        maybe_synthesize(&mut npc);
        assert_eq!(npc.plan.as_ref().unwrap().goal_id, "get_food");
    }

    #[test]
    fn matching_attempt_advances_step() {
        let mut npc = sample_npc();
        maybe_synthesize(&mut npc);
        advance_on_attempt(&mut npc, "travel");
        assert_eq!(npc.plan.as_ref().unwrap().step_index, 1);
        advance_on_attempt(&mut npc, "trade");
        assert!(npc.plan.is_none());
    }
}
