//! Notability decay and event-driven gain (§4.9, §6
//! tuning.notabilityDecayPerDay).

use crate::config::Config;
use crate::ids::NpcId;
use crate::world::npc::{Category, Npc};
use crate::world::World;
use sim_events::{kinds, SimEvent};

pub fn decay_daily(npc: &mut Npc, config: &Config) {
    if !npc.alive {
        return;
    }
    let is_leadership = matches!(
        npc.category,
        Category::Noble | Category::CultLeader | Category::Guard | Category::AnchorMage
    );
    let rate = if npc.notability > 50.0 {
        config.tuning.notability_decay_per_day / 2.0
    } else {
        config.tuning.notability_decay_per_day
    };
    let floor = if is_leadership { 40.0 } else { 0.0 };
    npc.notability = (npc.notability - rate).max(floor);
}

/// Gain on notable events; major events (deaths, public crimes) get a 50%
/// bonus per §6.
pub fn gain(npc: &mut Npc, base_amount: f64, is_major: bool) {
    let amount = if is_major { base_amount * 1.5 } else { base_amount };
    npc.notability = (npc.notability + amount).min(100.0);
}

/// Base gain per successfully-recorded action kind (§4.1 step 8's "gains
/// from event taxonomy"); kinds absent from this table don't move notability.
fn gain_for_attempt_kind(kind: &str) -> Option<(f64, bool)> {
    match kind {
        "kill" => Some((10.0, true)),
        "kidnap" => Some((8.0, true)),
        "raid" => Some((7.0, true)),
        "forced_eclipse" | "anchor_sever" => Some((6.0, true)),
        "assault" | "arrest" => Some((4.0, false)),
        "steal" | "blackmail" => Some((3.0, false)),
        "heal" | "preach_fixed_path" => Some((2.0, false)),
        "gossip" | "trade" | "patrol" | "investigate" | "recon" => Some((1.0, false)),
        _ => None,
    }
}

/// Drives event-driven gain off the tick's own event stream: inspects each
/// `attempt.recorded` event for a successful attempt and credits its actor.
/// Called once per emitted event; non-matching kinds are a no-op.
pub fn apply_event_gain(world: &mut World, event: &SimEvent) {
    if event.kind != kinds::ATTEMPT_RECORDED {
        return;
    }
    let Some(data) = &event.data else { return };
    if !data.get("success").and_then(|v| v.as_bool()).unwrap_or(false) {
        return;
    }
    let Some(attempt) = data.get("attempt") else { return };
    let Some(kind) = attempt.get("kind").and_then(|v| v.as_str()) else { return };
    let Some((base, is_major)) = gain_for_attempt_kind(kind) else {
        return;
    };
    let Some(actor_id) = attempt.get("actorId").and_then(|v| v.as_str()) else {
        return;
    };
    if let Some(npc) = world.get_npc_mut(&NpcId::new(actor_id)) {
        gain(npc, base, is_major);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SiteId;
    use crate::world::npc::{CultStatus, Emotions, NpcStatus};
    use std::collections::HashMap;

    fn sample_npc() -> Npc {
        Npc {
            id: crate::ids::NpcId::new("a"),
            name: "A".into(),
            category: Category::Farmer,
            site_id: SiteId::new("s"),
            home_site_id: SiteId::new("s"),
            alive: true,
            death: None,
            traits: HashMap::new(),
            needs: HashMap::new(),
            hp: 10.0,
            max_hp: 10.0,
            trauma: 0.0,
            notability: 60.0,
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
    fn decay_is_halved_above_fifty() {
        let mut npc = sample_npc();
        let config = Config::default();
        let before = npc.notability;
        decay_daily(&mut npc, &config);
        assert_eq!(before - npc.notability, config.tuning.notability_decay_per_day / 2.0);
    }

    #[test]
    fn major_event_gain_has_bonus() {
        let mut npc = sample_npc();
        npc.notability = 0.0;
        gain(&mut npc, 10.0, true);
        assert_eq!(npc.notability, 15.0);
    }
}
