//! Optional structured knowledge (§4.5): `facts[]` on an NPC for typed
//! learnings, `secrets[]` in `World` for private-attempt outcomes the
//! actor alone learns of.

use crate::world::npc::{Fact, Knowledge, Npc};

pub fn record_fact(npc: &mut Npc, kind: impl Into<String>, object: impl Into<String>, tick: u64) {
    let knowledge = npc.knowledge.get_or_insert_with(Knowledge::default);
    knowledge.facts.push(Fact {
        kind: kind.into(),
        object: object.into(),
        tick,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{NpcId, SiteId};
    use crate::world::npc::{Category, CultStatus, Emotions, NpcStatus};
    use std::collections::HashMap;

    fn sample_npc() -> Npc {
        Npc {
            id: NpcId::new("a"),
            name: "A".into(),
            category: Category::Scholar,
            site_id: SiteId::new("s"),
            home_site_id: SiteId::new("s"),
            alive: true,
            death: None,
            traits: HashMap::new(),
            needs: HashMap::new(),
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
    fn record_fact_initializes_knowledge_lazily() {
        let mut npc = sample_npc();
        assert!(npc.knowledge.is_none());
        record_fact(&mut npc, "identified_cult_member", "x", 1);
        assert_eq!(npc.knowledge.unwrap().facts.len(), 1);
    }
}
