//! Relationship baseline/decay and the favor-debt ledger (§4.4 heal effect,
//! §6 tuning.relationshipDecayPerDay/debtDecayPerDay).

use crate::config::Config;
use crate::ids::NpcId;
use crate::world::npc::{Debt, DebtKind, Npc, Relationship};

pub fn relationship_mut<'a>(npc: &'a mut Npc, other: &NpcId) -> &'a mut Relationship {
    npc.relationships.entry(other.clone()).or_default()
}

pub fn apply_delta(npc: &mut Npc, other: &NpcId, trust: f64, fear: f64, loyalty: f64) {
    let rel = relationship_mut(npc, other);
    rel.trust = (rel.trust + trust).clamp(-100.0, 100.0);
    rel.fear = (rel.fear + fear).clamp(0.0, 100.0);
    rel.loyalty = (rel.loyalty + loyalty).clamp(0.0, 100.0);
}

pub fn grant_favor(npc: &mut Npc, benefactor: NpcId, tick: u64, magnitude: f64) {
    npc.debts.push(Debt {
        kind: DebtKind::FavorGranted,
        with_npc_id: benefactor,
        tick,
        magnitude,
    });
}

/// Daily decay of relationship intensity and debts toward neutral, run at
/// the day boundary alongside population/cult processes.
pub fn decay_daily(npc: &mut Npc, config: &Config) {
    let rate = config.tuning.relationship_decay_per_day;
    for rel in npc.relationships.values_mut() {
        rel.trust -= rel.trust.signum() * rate;
        rel.fear -= rel.fear.signum() * rate;
    }
    let debt_rate = config.tuning.debt_decay_per_day;
    for debt in npc.debts.iter_mut() {
        debt.magnitude = (debt.magnitude - debt_rate).max(0.0);
    }
    npc.debts.retain(|d| d.magnitude > 0.0);
    while npc.relationships.len() > config.limits.max_relationships_per_entity {
        if let Some(weakest) = npc
            .relationships
            .iter()
            .min_by(|a, b| {
                (a.1.trust.abs() + a.1.fear + a.1.loyalty)
                    .partial_cmp(&(b.1.trust.abs() + b.1.fear + b.1.loyalty))
                    .unwrap()
            })
            .map(|(id, _)| id.clone())
        {
            npc.relationships.remove(&weakest);
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_npc() -> Npc {
        use crate::ids::SiteId;
        Npc {
            id: NpcId::new("a"),
            name: "A".into(),
            category: crate::world::npc::Category::Farmer,
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
            cult: Default::default(),
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
            status: Default::default(),
            away_from_home_since_tick: None,
            family_ids: vec![],
            episodic_memory: vec![],
            emotions: Default::default(),
            active_states: vec![],
        }
    }

    #[test]
    fn apply_delta_clamps_to_ranges() {
        let mut npc = sample_npc();
        apply_delta(&mut npc, &NpcId::new("b"), 200.0, 200.0, 200.0);
        let rel = npc.relationships.get(&NpcId::new("b")).unwrap();
        assert_eq!(rel.trust, 100.0);
        assert_eq!(rel.fear, 100.0);
        assert_eq!(rel.loyalty, 100.0);
    }

    #[test]
    fn decay_pulls_toward_zero() {
        let mut npc = sample_npc();
        apply_delta(&mut npc, &NpcId::new("b"), 10.0, 10.0, 10.0);
        let config = Config::default();
        decay_daily(&mut npc, &config);
        let rel = npc.relationships.get(&NpcId::new("b")).unwrap();
        assert!(rel.trust < 10.0);
    }
}
