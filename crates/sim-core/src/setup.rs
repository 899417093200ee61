//! Hand-authored starting world (§3, §8): the fixed map, the six named
//! sites referenced throughout the scenario walkthroughs, and a small
//! initial NPC roster per settlement.

use crate::ids::{NpcId, SiteId};
use crate::map::{Edge, EdgeQuality, Map};
use crate::world::npc::{Category, CultStatus, Emotions, Npc, NpcStatus, Trait};
use crate::world::site::{Cohorts, Culture, NonSettlement, Settlement, Site, SiteKind};
use crate::world::World;
use std::collections::{BTreeMap, HashMap};

const HUMAN_VILLAGE_A: &str = "human_village_a";
const HUMAN_CITY_PORT: &str = "human_city_port";
const ELVEN_CITY: &str = "elven_city";
const ELVEN_TOWN_FORTIFIED: &str = "elven_town_fortified";
const ANCIENT_RUIN: &str = "ancient_ruin";
const CULT_HIDEOUT_1: &str = "cult_hideout_1";

fn settlement_site(id: &str, name: &str, culture: Culture, cohorts: Cohorts, housing_capacity: f64) -> Site {
    Site {
        id: SiteId::new(id),
        name: name.to_string(),
        culture,
        kind: SiteKind::Settlement(Settlement {
            cohorts,
            housing_capacity,
            food: HashMap::new(),
            production_per_day: HashMap::new(),
            fields_condition: 0.8,
            hunger: 0.0,
            unrest: 10.0,
            morale: 60.0,
            sickness: 5.0,
            cult_influence: 0.0,
            eclipsing_pressure: 5.0,
            anchoring_strength: 20.0,
            labor_worked_today: HashMap::new(),
            rumors: Default::default(),
            deaths_today: vec![],
            local: None,
        }),
    }
}

fn non_settlement_site(id: &str, name: &str, kind_ctor: fn(NonSettlement) -> SiteKind, hidden: bool) -> Site {
    Site {
        id: SiteId::new(id),
        name: name.to_string(),
        culture: Culture::Human,
        kind: kind_ctor(NonSettlement {
            eclipsing_pressure: 0.0,
            anchoring_strength: 0.0,
            hidden,
        }),
    }
}

fn npc(id: &str, name: &str, category: Category, site: &str, traits: &[(Trait, f64)]) -> Npc {
    Npc {
        id: NpcId::new(id),
        name: name.to_string(),
        category,
        site_id: SiteId::new(site),
        home_site_id: SiteId::new(site),
        alive: true,
        death: None,
        traits: traits.iter().copied().collect(),
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

/// Builds the fixed starting world for `seed`. The map topology, site
/// roster, and initial NPCs are deterministic and independent of `seed`;
/// only the process/attempt rolls made during simulation consult the seed.
pub fn build_initial_world(seed: u64) -> World {
    let mut sites: BTreeMap<SiteId, Site> = BTreeMap::new();

    sites.insert(
        SiteId::new(HUMAN_VILLAGE_A),
        settlement_site(
            HUMAN_VILLAGE_A,
            "HumanVillageA",
            Culture::Human,
            Cohorts { children: 20.0, adults: 60.0, elders: 10.0 },
            110.0,
        ),
    );
    sites.insert(
        SiteId::new(HUMAN_CITY_PORT),
        settlement_site(
            HUMAN_CITY_PORT,
            "HumanCityPort",
            Culture::Human,
            Cohorts { children: 80.0, adults: 260.0, elders: 40.0 },
            420.0,
        ),
    );
    sites.insert(
        SiteId::new(ELVEN_CITY),
        settlement_site(
            ELVEN_CITY,
            "ElvenCity",
            Culture::Elven,
            Cohorts { children: 40.0, adults: 150.0, elders: 50.0 },
            260.0,
        ),
    );
    sites.insert(
        SiteId::new(ELVEN_TOWN_FORTIFIED),
        settlement_site(
            ELVEN_TOWN_FORTIFIED,
            "ElvenTownFortified",
            Culture::Elven,
            Cohorts { children: 15.0, adults: 70.0, elders: 25.0 },
            130.0,
        ),
    );
    sites.insert(
        SiteId::new(ANCIENT_RUIN),
        non_settlement_site(ANCIENT_RUIN, "AncientRuin", SiteKind::Special, false),
    );
    sites.insert(
        SiteId::new(CULT_HIDEOUT_1),
        non_settlement_site(CULT_HIDEOUT_1, "CultHideout1", SiteKind::Hideout, true),
    );

    let map = Map {
        sites: vec![
            SiteId::new(HUMAN_VILLAGE_A),
            SiteId::new(HUMAN_CITY_PORT),
            SiteId::new(ELVEN_CITY),
            SiteId::new(ELVEN_TOWN_FORTIFIED),
            SiteId::new(ANCIENT_RUIN),
            SiteId::new(CULT_HIDEOUT_1),
        ],
        edges: vec![
            Edge { from: SiteId::new(HUMAN_VILLAGE_A), to: SiteId::new(HUMAN_CITY_PORT), km: 18.0, quality: EdgeQuality::Road },
            Edge { from: SiteId::new(HUMAN_VILLAGE_A), to: SiteId::new(ANCIENT_RUIN), km: 9.0, quality: EdgeQuality::Rough },
            Edge { from: SiteId::new(HUMAN_CITY_PORT), to: SiteId::new(ELVEN_CITY), km: 40.0, quality: EdgeQuality::Road },
            Edge { from: SiteId::new(ELVEN_CITY), to: SiteId::new(ELVEN_TOWN_FORTIFIED), km: 22.0, quality: EdgeQuality::Road },
            Edge { from: SiteId::new(ELVEN_TOWN_FORTIFIED), to: SiteId::new(ANCIENT_RUIN), km: 14.0, quality: EdgeQuality::Rough },
            Edge { from: SiteId::new(ANCIENT_RUIN), to: SiteId::new(CULT_HIDEOUT_1), km: 6.0, quality: EdgeQuality::Rough },
        ],
    };

    let mut npcs: BTreeMap<NpcId, crate::world::npc::Npc> = BTreeMap::new();
    let roster = [
        npc("farmer_a1", "Edda", Category::Farmer, HUMAN_VILLAGE_A, &[(Trait::Discipline, 60.0), (Trait::Empathy, 55.0)]),
        npc("guard_a1", "Tomas", Category::Guard, HUMAN_VILLAGE_A, &[(Trait::Courage, 70.0), (Trait::Discipline, 65.0)]),
        npc("bandit_a1", "Korr", Category::Bandit, HUMAN_VILLAGE_A, &[(Trait::Aggression, 75.0), (Trait::Greed, 80.0)]),
        npc("trader_p1", "Mira", Category::Trader, HUMAN_CITY_PORT, &[(Trait::Ambition, 60.0), (Trait::Greed, 50.0)]),
        npc("healer_p1", "Sera", Category::Healer, HUMAN_CITY_PORT, &[(Trait::Empathy, 80.0)]),
        npc("guard_p1", "Aldric", Category::Guard, HUMAN_CITY_PORT, &[(Trait::Courage, 65.0), (Trait::Discipline, 70.0)]),
        npc("devotee_p1", "Joss", Category::CultDevotee, HUMAN_CITY_PORT, &[(Trait::Suspicion, 40.0), (Trait::NeedForCertainty, 70.0)]),
        npc("cellleader_h1", "Vask", Category::CultLeader, CULT_HIDEOUT_1, &[(Trait::Ambition, 85.0), (Trait::Aggression, 60.0)]),
        npc("anchormage_e1", "Ithrael", Category::AnchorMage, ELVEN_CITY, &[(Trait::Discipline, 80.0), (Trait::Integrity, 75.0)]),
        npc("noble_e1", "Calithra", Category::Noble, ELVEN_CITY, &[(Trait::Ambition, 55.0)]),
        npc("scholar_e1", "Faelan", Category::Scholar, ELVEN_CITY, &[(Trait::Curiosity, 80.0)]),
        npc("farmer_f1", "Brannoc", Category::Farmer, ELVEN_TOWN_FORTIFIED, &[(Trait::Discipline, 55.0)]),
        npc("guard_f1", "Seren", Category::Guard, ELVEN_TOWN_FORTIFIED, &[(Trait::Courage, 60.0)]),
    ];
    for n in roster {
        npcs.insert(n.id.clone(), n);
    }

    World {
        seed,
        tick: 0,
        map,
        sites,
        npcs,
        secrets: vec![],
        next_secret_id: 1,
        operations: BTreeMap::new(),
        next_operation_id: 1,
        chronicle: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_all_six_named_sites() {
        let world = build_initial_world(1);
        assert!(world.get_site(&SiteId::new(HUMAN_VILLAGE_A)).is_some());
        assert!(world.get_site(&SiteId::new(ANCIENT_RUIN)).is_some());
        assert!(world.get_site(&SiteId::new(CULT_HIDEOUT_1)).unwrap().is_hidden_hideout());
    }

    #[test]
    fn roster_is_nonempty_and_deterministic() {
        let a = build_initial_world(7);
        let b = build_initial_world(7);
        assert_eq!(a.npcs.len(), b.npcs.len());
        assert!(a.npcs.len() >= 10);
    }
}
