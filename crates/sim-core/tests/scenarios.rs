//! End-to-end scenarios driving the public `run_simulation`/`tick_hour`
//! entry points directly, rather than unit-testing individual processes.

use sim_core::actions::resolve::resolve_attempt;
use sim_core::attempt::{ActionKind, Attempt, IntentMagnitude};
use sim_core::belief::ingest_rumors_on_arrival;
use sim_core::config::Config;
use sim_core::ids::{NpcId, SiteId};
use sim_core::rng::SimRng;
use sim_core::run::run_simulation;
use sim_core::setup::build_initial_world;
use sim_core::tick::tick_hour;
use sim_core::world::npc::{Category, DeathCause};
use sim_core::world::site::RumorEntry;
use sim_events::Visibility;

fn event_kinds(events: &[sim_events::SimEvent]) -> Vec<&str> {
    events.iter().map(|e| e.kind.as_str()).collect()
}

#[test]
fn same_seed_produces_identical_event_sequence() {
    let config = Config::default();
    let a = run_simulation(123, 7, &config).expect("run a");
    let b = run_simulation(123, 7, &config).expect("run b");

    assert_eq!(event_kinds(&a.events), event_kinds(&b.events));
    assert_eq!(a.summaries.len(), b.summaries.len());
    for (sa, sb) in a.summaries.iter().zip(b.summaries.iter()) {
        assert_eq!(
            serde_json::to_value(sa).unwrap(),
            serde_json::to_value(sb).unwrap()
        );
    }
}

#[test]
fn different_seeds_diverge_in_content() {
    let config = Config::default();
    let a = run_simulation(1, 5, &config).expect("run a");
    let b = run_simulation(2, 5, &config).expect("run b");

    assert!(!a.events.is_empty());
    assert!(!b.events.is_empty());
    // A different seed must perturb something observable beyond just event
    // counts (which the fixed tick order alone would keep equal); compare
    // the serialized payloads of the attempt-bearing events.
    let payloads_a: Vec<_> = a
        .events
        .iter()
        .filter(|e| e.kind == sim_events::kinds::ATTEMPT_RECORDED)
        .map(|e| serde_json::to_string(&e.data).unwrap())
        .collect();
    let payloads_b: Vec<_> = b
        .events
        .iter()
        .filter(|e| e.kind == sim_events::kinds::ATTEMPT_RECORDED)
        .map(|e| serde_json::to_string(&e.data).unwrap())
        .collect();
    assert_ne!(payloads_a, payloads_b);
}

#[test]
fn negative_days_rejected_before_any_tick_runs() {
    let config = Config::default();
    let err = run_simulation(1, -1, &config).unwrap_err();
    assert!(matches!(err, sim_core::SimError::NegativeDays(-1)));
}

#[test]
fn sustained_hunger_eventually_kills_a_named_npc_by_starvation() {
    let mut world = build_initial_world(7);
    let config = Config::default();
    let mut rng = SimRng::from_seed(7);

    let target: NpcId = NpcId::new("farmer_a1");
    let home: SiteId = SiteId::new("human_village_a");

    {
        let npc = world.get_npc_mut(&target).expect("farmer exists");
        npc.hp = 3.0;
    }
    {
        let settlement = world
            .get_site_mut(&home)
            .and_then(|s| s.settlement_mut())
            .expect("village a is a settlement");
        settlement.hunger = 90.0;
    }

    let mut next_seq = 1u64;
    let mut died = false;
    for _ in 0..60 {
        let (output, seq) = tick_hour(&mut world, &config, &mut rng, next_seq, Vec::new());
        next_seq = seq;
        if output
            .events
            .iter()
            .any(|e| e.kind == sim_events::kinds::NPC_DIED && e.data.as_ref().and_then(|d| d.get("npcId")).map(|v| v == "farmer_a1").unwrap_or(false))
        {
            died = true;
            break;
        }
    }

    assert!(died, "farmer_a1 should have died of starvation within 60 hours of sustained hunger");
    let npc = world.get_npc(&target).unwrap();
    assert!(!npc.alive);
    assert!(matches!(
        npc.death.as_ref().map(|d| &d.cause),
        Some(DeathCause::Starvation)
    ));
}

#[test]
fn rumor_ingestion_applies_the_documented_fear_and_loyalty_deltas() {
    let mut world = build_initial_world(9);
    let config = Config::default();
    let mut rng = SimRng::from_seed(9);

    let listener: NpcId = NpcId::new("trader_p1");
    let mentioned: NpcId = NpcId::new("guard_p1");
    let home: SiteId = SiteId::new("human_city_port");

    {
        let settlement = world
            .get_site_mut(&home)
            .and_then(|s| s.settlement_mut())
            .expect("city port is a settlement");
        settlement.rumors.push_back(RumorEntry {
            tick: 0,
            kind: "crime".into(),
            actor_id: Some(mentioned.clone()),
            site_id: home.clone(),
            confidence: 60.0,
            label: "assault".into(),
        });
    }

    ingest_rumors_on_arrival(&mut world, &config, &mut rng, &listener, 0);

    let npc = world.get_npc(&listener).unwrap();
    assert!(npc.beliefs.iter().any(|b| b.subject_id == mentioned));
    let rel = npc.relationships.get(&mentioned).expect("relationship recorded");
    assert!((-25.0..=30.0).contains(&rel.trust));
    assert_eq!(rel.fear, 15.0);
    assert_eq!(rel.loyalty, 20.0);
}

#[test]
fn kidnap_then_forced_eclipse_chain_moves_target_into_eclipsing_status() {
    let mut world = build_initial_world(3);
    let config = Config::default();

    let leader: NpcId = NpcId::new("cellleader_h1");
    let target: NpcId = NpcId::new("anchormage_e1");
    let site: SiteId = SiteId::new("cult_hideout_1");

    // Move the target into the kidnapper's site so the chain can unfold
    // without modelling travel; resolve_attempt doesn't itself check
    // co-location for these kinds, only HasTarget via preconditions,
    // which this test exercises by calling resolve_attempt directly.
    world.get_npc_mut(&target).unwrap().site_id = site.clone();

    let kidnap = Attempt {
        id: 1,
        tick: 0,
        kind: ActionKind::Kidnap,
        visibility: Visibility::Private,
        actor_id: leader.clone(),
        target_id: Some(target.clone()),
        site_id: site.clone(),
        duration_hours: 1,
        intent_magnitude: IntentMagnitude::Major,
        resources: None,
        why: None,
    };

    // The roll is probabilistic (base chance 23 + 10 per cult ally
    // present); scan a bounded range of seeds for one that detains the
    // target, rather than asserting a specific seed's internal draw.
    let mut detained_seed = None;
    for seed in 0u64..200 {
        let mut attempt_world = world.clone();
        let mut rng = SimRng::from_seed(seed);
        resolve_attempt(&mut attempt_world, &config, &mut rng, &mut sim_core::processes::EventContext::new(0, 1), &kidnap);
        if attempt_world.get_npc(&target).unwrap().is_detained() {
            world = attempt_world;
            detained_seed = Some(seed);
            break;
        }
    }
    let seed = detained_seed.expect("at least one of 200 seeds should succeed at a 23% base kidnap chance");

    let forced_eclipse = Attempt {
        id: 2,
        tick: 1,
        kind: ActionKind::ForcedEclipse,
        visibility: Visibility::Private,
        actor_id: leader.clone(),
        target_id: Some(target.clone()),
        site_id: site.clone(),
        duration_hours: 1,
        intent_magnitude: IntentMagnitude::Major,
        resources: None,
        why: None,
    };
    let mut eclipsed = false;
    for offset in 0u64..200 {
        let mut attempt_world = world.clone();
        let mut rng = SimRng::from_seed(seed.wrapping_add(offset).wrapping_add(1000));
        resolve_attempt(&mut attempt_world, &config, &mut rng, &mut sim_core::processes::EventContext::new(1, 1), &forced_eclipse);
        if attempt_world.get_npc(&target).unwrap().status.eclipsing {
            world = attempt_world;
            eclipsed = true;
            break;
        }
    }
    assert!(eclipsed, "forced_eclipse should succeed against a detained target within 200 seed attempts");
    assert_eq!(world.get_npc(&target).unwrap().category, Category::AnchorMage);

    let anchor_sever = Attempt {
        id: 3,
        tick: 2,
        kind: ActionKind::AnchorSever,
        visibility: Visibility::Public,
        actor_id: leader,
        target_id: Some(target.clone()),
        site_id: site,
        duration_hours: 1,
        intent_magnitude: IntentMagnitude::Major,
        resources: None,
        why: None,
    };
    let mut severed = false;
    for offset in 0u64..200 {
        let mut attempt_world = world.clone();
        let mut rng = SimRng::from_seed(offset.wrapping_add(5000));
        resolve_attempt(&mut attempt_world, &config, &mut rng, &mut sim_core::processes::EventContext::new(2, 1), &anchor_sever);
        if !attempt_world.get_npc(&target).unwrap().status.eclipsing {
            world = attempt_world;
            severed = true;
            break;
        }
    }
    assert!(severed, "anchor_sever should succeed within 200 seed attempts");
    assert!(!world.get_npc(&target).unwrap().status.eclipsing);
}

#[test]
fn bandit_raid_standing_roll_scales_with_bandit_headcount() {
    // roll_bandit_raid is exercised indirectly through tick_hour; with the
    // starting roster's single bandit at human_village_a, a long enough run
    // should surface at least one attempt with kind "raid" over many ticks,
    // without asserting an exact tick it occurs on.
    let mut world = build_initial_world(42);
    let config = Config::default();
    let mut rng = SimRng::from_seed(42);
    let mut next_seq = 1u64;
    let mut saw_raid = false;
    for _ in 0..24 * 14 {
        let (output, seq) = tick_hour(&mut world, &config, &mut rng, next_seq, Vec::new());
        next_seq = seq;
        if output.events.iter().any(|e| {
            e.kind == sim_events::kinds::ATTEMPT_RECORDED
                && e.data
                    .as_ref()
                    .and_then(|d| d.get("attempt"))
                    .and_then(|a| a.get("kind"))
                    .map(|k| k == "raid")
                    .unwrap_or(false)
        }) {
            saw_raid = true;
            break;
        }
    }
    assert!(saw_raid, "expected at least one raid attempt over two simulated weeks");
}
