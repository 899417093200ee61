//! NPC data model (§3): roles, traits, needs, beliefs, relationships,
//! everything a scoring pass or a resolver reads or writes for a single
//! actor.

use crate::ids::{NpcId, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Farmer,
    Fisher,
    Hunter,
    Trader,
    Guard,
    Priest,
    Healer,
    Blacksmith,
    Noble,
    Bandit,
    CultDevotee,
    CultLeader,
    CultEnforcer,
    AnchorMage,
    Scholar,
    Refugee,
    Child,
    Elder,
    Laborer,
    Innkeeper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    Aggression,
    Courage,
    Discipline,
    Integrity,
    Empathy,
    Greed,
    Fear,
    Suspicion,
    Curiosity,
    Ambition,
    NeedForCertainty,
}

pub const ALL_TRAITS: [Trait; 11] = [
    Trait::Aggression,
    Trait::Courage,
    Trait::Discipline,
    Trait::Integrity,
    Trait::Empathy,
    Trait::Greed,
    Trait::Fear,
    Trait::Suspicion,
    Trait::Curiosity,
    Trait::Ambition,
    Trait::NeedForCertainty,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Need {
    Food,
    Safety,
    Duty,
    Freedom,
    Meaning,
    Belonging,
    Wealth,
    Health,
}

pub const ALL_NEEDS: [Need; 8] = [
    Need::Food,
    Need::Safety,
    Need::Duty,
    Need::Freedom,
    Need::Meaning,
    Need::Belonging,
    Need::Wealth,
    Need::Health,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Murder,
    Starvation,
    Illness,
    Raid,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Death {
    pub tick: u64,
    pub cause: DeathCause,
    pub by_npc_id: Option<NpcId>,
    pub at_site_id: SiteId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultRole {
    None,
    Devotee,
    CellLeader,
    Enforcer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CultStatus {
    pub member: bool,
    pub role: Option<CultRole>,
    pub joined_tick: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefPredicate {
    WitnessedCrime,
    NpcDied,
    IdentifiedCultMember,
    DiscoveredLocation,
    HeardRumor,
    DivineSign,
    ThreatToFamily,
    ResistedEclipsing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefSource {
    Witnessed,
    Rumor,
    Report,
    Inferred,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Belief {
    pub subject_id: NpcId,
    pub predicate: BeliefPredicate,
    pub object: String,
    pub confidence: f64,
    pub source: BeliefSource,
    pub tick: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Relationship {
    pub trust: f64,
    pub fear: f64,
    pub loyalty: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    FavorGranted,
    FavorOwed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub kind: DebtKind,
    pub with_npc_id: NpcId,
    pub tick: u64,
    pub magnitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub priority: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub goal_id: String,
    pub steps: Vec<PlanStep>,
    pub step_index: usize,
}

impl Plan {
    pub fn current_step(&self) -> Option<&PlanStep> {
        self.steps.get(self.step_index)
    }

    pub fn is_complete(&self) -> bool {
        self.step_index >= self.steps.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub kind: String,
    pub target_site_id: Option<SiteId>,
    pub execute_at_tick: Option<u64>,
    pub intensity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub kind: String,
    pub object: String,
    pub tick: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Knowledge {
    pub facts: Vec<Fact>,
    pub secrets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub coins: f64,
    pub food: HashMap<crate::world::site::FoodType, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelState {
    pub from: SiteId,
    pub to: SiteId,
    pub total_km: f64,
    pub remaining_km: f64,
    pub edge_quality: crate::map::EdgeQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalTravelState {
    pub path: Vec<String>,
    pub next_index: usize,
    pub remaining_meters: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcStatus {
    pub detained: Option<Detention>,
    pub eclipsing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detention {
    pub by_npc_id: NpcId,
    pub at_site_id: SiteId,
    pub until_tick: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Emotions {
    pub stress: f64,
    pub fear: f64,
    pub anger: f64,
    pub grief: f64,
    pub gratitude: f64,
    pub pride: f64,
    pub shame: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodicMemory {
    pub tick: u64,
    pub kind: String,
    pub importance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentAction {
    pub tick: u64,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
    pub category: Category,
    pub site_id: SiteId,
    pub home_site_id: SiteId,
    pub alive: bool,
    pub death: Option<Death>,

    pub traits: HashMap<Trait, f64>,
    pub needs: HashMap<Need, f64>,

    pub hp: f64,
    pub max_hp: f64,
    pub trauma: f64,
    pub notability: f64,
    pub cult: CultStatus,
    pub beliefs: Vec<Belief>,
    pub relationships: HashMap<NpcId, Relationship>,
    pub goals: Vec<Goal>,
    pub plan: Option<Plan>,
    pub intents: Vec<Intent>,
    pub knowledge: Option<Knowledge>,
    pub inventory: Option<Inventory>,
    pub debts: Vec<Debt>,
    pub recent_actions: Vec<RecentAction>,
    pub consecutive_hunger_hours: u64,
    pub busy_until_tick: u64,
    pub busy_kind: Option<String>,
    pub last_attempt_tick: Option<u64>,
    pub forced_active_until_tick: Option<u64>,
    pub travel: Option<TravelState>,
    pub local_travel: Option<LocalTravelState>,
    pub status: NpcStatus,
    pub away_from_home_since_tick: Option<u64>,
    pub family_ids: Vec<NpcId>,
    pub episodic_memory: Vec<EpisodicMemory>,
    pub emotions: Emotions,
    pub active_states: Vec<crate::reactive_states::ActiveState>,
}

impl Npc {
    pub fn trait_value(&self, t: Trait) -> f64 {
        *self.traits.get(&t).unwrap_or(&0.0)
    }

    pub fn need_value(&self, n: Need) -> f64 {
        *self.needs.get(&n).unwrap_or(&0.0)
    }

    pub fn is_busy(&self, tick: u64) -> bool {
        self.busy_until_tick > tick
    }

    pub fn is_traveling(&self) -> bool {
        self.travel.is_some() || self.local_travel.is_some()
    }

    pub fn is_detained(&self) -> bool {
        self.status.detained.is_some()
    }
}
