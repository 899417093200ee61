//! Attempt type (§3) and the closed vocabulary of action kinds (§4.4).

use crate::ids::{NpcId, SiteId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Idle,
    Travel,
    WorkFarm,
    WorkFish,
    WorkHunt,
    Trade,
    Patrol,
    Investigate,
    Assault,
    Kill,
    Kidnap,
    Raid,
    Steal,
    Heal,
    PreachFixedPath,
    ForcedEclipse,
    AnchorSever,
    Arrest,
    Gossip,
    Blackmail,
    Recon,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Idle => "idle",
            ActionKind::Travel => "travel",
            ActionKind::WorkFarm => "work_farm",
            ActionKind::WorkFish => "work_fish",
            ActionKind::WorkHunt => "work_hunt",
            ActionKind::Trade => "trade",
            ActionKind::Patrol => "patrol",
            ActionKind::Investigate => "investigate",
            ActionKind::Assault => "assault",
            ActionKind::Kill => "kill",
            ActionKind::Kidnap => "kidnap",
            ActionKind::Raid => "raid",
            ActionKind::Steal => "steal",
            ActionKind::Heal => "heal",
            ActionKind::PreachFixedPath => "preach_fixed_path",
            ActionKind::ForcedEclipse => "forced_eclipse",
            ActionKind::AnchorSever => "anchor_sever",
            ActionKind::Arrest => "arrest",
            ActionKind::Gossip => "gossip",
            ActionKind::Blackmail => "blackmail",
            ActionKind::Recon => "recon",
        }
    }

    pub const ALL: [ActionKind; 21] = [
        ActionKind::Idle,
        ActionKind::Travel,
        ActionKind::WorkFarm,
        ActionKind::WorkFish,
        ActionKind::WorkHunt,
        ActionKind::Trade,
        ActionKind::Patrol,
        ActionKind::Investigate,
        ActionKind::Assault,
        ActionKind::Kill,
        ActionKind::Kidnap,
        ActionKind::Raid,
        ActionKind::Steal,
        ActionKind::Heal,
        ActionKind::PreachFixedPath,
        ActionKind::ForcedEclipse,
        ActionKind::AnchorSever,
        ActionKind::Arrest,
        ActionKind::Gossip,
        ActionKind::Blackmail,
        ActionKind::Recon,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentMagnitude {
    Minor,
    Normal,
    Major,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Why {
    pub text: String,
    pub drivers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: u64,
    pub tick: u64,
    pub kind: ActionKind,
    pub visibility: sim_events::Visibility,
    pub actor_id: NpcId,
    pub target_id: Option<NpcId>,
    pub site_id: SiteId,
    pub duration_hours: u64,
    pub intent_magnitude: IntentMagnitude,
    pub resources: Option<serde_json::Value>,
    pub why: Option<Why>,
}
