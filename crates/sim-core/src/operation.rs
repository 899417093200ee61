//! Multi-step faction operations (§3, §4.8): a named actor-driven sequence
//! that advances through the same three acts the narrative arc tracks,
//! milestone by milestone, emitting the `faction.operation.*` events the
//! chronicle reducer watches for. The only operation kind the closed action
//! vocabulary currently drives is the kidnap -> forced_eclipse -> anchor_sever
//! chain (§8 scenario 5); the type is kept open for future chains rather than
//! hard-coded to that one, matching `World.operations` being a general
//! store rather than an eclipsing-specific field.

use crate::ids::NpcId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    EclipsingChain,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::EclipsingChain => "eclipsing_chain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationPhase {
    Planning,
    Execution,
    Outcome,
}

impl OperationPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationPhase::Planning => "planning",
            OperationPhase::Execution => "execution",
            OperationPhase::Outcome => "outcome",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub kind: OperationKind,
    pub actor_id: NpcId,
    pub target_id: NpcId,
    pub phase: OperationPhase,
    pub started_tick: u64,
}
