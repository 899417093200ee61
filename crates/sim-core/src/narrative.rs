//! Chronicle/arc data embedded in the world (§4.8, §3). The reduction logic
//! itself (event stream -> these records) lives in the `director` crate,
//! kept as a pure reducer outside the resolvers per the design notes; this
//! module only owns the bounded storage the world carries between ticks.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const MAX_BEATS: usize = 400;
pub const MAX_ENTRIES: usize = 1200;
pub const MAX_ARCS: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryBeat {
    pub tick: u64,
    pub kind: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChronicleEntry {
    pub tick: u64,
    pub event_kind: String,
    pub site_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Act {
    Planning,
    Execution,
    Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeArc {
    pub operation_id: String,
    pub act: Act,
    pub beats: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chronicle {
    pub beats: VecDeque<StoryBeat>,
    pub entries: VecDeque<ChronicleEntry>,
    pub arcs: VecDeque<NarrativeArc>,
}

impl Chronicle {
    pub fn push_beat(&mut self, beat: StoryBeat) {
        self.beats.push_back(beat);
        while self.beats.len() > MAX_BEATS {
            self.beats.pop_front();
        }
    }

    pub fn push_entry(&mut self, entry: ChronicleEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn upsert_arc(&mut self, arc: NarrativeArc) {
        if let Some(existing) = self
            .arcs
            .iter_mut()
            .find(|a| a.operation_id == arc.operation_id)
        {
            *existing = arc;
            return;
        }
        self.arcs.push_back(arc);
        while self.arcs.len() > MAX_ARCS {
            self.arcs.pop_front();
        }
    }
}
