//! The world value: a single arena of sites and NPCs reproduced by
//! transformation between ticks (§3).

pub mod npc;
pub mod site;

pub use npc::Npc;
pub use site::{Site, SiteKind};

use crate::ids::{NpcId, SiteId};
use crate::map::Map;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Secret {
    pub id: u64,
    pub holder_id: NpcId,
    pub kind: String,
    pub tick: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub seed: u64,
    /// Hours since start. All processes/resolvers within a tick read the
    /// pre-increment value; it is advanced last (§4.1 step 10).
    pub tick: u64,
    pub map: Map,
    pub sites: BTreeMap<SiteId, Site>,
    pub npcs: BTreeMap<NpcId, Npc>,
    pub secrets: Vec<Secret>,
    pub next_secret_id: u64,
    pub operations: BTreeMap<String, crate::operation::Operation>,
    pub next_operation_id: u64,
    pub chronicle: crate::narrative::Chronicle,
}

impl World {
    pub fn alive_npc_ids_sorted(&self) -> Vec<NpcId> {
        self.npcs
            .iter()
            .filter(|(_, n)| n.alive)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn site_ids_in_map_order(&self) -> Vec<SiteId> {
        self.map.sites.clone()
    }

    pub fn get_site(&self, id: &SiteId) -> Option<&Site> {
        self.sites.get(id)
    }

    pub fn get_site_mut(&mut self, id: &SiteId) -> Option<&mut Site> {
        self.sites.get_mut(id)
    }

    pub fn get_npc(&self, id: &NpcId) -> Option<&Npc> {
        self.npcs.get(id)
    }

    pub fn get_npc_mut(&mut self, id: &NpcId) -> Option<&mut Npc> {
        self.npcs.get_mut(id)
    }

    /// NPCs currently present at a site, stable id order.
    pub fn npcs_at_site(&self, site_id: &SiteId) -> Vec<&Npc> {
        let mut out: Vec<&Npc> = self
            .npcs
            .values()
            .filter(|n| n.alive && &n.site_id == site_id)
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    pub fn record_secret(&mut self, holder_id: NpcId, kind: impl Into<String>) -> u64 {
        let id = self.next_secret_id;
        self.next_secret_id += 1;
        self.secrets.push(Secret {
            id,
            holder_id,
            kind: kind.into(),
            tick: self.tick,
        });
        id
    }

    pub fn hour_of_day(&self) -> u64 {
        self.tick % 24
    }

    pub fn day(&self) -> u64 {
        self.tick / 24
    }

    /// Derived view referenced in §3 ("entities"): a flat lookup of every
    /// living NPC id to its current site, used by belief/witness logic.
    pub fn entity_locations(&self) -> HashMap<NpcId, SiteId> {
        self.npcs
            .iter()
            .filter(|(_, n)| n.alive)
            .map(|(id, n)| (id.clone(), n.site_id.clone()))
            .collect()
    }
}
