//! Site data model (§3): settlements carry the full set of mutable
//! aggregates the process pipeline writes to; terrain/special/hideout sites
//! carry only the scalars eclipsing/anchoring diffusion needs.

use crate::ids::{NpcId, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodType {
    Grain,
    Fish,
    Meat,
}

impl FoodType {
    pub const ALL: [FoodType; 3] = [FoodType::Grain, FoodType::Fish, FoodType::Meat];

    /// Spoilage horizon in days (§4.3).
    pub fn expiry_days(self) -> i64 {
        match self {
            FoodType::Grain => 60,
            FoodType::Fish => 2,
            FoodType::Meat => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FoodType::Grain => "grain",
            FoodType::Fish => "fish",
            FoodType::Meat => "meat",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FoodLot {
    pub amount: f64,
    pub produced_day: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Cohorts {
    pub children: f64,
    pub adults: f64,
    pub elders: f64,
}

impl Cohorts {
    pub fn total(&self) -> f64 {
        self.children + self.adults + self.elders
    }

    /// Adult-equivalent headcount used for per-capita consumption (§4.3):
    /// children and elders eat at a reduced rate relative to adults.
    pub fn adult_equivalents(&self) -> f64 {
        self.children * 0.6 + self.adults * 1.0 + self.elders * 0.8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Culture {
    Human,
    Elven,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    House,
    Market,
    Shrine,
    Guardhouse,
    Storage,
    Well,
    Gate,
    Fields,
    Docks,
    Clinic,
    Library,
    Tavern,
    Streets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalNode {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub pos: (f64, f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEdge {
    pub from: String,
    pub to: String,
    pub meters: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalGraph {
    pub nodes: Vec<LocalNode>,
    pub edges: Vec<LocalEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RumorEntry {
    pub tick: u64,
    pub kind: String,
    pub actor_id: Option<NpcId>,
    pub site_id: SiteId,
    pub confidence: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settlement {
    pub cohorts: Cohorts,
    pub housing_capacity: f64,
    pub food: std::collections::HashMap<FoodType, Vec<FoodLot>>,
    pub production_per_day: std::collections::HashMap<FoodType, f64>,
    pub fields_condition: f64,
    pub hunger: f64,
    pub unrest: f64,
    pub morale: f64,
    pub sickness: f64,
    pub cult_influence: f64,
    pub eclipsing_pressure: f64,
    pub anchoring_strength: f64,
    pub labor_worked_today: std::collections::HashMap<FoodType, f64>,
    pub rumors: VecDeque<RumorEntry>,
    pub deaths_today: Vec<NpcId>,
    pub local: Option<LocalGraph>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonSettlementKind {
    Terrain,
    Special,
    Hideout,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NonSettlement {
    pub eclipsing_pressure: f64,
    pub anchoring_strength: f64,
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SiteKind {
    Settlement(Settlement),
    Terrain(NonSettlement),
    Special(NonSettlement),
    Hideout(NonSettlement),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub culture: Culture,
    pub kind: SiteKind,
}

impl Site {
    pub fn eclipsing_pressure(&self) -> f64 {
        match &self.kind {
            SiteKind::Settlement(s) => s.eclipsing_pressure,
            SiteKind::Terrain(n) | SiteKind::Special(n) | SiteKind::Hideout(n) => {
                n.eclipsing_pressure
            }
        }
    }

    pub fn set_eclipsing_pressure(&mut self, value: f64) {
        let clamped = value.clamp(0.0, 100.0);
        match &mut self.kind {
            SiteKind::Settlement(s) => s.eclipsing_pressure = clamped,
            SiteKind::Terrain(n) | SiteKind::Special(n) | SiteKind::Hideout(n) => {
                n.eclipsing_pressure = clamped
            }
        }
    }

    pub fn anchoring_strength(&self) -> f64 {
        match &self.kind {
            SiteKind::Settlement(s) => s.anchoring_strength,
            SiteKind::Terrain(n) | SiteKind::Special(n) | SiteKind::Hideout(n) => {
                n.anchoring_strength
            }
        }
    }

    pub fn set_anchoring_strength(&mut self, value: f64) {
        let clamped = value.clamp(0.0, 100.0);
        match &mut self.kind {
            SiteKind::Settlement(s) => s.anchoring_strength = clamped,
            SiteKind::Terrain(n) | SiteKind::Special(n) | SiteKind::Hideout(n) => {
                n.anchoring_strength = clamped
            }
        }
    }

    pub fn is_hidden_hideout(&self) -> bool {
        matches!(&self.kind, SiteKind::Hideout(n) if n.hidden)
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.kind {
            SiteKind::Settlement(s) => Some(s),
            _ => None,
        }
    }

    pub fn settlement_mut(&mut self) -> Option<&mut Settlement> {
        match &mut self.kind {
            SiteKind::Settlement(s) => Some(s),
            _ => None,
        }
    }

    /// Local source term for diffusion processes (§4.3): named sites and
    /// hideouts seed pressure/anchoring independent of neighbor averaging.
    pub fn eclipsing_source(&self) -> f64 {
        if self.name == "AncientRuin" {
            90.0
        } else if matches!(self.kind, SiteKind::Hideout(_)) {
            55.0
        } else {
            0.0
        }
    }

    pub fn anchoring_source(&self) -> f64 {
        match self.name.as_str() {
            "ElvenCity" => 85.0,
            "ElvenTownFortified" => 65.0,
            _ => 0.0,
        }
    }
}

/// Dijkstra shortest path by meters over a settlement's local graph (§4.6).
pub fn local_shortest_path(graph: &LocalGraph, from: &str, to: &str) -> Option<(Vec<String>, f64)> {
    use std::cmp::Ordering;
    use std::collections::{BinaryHeap, HashMap};

    #[derive(PartialEq)]
    struct HeapEntry(f64, String);
    impl Eq for HeapEntry {}
    impl Ord for HeapEntry {
        fn cmp(&self, other: &Self) -> Ordering {
            other.0.partial_cmp(&self.0).unwrap_or(Ordering::Equal)
        }
    }
    impl PartialOrd for HeapEntry {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    let mut adjacency: HashMap<String, Vec<(String, f64)>> = HashMap::new();
    for edge in &graph.edges {
        adjacency
            .entry(edge.from.clone())
            .or_default()
            .push((edge.to.clone(), edge.meters));
        adjacency
            .entry(edge.to.clone())
            .or_default()
            .push((edge.from.clone(), edge.meters));
    }

    let mut dist: HashMap<String, f64> = HashMap::new();
    let mut prev: HashMap<String, String> = HashMap::new();
    let mut heap = BinaryHeap::new();
    dist.insert(from.to_string(), 0.0);
    heap.push(HeapEntry(0.0, from.to_string()));

    while let Some(HeapEntry(cost, node)) = heap.pop() {
        if node == to {
            break;
        }
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        if let Some(neighbors) = adjacency.get(&node) {
            for (next, weight) in neighbors {
                let candidate = cost + weight;
                if candidate < *dist.get(next).unwrap_or(&f64::INFINITY) {
                    dist.insert(next.clone(), candidate);
                    prev.insert(next.clone(), node.clone());
                    heap.push(HeapEntry(candidate, next.clone()));
                }
            }
        }
    }

    if !dist.contains_key(to) {
        return None;
    }
    let mut path = vec![to.to_string()];
    let mut current = to.to_string();
    while let Some(p) = prev.get(&current) {
        path.push(p.clone());
        current = p.clone();
    }
    path.reverse();
    Some((path, dist[to]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> LocalGraph {
        LocalGraph {
            nodes: vec![],
            edges: vec![
                LocalEdge { from: "gate".into(), to: "market".into(), meters: 100.0 },
                LocalEdge { from: "market".into(), to: "tavern".into(), meters: 50.0 },
                LocalEdge { from: "gate".into(), to: "tavern".into(), meters: 300.0 },
            ],
        }
    }

    #[test]
    fn dijkstra_prefers_shorter_multi_hop_path() {
        let graph = sample_graph();
        let (path, dist) = local_shortest_path(&graph, "gate", "tavern").unwrap();
        assert_eq!(dist, 150.0);
        assert_eq!(path, vec!["gate", "market", "tavern"]);
    }

    #[test]
    fn dijkstra_returns_none_when_unreachable() {
        let graph = sample_graph();
        assert!(local_shortest_path(&graph, "gate", "nowhere").is_none());
    }

    #[test]
    fn adult_equivalents_weights_cohorts() {
        let c = Cohorts { children: 10.0, adults: 10.0, elders: 10.0 };
        assert_eq!(c.adult_equivalents(), 6.0 + 10.0 + 8.0);
    }
}
