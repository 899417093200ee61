//! The hand-authored world graph and the diffusion weight shared by the
//! eclipsing-pressure and anchoring processes.

use crate::ids::SiteId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeQuality {
    Road,
    Rough,
}

impl EdgeQuality {
    /// Base travel speed in km/h before seasonal scaling (§4.6).
    pub fn base_speed_km_per_hour(self) -> f64 {
        match self {
            EdgeQuality::Road => 4.0,
            EdgeQuality::Rough => 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: SiteId,
    pub to: SiteId,
    pub km: f64,
    pub quality: EdgeQuality,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Map {
    /// Ordered by authoring order; this is the iteration order used
    /// everywhere determinism requires "author order from the map".
    pub sites: Vec<SiteId>,
    pub edges: Vec<Edge>,
}

/// Diffusion scale used by both eclipsing pressure and anchoring (§4.3):
/// `w(km) = S / (S + max(0, km))`.
pub const DIFFUSION_SCALE: f64 = 20.0;

pub fn diffusion_weight(km: f64) -> f64 {
    DIFFUSION_SCALE / (DIFFUSION_SCALE + km.max(0.0))
}

impl Map {
    pub fn neighbors(&self, site: &SiteId) -> Vec<(&SiteId, f64)> {
        let mut out = Vec::new();
        for edge in &self.edges {
            if &edge.from == site {
                out.push((&edge.to, edge.km));
            } else if &edge.to == site {
                out.push((&edge.from, edge.km));
            }
        }
        out
    }

    pub fn edge_between(&self, a: &SiteId, b: &SiteId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| (&e.from == a && &e.to == b) || (&e.from == b && &e.to == a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diffusion_weight_decreases_with_distance() {
        let near = diffusion_weight(5.0);
        let far = diffusion_weight(50.0);
        assert!(near > far);
        assert!((diffusion_weight(0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn neighbors_finds_both_directions() {
        let map = Map {
            sites: vec![SiteId::new("A"), SiteId::new("B")],
            edges: vec![Edge {
                from: SiteId::new("A"),
                to: SiteId::new("B"),
                km: 10.0,
                quality: EdgeQuality::Road,
            }],
        };
        assert_eq!(map.neighbors(&SiteId::new("A")).len(), 1);
        assert_eq!(map.neighbors(&SiteId::new("B")).len(), 1);
    }
}
