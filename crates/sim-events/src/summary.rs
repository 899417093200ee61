//! Daily summary snapshot shape (see spec §6).

use serde::{Deserialize, Serialize};

/// Per-site rollup embedded in a `DailySummary`. Fields are optional because
/// non-settlement sites (terrain/special/hideout) only carry the pressure
/// and anchoring scalars that every site tracks.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub site_id: String,
    pub name: String,
    pub culture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohorts: Option<CohortsSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub housing_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_totals: Option<FoodTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrest: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hunger: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cult_influence: Option<f64>,
    pub eclipsing_pressure: f64,
    pub anchoring_strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alive_npcs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_npcs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cult_members: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_trauma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deaths_today: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct CohortsSummary {
    pub children: u32,
    pub adults: u32,
    pub elders: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct FoodTotals {
    pub grain: f64,
    pub fish: f64,
    pub meat: f64,
}

/// One daily digest, built at the last hour of each simulated day.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub day: u64,
    pub tick: u64,
    pub key_changes: Vec<String>,
    pub sites: Vec<SiteSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_site_summary_omits_settlement_fields() {
        let summary = SiteSummary {
            site_id: "ancient_ruin".into(),
            name: "Ancient Ruin".into(),
            culture: "none".into(),
            eclipsing_pressure: 90.0,
            anchoring_strength: 0.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("cohorts"));
        assert!(!json.contains("hunger"));
    }
}
