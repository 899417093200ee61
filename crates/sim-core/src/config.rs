//! Process-wide tuning knobs.
//!
//! The ancestor codebase reached for a global mutable config singleton; per
//! the design notes that's replaced here with an explicit `Config` threaded
//! into `run_simulation` and down into every process/resolver via `&Config`.
//! Initialized once at run start, never mutated mid-tick.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub memory_decay_rate: f64,
    pub memory_vividness_threshold: f64,
    pub memory_importance_threshold: f64,
    pub emotion_decay_per_hour: f64,
    pub stress_decay_per_hour: f64,
    pub base_emotion_intensity: f64,
    pub relationship_decay_per_day: f64,
    pub debt_decay_per_day: f64,
    pub relationship_change_from_event: f64,
    pub goal_priority_from_memory: f64,
    pub goal_abandon_threshold: f64,
    pub max_goals_per_entity: usize,
    pub plan_replan_threshold: u32,
    pub plan_step_timeout_multiplier: u32,
    pub rumor_spread_chance: f64,
    pub rumor_mutation_chance: f64,
    pub rumor_decay_per_day: f64,
    pub base_food_price: f64,
    pub price_fluctuation_range: f64,
    pub work_income_multiplier: f64,
    pub notability_decay_per_day: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            memory_decay_rate: 0.1,
            memory_vividness_threshold: 10.0,
            memory_importance_threshold: 50.0,
            emotion_decay_per_hour: 2.0,
            stress_decay_per_hour: 1.0,
            base_emotion_intensity: 50.0,
            relationship_decay_per_day: 0.5,
            debt_decay_per_day: 0.1,
            relationship_change_from_event: 15.0,
            goal_priority_from_memory: 50.0,
            goal_abandon_threshold: 10.0,
            max_goals_per_entity: 5,
            plan_replan_threshold: 3,
            plan_step_timeout_multiplier: 2,
            rumor_spread_chance: 0.15,
            rumor_mutation_chance: 0.1,
            rumor_decay_per_day: 0.5,
            base_food_price: 5.0,
            price_fluctuation_range: 0.5,
            work_income_multiplier: 1.0,
            notability_decay_per_day: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_memories_per_entity: usize,
    pub max_relationships_per_entity: usize,
    pub max_active_goals: usize,
    pub max_plan_steps: usize,
    pub max_rumors_in_world: usize,
    pub max_narratives: usize,
    pub max_secrets_in_world: usize,
    pub max_entities_per_tick: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_memories_per_entity: 100,
            max_relationships_per_entity: 50,
            max_active_goals: 5,
            max_plan_steps: 10,
            max_rumors_in_world: 500,
            max_narratives: 20,
            max_secrets_in_world: 200,
            max_entities_per_tick: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tuning: TuningConfig,
    pub limits: LimitsConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SimError::Config(format!("reading {:?}: {e}", path.as_ref())))?;
        toml::from_str(&text).map_err(|e| SimError::Config(format!("parsing config: {e}")))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.tuning.rumor_spread_chance, 0.15);
        assert_eq!(cfg.limits.max_rumors_in_world, 500);
        assert_eq!(cfg.limits.max_entities_per_tick, 1000);
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let cfg = Config::load_or_default("/nonexistent/path/config.toml");
        assert_eq!(cfg.tuning.base_food_price, 5.0);
    }

    #[test]
    fn partial_toml_fills_remaining_defaults() {
        let toml_text = "[tuning]\nrumor_spread_chance = 0.5\n";
        let cfg: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(cfg.tuning.rumor_spread_chance, 0.5);
        assert_eq!(cfg.tuning.rumor_mutation_chance, 0.1);
        assert_eq!(cfg.limits.max_narratives, 20);
    }
}
