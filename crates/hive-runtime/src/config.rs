//! Swarm configuration.
//!
//! Every tunable of the hive lives here. Missing fields fall back to their
//! defaults when deserializing, so a `hive.toml` only needs the values it
//! changes.

use hive_core::error::{HiveError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`SwarmCoordinator`](crate::coordinator::SwarmCoordinator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Population cap. Spawning at the cap evicts the weakest bee (default: 1000).
    pub max_bees: usize,
    /// Default radius for neighbor queries (default: 50).
    pub proximity_radius: f64,
    /// Edge length of a pheromone grid cell (default: 50).
    pub cell_size: f64,
    /// Deposits this close to an existing trail reinforce it (default: 10).
    pub deposit_tolerance: f64,
    /// Only reinforce trails of the deposit's own type; otherwise any trail
    /// within tolerance absorbs the deposit (default: false).
    pub merge_by_type: bool,
    /// Fraction of intensity kept per second (default: 0.95).
    pub decay_rate: f64,
    /// Trails below this intensity are removed (default: 0.01).
    pub removal_threshold: f64,
    /// Radius for `trails_from` and worker trail following (default: 100).
    pub trail_query_radius: f64,
    /// Default result limit for `trails_from` (default: 10).
    pub trail_limit: usize,
    /// Search radius per path-finding step (default: 150).
    pub path_search_radius: f64,
    /// Path finding stops this close to the goal (default: 10).
    pub path_arrival_radius: f64,
    /// Energy spent per action (default: 0.01).
    pub energy_cost: f64,
    /// Bees below this energy rest instead of acting (default: 0.3).
    pub rest_threshold: f64,
    /// Tick period of the async loop, in milliseconds (default: 100).
    pub tick_interval_ms: u64,
    /// Minimum gap between queen pulses, in milliseconds (default: 1500).
    pub broadcast_interval_ms: u64,
    /// Emergent decisions below this confidence fall back to `explore` (default: 0.5).
    pub consensus_threshold: f64,
    /// Side length of the cube bees and flowers are placed in (default: 1000).
    pub world_size: f64,
    /// Share of the population the sampler acts per tick (default: 0.1).
    pub sample_fraction: f64,
    /// Summed `threat_detected` intensity that puts the swarm in threat mood (default: 2.0).
    pub threat_alarm_intensity: f64,
    /// Capacity of the event channel and the recent-event log (default: 1024).
    pub event_capacity: usize,
    /// Seed for placement, phrase choice and the random stimulus.
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            max_bees: 1000,
            proximity_radius: 50.0,
            cell_size: 50.0,
            deposit_tolerance: 10.0,
            merge_by_type: false,
            decay_rate: 0.95,
            removal_threshold: 0.01,
            trail_query_radius: 100.0,
            trail_limit: 10,
            path_search_radius: 150.0,
            path_arrival_radius: 10.0,
            energy_cost: 0.01,
            rest_threshold: 0.3,
            tick_interval_ms: 100,
            broadcast_interval_ms: 1500,
            consensus_threshold: 0.5,
            world_size: 1000.0,
            sample_fraction: 0.1,
            threat_alarm_intensity: 2.0,
            event_capacity: 1024,
            seed: None,
        }
    }
}

impl SwarmConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_bees(mut self, max_bees: usize) -> Self {
        self.max_bees = max_bees;
        self
    }

    /// Tick period, never shorter than a millisecond.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn broadcast_interval(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.broadcast_interval_ms.min(i64::MAX as u64) as i64)
    }

    /// Reject values the swarm cannot run with.
    pub fn validate(&self) -> Result<()> {
        fn positive(field: &str, value: f64) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(HiveError::config(field, format!("must be positive, got {}", value)))
            }
        }
        fn non_negative(field: &str, value: f64) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(HiveError::config(field, format!("must be non-negative, got {}", value)))
            }
        }
        fn unit(field: &str, value: f64) -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(HiveError::config(field, format!("must be within [0, 1], got {}", value)))
            }
        }

        if self.max_bees == 0 {
            return Err(HiveError::config("max_bees", "must be at least 1"));
        }
        if self.event_capacity == 0 {
            return Err(HiveError::config("event_capacity", "must be at least 1"));
        }
        if self.tick_interval_ms == 0 {
            return Err(HiveError::config("tick_interval_ms", "must be at least 1"));
        }
        positive("proximity_radius", self.proximity_radius)?;
        positive("cell_size", self.cell_size)?;
        non_negative("deposit_tolerance", self.deposit_tolerance)?;
        if !(self.decay_rate > 0.0 && self.decay_rate <= 1.0) {
            return Err(HiveError::config(
                "decay_rate",
                format!("must be within (0, 1], got {}", self.decay_rate),
            ));
        }
        unit("removal_threshold", self.removal_threshold)?;
        positive("trail_query_radius", self.trail_query_radius)?;
        positive("path_search_radius", self.path_search_radius)?;
        non_negative("path_arrival_radius", self.path_arrival_radius)?;
        unit("energy_cost", self.energy_cost)?;
        unit("rest_threshold", self.rest_threshold)?;
        unit("consensus_threshold", self.consensus_threshold)?;
        positive("world_size", self.world_size)?;
        unit("sample_fraction", self.sample_fraction)?;
        non_negative("threat_alarm_intensity", self.threat_alarm_intensity)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SwarmConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_values_name_their_field() {
        let cfg = SwarmConfig {
            cell_size: 0.0,
            ..SwarmConfig::default()
        };
        match cfg.validate() {
            Err(HiveError::Config { field, .. }) => assert_eq!(field, "cell_size"),
            other => panic!("expected config error, got {:?}", other),
        }

        let cfg = SwarmConfig {
            decay_rate: 1.5,
            ..SwarmConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SwarmConfig::default().with_max_bees(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SwarmConfig = serde_json::from_str(r#"{"max_bees": 42}"#).unwrap();
        assert_eq!(cfg.max_bees, 42);
        assert_eq!(cfg.cell_size, 50.0);
        assert_eq!(cfg.seed, None);
    }
}
