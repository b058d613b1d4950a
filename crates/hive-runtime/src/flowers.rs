//! Flower registry — the work sources the swarm services.

use chrono::{DateTime, Utc};
use hive_core::types::{Flower, FlowerId, FlowerSeed, Position, Role};
use std::collections::BTreeMap;

/// Flowers above this quality draw the larger founding population.
pub const RICH_QUALITY: f64 = 0.8;
const RICH_POPULATION: usize = 10;
const BASE_POPULATION: usize = 5;

/// How many bees of each caste a new flower recruits.
///
/// The base population is split by the caste target ratios, each share
/// rounded up, so a flower always gets at least one bee of every caste.
pub fn population_plan(quality: f64) -> [(Role, usize); 4] {
    let base = if quality > RICH_QUALITY {
        RICH_POPULATION
    } else {
        BASE_POPULATION
    };
    Role::CASTES.map(|role| {
        // Rounded to cents first so 10 × 0.6 stays 6 rather than 7.
        let share = (base as f64 * role.target_ratio() * 100.0).round() / 100.0;
        (role, share.ceil() as usize)
    })
}

/// Registered flowers, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct FlowerRegistry {
    flowers: BTreeMap<FlowerId, Flower>,
}

impl FlowerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score and register a flower from its seed.
    pub fn register(
        &mut self,
        id: FlowerId,
        seed: FlowerSeed,
        position: Position,
        now: DateTime<Utc>,
    ) -> &Flower {
        let quality = seed.quality();
        let mut metadata = seed.metadata;
        if let Some(biometrics) = seed.biometrics {
            metadata.insert("biometrics".to_string(), biometrics);
        }
        if let Some(activity) = seed.activity {
            metadata.insert("activity".to_string(), activity);
        }
        let flower = Flower {
            id,
            position,
            quality,
            bee_count: 0,
            metadata,
            created_at: now,
        };
        self.flowers.entry(id).or_insert(flower)
    }

    pub fn get(&self, id: &FlowerId) -> Option<&Flower> {
        self.flowers.get(id)
    }

    pub fn contains(&self, id: &FlowerId) -> bool {
        self.flowers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }

    pub fn ids(&self) -> Vec<FlowerId> {
        self.flowers.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flower> {
        self.flowers.values()
    }

    /// Count one more bee on the flower. False if it does not exist.
    pub fn assign(&mut self, id: &FlowerId) -> bool {
        match self.flowers.get_mut(id) {
            Some(flower) => {
                flower.bee_count += 1;
                true
            }
            None => false,
        }
    }

    /// Count one bee fewer on the flower, never below zero.
    pub fn release(&mut self, id: &FlowerId) {
        if let Some(flower) = self.flowers.get_mut(id) {
            flower.bee_count = flower.bee_count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(plan: [(Role, usize); 4]) -> Vec<usize> {
        plan.iter().map(|(_, n)| *n).collect()
    }

    #[test]
    fn rich_flower_recruits_ten() {
        assert_eq!(counts(population_plan(1.0)), vec![1, 6, 2, 1]);
    }

    #[test]
    fn modest_flower_recruits_rounded_up_shares_of_five() {
        // 0.5, 3, 1, 0.5 rounded up.
        assert_eq!(counts(population_plan(0.8)), vec![1, 3, 1, 1]);
        assert_eq!(counts(population_plan(0.0)), vec![1, 3, 1, 1]);
    }

    #[test]
    fn register_keeps_signals_as_metadata() {
        let mut reg = FlowerRegistry::new();
        let id = FlowerId::new();
        let seed = FlowerSeed::new(0.5)
            .with_biometrics(serde_json::json!({"hr": 60}))
            .with_metadata("owner", "alice");
        let flower = reg.register(id, seed, Position::origin(), Utc::now());
        assert!((flower.quality - 0.5).abs() < 1e-12);
        assert_eq!(flower.metadata["biometrics"]["hr"], 60);
        assert_eq!(flower.metadata["owner"], "alice");
    }

    #[test]
    fn gauge_tracks_assignments() {
        let mut reg = FlowerRegistry::new();
        let id = FlowerId::new();
        reg.register(id, FlowerSeed::new(1.0), Position::origin(), Utc::now());
        assert!(reg.assign(&id));
        assert!(reg.assign(&id));
        reg.release(&id);
        reg.release(&id);
        reg.release(&id);
        assert_eq!(reg.get(&id).unwrap().bee_count, 0);
        assert!(!reg.assign(&FlowerId::new()));
    }
}
