//! # Hive Runtime
//!
//! The living swarm: pheromone field, flower and bee registries, role
//! behaviors, the queen's broadcaster and the coordinator that drives them.
//!
//! The coordinator is the "hive" — it owns every piece of mutable swarm
//! state, evolves the field on each tick, and dispatches bee actions. Bees
//! never talk to each other directly. They leave trails, sense trails, and
//! listen to the queen.
//!
//! ```rust
//! use hive_runtime::prelude::*;
//!
//! let mut hive = SwarmCoordinator::new(SwarmConfig::default().with_seed(7));
//! let flower = hive.spawn_flower(FlowerSeed::new(1.0).with_biometrics(1).with_activity(1));
//! assert_eq!(flower.quality, 1.0);
//! assert_eq!(hive.bees().len(), 10);
//!
//! let state = hive.tick();
//! assert_eq!(state.flower_count, 1);
//! ```

pub mod behavior;
pub mod config;
pub mod coordinator;
pub mod field;
pub mod flowers;
pub mod notify;
pub mod prelude;
pub mod queen;
pub mod registry;
pub mod sampler;
pub mod stimulus;

#[cfg(feature = "async")]
pub mod async_runtime;
