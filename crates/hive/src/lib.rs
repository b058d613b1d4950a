//! # Hive
//!
//! Stigmergic swarm coordination.
//!
//! A hive is a population of lightweight agents ("bees") that organize
//! themselves around quality-scored work sources ("flowers") with no central
//! scheduler. Bees coordinate indirectly by leaving decaying pheromone trails
//! in a shared 3D field, and a queen periodically broadcasts the hive's mood.
//!
//! ## Quick Start
//!
//! ```rust
//! use hive::prelude::*;
//!
//! // A deterministic hive
//! let mut hive = SwarmCoordinator::new(SwarmConfig::default().with_seed(1));
//!
//! // A flower recruits its founding population
//! let flower = hive.spawn_flower(FlowerSeed::new(0.9).with_activity(true));
//!
//! // Workers assigned to it report completed work
//! let workers: Vec<BeeId> = hive
//!     .bees()
//!     .iter()
//!     .filter(|b| b.role == Role::Worker)
//!     .map(|b| b.id)
//!     .collect();
//! for id in workers {
//!     hive.agent_act(id, BeeAction::worker(0.9));
//! }
//!
//! hive.tick();
//! let decision = hive.emergent_decision("work");
//! assert_eq!(decision.decision, "work_completed");
//! assert!(flower.quality > 0.6);
//! ```
//!
//! ## Architecture
//!
//! - [`hive_core`] - Shared types, actions, events, census math, collaborator traits
//! - [`hive_runtime`] - Pheromone field, registries, behaviors, queen, coordinator
//!
//! ## Roles
//!
//! | Role | Target share | Biological analog | What it does |
//! |------|--------------|-------------------|--------------|
//! | Scout | 10% | Forager scouts | Marks high-quality discoveries |
//! | Worker | 60% | Foragers | Follows trails to flowers, reports work |
//! | Nurse | 20% | Nurse bees | Restores exhausted neighbors |
//! | Guard | 10% | Entrance guards | Marks threats |
//! | Queen | — | Queen | Broadcasts the hive's mood |
//!
//! Bees in an over-represented role drift, one at a time, into the role the
//! hive is shortest of. Coherence measures how close the mix is to target.

pub use hive_core as core;
pub use hive_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use hive::prelude::*;
/// ```
pub mod prelude {
    pub use hive_runtime::prelude::*;
}
