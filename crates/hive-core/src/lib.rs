//! # Hive Core
//!
//! Core types and traits for the hive swarm coordination engine.
//!
//! A hive is a population of lightweight agents ("bees") that self-organize
//! around quality-scored work sources ("flowers") without a central
//! scheduler. Coordination is indirect, through decaying spatial signals
//! ("pheromone trails"), plus a periodic broadcast ("queen pulse") that
//! sets a coarse system mood.
//!
//! This crate holds everything that does not own mutable swarm state:
//!
//! - **types** — identifiers, positions, bees, flowers, trails, aggregate state
//! - **action** — the per-role action union handed to `agent_act`
//! - **event** — typed notifications observed by dashboards and voice layers
//! - **census** — role ratios, coherence, mood classification, deficits
//! - **stimulus** — collaborator traits for discovery, work value and threats
//! - **clock** — the time source seam
//!
//! ## Quick Start
//!
//! ```rust
//! use hive_core::prelude::*;
//!
//! let a = Position::new(0.0, 0.0, 0.0);
//! let b = Position::new(3.0, 4.0, 0.0);
//! assert_eq!(a.distance_to(&b), 5.0);
//!
//! let census = RoleCensus::from_roles([Role::Scout, Role::Worker, Role::Worker]);
//! assert!(census.coherence() < 1.0);
//! ```

pub mod action;
pub mod census;
pub mod clock;
pub mod error;
pub mod event;
pub mod prelude;
pub mod stimulus;
pub mod types;
