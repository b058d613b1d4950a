//! Hive Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use hive_runtime::prelude::*;
//! ```

pub use crate::config::SwarmConfig;
pub use crate::coordinator::{SwarmCoordinator, SwarmSnapshot};
pub use crate::field::PheromoneField;
pub use crate::flowers::{population_plan, FlowerRegistry};
pub use crate::notify::Notifier;
pub use crate::queen::Broadcaster;
pub use crate::registry::BeeRegistry;
pub use crate::sampler::ActivitySampler;
pub use crate::stimulus::RandomStimulus;

#[cfg(feature = "async")]
pub use crate::async_runtime::SwarmRuntime;

pub use hive_core::prelude::*;
