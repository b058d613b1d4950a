//! Stimulus — external instrumentation consumed by the swarm.
//!
//! Scouts, workers and guards react to facts about the outside world:
//! how good a discovery is, what a unit of work was worth, how dangerous
//! the surroundings are. The swarm never invents these facts itself. Callers
//! either pass them explicitly in a [`BeeAction`](crate::action::BeeAction)
//! or plug in collaborators implementing the traits below.

use crate::types::{Bee, Flower, FlowerId};
use serde::{Deserialize, Serialize};

/// What a scout found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    /// In [0, 1].
    pub quality: f64,
    #[serde(rename = "workSourceId")]
    pub flower: Option<FlowerId>,
}

impl Discovery {
    pub fn new(quality: f64, flower: Option<FlowerId>) -> Self {
        Self { quality, flower }
    }
}

/// What a guard sensed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatReport {
    /// In [0, 1].
    pub level: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ThreatReport {
    pub fn new(level: f64, kind: impl Into<String>) -> Self {
        Self {
            level,
            kind: kind.into(),
        }
    }
}

/// Produces discoveries for scouts.
pub trait DiscoverySource: Send {
    /// `flowers` lists the work sources currently registered.
    fn discover(&mut self, scout: &Bee, flowers: &[FlowerId]) -> Discovery;
}

/// Values a unit of work. Higher flower quality must yield a higher
/// expected value.
pub trait WorkValuer: Send {
    fn work_value(&mut self, worker: &Bee, flower: &Flower) -> f64;
}

/// Senses threats around guards.
pub trait ThreatDetector: Send {
    fn detect(&mut self, guard: &Bee) -> ThreatReport;
}

/// All three collaborators in one object.
pub trait Stimulus: DiscoverySource + WorkValuer + ThreatDetector {}

impl<T> Stimulus for T where T: DiscoverySource + WorkValuer + ThreatDetector {}

/// A stimulus that reports nothing: zero quality, zero value, zero threat.
///
/// Useful when every action carries explicit payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuietStimulus;

impl DiscoverySource for QuietStimulus {
    fn discover(&mut self, _scout: &Bee, _flowers: &[FlowerId]) -> Discovery {
        Discovery::new(0.0, None)
    }
}

impl WorkValuer for QuietStimulus {
    fn work_value(&mut self, _worker: &Bee, flower: &Flower) -> f64 {
        flower.quality
    }
}

impl ThreatDetector for QuietStimulus {
    fn detect(&mut self, _guard: &Bee) -> ThreatReport {
        ThreatReport::new(0.0, "none")
    }
}
